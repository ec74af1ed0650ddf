use crate::llm::LLM;
use crate::parser::{self, Parser};
use crate::state::{Action, Command, Completion, UiState, UploadedFile};
use crate::translator::TranslationClient;
use crate::{ActionError, ParseError};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// How long the "copied" acknowledgement stays visible.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(2000);

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Owns the UI state and runs the asynchronous work its transitions ask for.
///
/// Background tasks never touch the state; they report back through a channel
/// and the owner applies their results in [`Controller::poll`].
pub struct Controller<L, P, C> {
    state: UiState,
    client: Arc<TranslationClient<L>>,
    parser: Arc<P>,
    clipboard: C,
    runtime: Handle,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    notify: Option<Notifier>,
}

impl<L, P, C> Controller<L, P, C>
where
    L: LLM + 'static,
    P: Parser + 'static,
    C: Clipboard,
{
    pub fn new(state: UiState, llm: L, parser: P, clipboard: C, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Controller {
            state,
            client: Arc::new(TranslationClient::new(llm)),
            parser: Arc::new(parser),
            clipboard,
            runtime,
            tx,
            rx,
            notify: None,
        }
    }

    /// Registers a callback fired from background tasks whenever a result is ready.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        if let Some(cmd) = self.state.reduce(action) {
            self.execute(cmd);
        }
    }

    /// Inspects a file picked by the user and feeds it to the upload transition.
    pub fn upload(&mut self, path: &Path) {
        match inspect_file(path) {
            Ok(file) => self.dispatch(Action::UploadFile(file)),
            Err(e) => {
                log::error!("Cannot read metadata of {}: {e}", path.display());
                self.dispatch(Action::UploadFailed);
            }
        }
    }

    /// Applies every completion that has arrived so far.
    pub fn poll(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            self.state.complete(completion);
        }
    }

    /// Waits for the next completion and applies it.
    pub async fn process_next(&mut self) {
        // The controller holds a sender itself, so the channel never closes.
        if let Some(completion) = self.rx.recv().await {
            self.state.complete(completion);
        }
    }

    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::Translate { seq, request } => {
                let client = self.client.clone();
                let reply = self.reply_handle();
                self.runtime.spawn(async move {
                    let result = client.translate_request(&request).await;
                    reply.send(Completion::Translated { seq, result });
                });
            }
            Command::LoadDocument { seq, path } => {
                let doc_parser = self.parser.clone();
                let reply = self.reply_handle();
                self.runtime.spawn(async move {
                    let result = load_document(doc_parser, &path).await;
                    reply.send(Completion::DocumentLoaded { seq, result });
                });
            }
            Command::CopyToClipboard { text } => {
                if let Err(e) = self.clipboard.set_text(&text) {
                    log::warn!("Clipboard write failed: {e}");
                }
                let reply = self.reply_handle();
                self.runtime.spawn(async move {
                    tokio::time::sleep(COPY_FEEDBACK_DURATION).await;
                    reply.send(Completion::CopyFeedbackExpired);
                });
            }
        }
    }

    fn reply_handle(&self) -> Reply {
        Reply {
            tx: self.tx.clone(),
            notify: self.notify.clone(),
        }
    }
}

struct Reply {
    tx: UnboundedSender<Completion>,
    notify: Option<Notifier>,
}

impl Reply {
    fn send(self, completion: Completion) {
        if self.tx.send(completion).is_err() {
            log::debug!("Controller is gone, dropping completion");
            return;
        }
        if let Some(notify) = self.notify {
            notify();
        }
    }
}

fn inspect_file(path: &Path) -> std::io::Result<UploadedFile> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedFile {
        mime_type: parser::pdf::mime_type_for(&name).to_owned(),
        name,
        size_bytes: metadata.len(),
        path: path.to_owned(),
    })
}

async fn load_document<P: Parser + 'static>(
    doc_parser: Arc<P>,
    path: &Path,
) -> Result<String, ActionError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        log::error!("Failed to read {}: {e}", path.display());
        ActionError::Io(e)
    })?;

    tokio::task::spawn_blocking(move || parser::extract_text(doc_parser.as_ref(), &bytes))
        .await
        .map_err(|e| ParseError::OtherError(e.into()))
        .and_then(|res| res)
        .map_err(|e| {
            log::error!("Failed to extract text from {}: {e}", path.display());
            ActionError::Extraction(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::dummy::DummyLLM;
    use crate::parser::pdf::PdfParser;
    use crate::{InputMode, LLMError, Language};
    use anyhow::anyhow;
    use std::fs;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;
    use tokio::time::Instant;

    #[derive(Clone, Default)]
    struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(text.to_owned());
            Ok(())
        }
    }

    struct FailingLLM;

    impl LLM for FailingLLM {
        async fn generate(&self, _prompt: String) -> Result<String, LLMError> {
            Err(LLMError::ApiError(anyhow!("401 Unauthorized")))
        }
    }

    /// Answers after a fixed delay.
    struct SlowLLM(Duration);

    impl LLM for SlowLLM {
        async fn generate(&self, _prompt: String) -> Result<String, LLMError> {
            tokio::time::sleep(self.0).await;
            Ok("  slow reply\n".to_owned())
        }
    }

    struct FixedPages(Vec<&'static str>);

    impl Parser for FixedPages {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, ParseError> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    fn controller<L: LLM + 'static, P: Parser + 'static>(
        llm: L,
        parser: P,
    ) -> (Controller<L, P, RecordingClipboard>, RecordingClipboard) {
        let clipboard = RecordingClipboard::default();
        let controller = Controller::new(
            UiState::new(Language::English, Language::Arabic),
            llm,
            parser,
            clipboard.clone(),
            Handle::current(),
        );
        (controller, clipboard)
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn translate_success() {
        let llm = DummyLLM {
            reply: "\nمرحبا\n".to_owned(),
        };
        let (mut c, _) = controller(llm, PdfParser);
        c.dispatch(Action::EditText("Hello".to_owned()));
        c.dispatch(Action::RequestTranslation);
        assert!(c.state().is_loading);

        c.process_next().await;

        assert!(!c.state().is_loading);
        assert_eq!(c.state().translated_text.as_deref(), Some("مرحبا"));
        assert_eq!(c.state().error_message, None);
    }

    #[tokio::test]
    async fn translate_failure() {
        let (mut c, _) = controller(FailingLLM, PdfParser);
        c.dispatch(Action::EditText("Hello".to_owned()));
        c.dispatch(Action::RequestTranslation);

        c.process_next().await;

        assert!(!c.state().is_loading);
        assert_eq!(c.state().translated_text, None);
        assert_eq!(
            c.state().error_message.as_deref(),
            Some("Translation failed. Please try again.")
        );

        // The UI stays usable and a retry goes out.
        c.dispatch(Action::RequestTranslation);
        assert!(c.state().is_loading);
    }

    #[tokio::test]
    async fn notifier_fires_on_completion() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let (c, _) = controller(DummyLLM::default(), PdfParser);
        let mut c = c.with_notifier(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        c.dispatch(Action::EditText("Hello".to_owned()));
        c.dispatch(Action::RequestTranslation);
        c.process_next().await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_feedback_reverts_after_delay() {
        let (mut c, clipboard) = controller(DummyLLM::default(), PdfParser);
        c.dispatch(Action::EditText("Hello".to_owned()));
        c.dispatch(Action::RequestTranslation);
        c.process_next().await;

        let start = Instant::now();
        c.dispatch(Action::CopyResult);
        assert!(c.state().copy_feedback_active);
        assert_eq!(*clipboard.0.lock().unwrap(), vec!["Dummy output".to_owned()]);

        tokio::time::sleep(COPY_FEEDBACK_DURATION - Duration::from_millis(1)).await;
        c.poll();
        assert!(c.state().copy_feedback_active);

        c.process_next().await;
        assert!(!c.state().copy_feedback_active);
        assert!(start.elapsed() >= COPY_FEEDBACK_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn second_copy_does_not_extend_feedback() {
        let (mut c, clipboard) = controller(DummyLLM::default(), PdfParser);
        c.dispatch(Action::EditText("Hello".to_owned()));
        c.dispatch(Action::RequestTranslation);
        c.process_next().await;

        let start = Instant::now();
        c.dispatch(Action::CopyResult);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        c.dispatch(Action::CopyResult);
        assert!(c.state().copy_feedback_active);
        assert_eq!(clipboard.0.lock().unwrap().len(), 2);

        c.process_next().await;
        assert!(!c.state().copy_feedback_active);
        assert!(start.elapsed() < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn copy_feedback_independent_of_translation() {
        let (mut c, _) = controller(SlowLLM(Duration::from_secs(5)), PdfParser);
        c.dispatch(Action::EditText("Hello".to_owned()));
        c.dispatch(Action::RequestTranslation);
        c.process_next().await;
        let result = c.state().translated_text.clone();
        assert_eq!(result.as_deref(), Some("slow reply"));

        // Copy, then start the reverse translation while the feedback is showing.
        c.dispatch(Action::CopyResult);
        c.dispatch(Action::SwapLanguages);
        c.dispatch(Action::RequestTranslation);
        assert!(c.state().copy_feedback_active);
        assert!(c.state().is_loading);

        c.process_next().await;
        assert!(!c.state().copy_feedback_active);
        assert!(c.state().is_loading);

        c.process_next().await;
        assert!(!c.state().is_loading);
        assert_eq!(c.state().source_lang, Language::Arabic);
    }

    #[tokio::test]
    async fn upload_extracts_pages() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "book.pdf", b"%PDF-1.4 stub");
        let (mut c, _) = controller(DummyLLM::default(), FixedPages(vec!["A", "B", "C"]));
        c.dispatch(Action::SetMode(InputMode::File));

        c.upload(&path);
        assert!(c.state().is_loading);
        assert_eq!(c.state().file_name.as_deref(), Some("book.pdf"));

        c.process_next().await;

        assert!(!c.state().is_loading);
        assert_eq!(c.state().input_text, "A\n\nB\n\nC");
        assert_eq!(c.state().error_message, None);
    }

    #[tokio::test]
    async fn upload_of_broken_pdf_reports_extraction_failure() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "broken.pdf", b"this is not really a pdf");
        let (mut c, _) = controller(DummyLLM::default(), PdfParser);
        c.dispatch(Action::SetMode(InputMode::File));

        c.upload(&path);
        c.process_next().await;

        assert!(!c.state().is_loading);
        assert_eq!(c.state().input_text, "");
        assert!(
            c.state()
                .error_message
                .as_deref()
                .unwrap()
                .starts_with("Failed to extract text from PDF")
        );
    }

    #[tokio::test]
    async fn upload_of_text_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", b"plain text");
        let (mut c, _) = controller(DummyLLM::default(), PdfParser);
        c.dispatch(Action::SetMode(InputMode::File));

        c.upload(&path);

        assert!(!c.state().is_loading);
        assert_eq!(c.state().input_text, "");
        assert_eq!(
            c.state().error_message.as_deref(),
            Some("Only PDF files are supported")
        );
    }

    #[tokio::test]
    async fn upload_of_missing_file_reports_read_failure() {
        let dir = tempdir().unwrap();
        let (mut c, _) = controller(DummyLLM::default(), PdfParser);
        c.dispatch(Action::SetMode(InputMode::File));

        c.upload(&dir.path().join("gone.pdf"));

        assert_eq!(c.state().error_message.as_deref(), Some("Failed to read file"));
    }

    #[tokio::test]
    async fn file_vanishing_before_read_reports_read_failure() {
        let dir = tempdir().unwrap();
        let (mut c, _) = controller(DummyLLM::default(), PdfParser);
        c.dispatch(Action::SetMode(InputMode::File));

        c.dispatch(Action::UploadFile(UploadedFile {
            name: "gone.pdf".to_owned(),
            size_bytes: 10,
            mime_type: crate::PDF_MIME_TYPE.to_owned(),
            path: dir.path().join("gone.pdf"),
        }));
        c.process_next().await;

        assert!(!c.state().is_loading);
        assert_eq!(c.state().error_message.as_deref(), Some("Failed to read file"));
    }

    #[tokio::test]
    async fn uploaded_text_can_be_translated() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "doc.pdf", b"%PDF-1.7");
        let llm = DummyLLM {
            reply: "Bonjour".to_owned(),
        };
        let (mut c, _) = controller(llm, FixedPages(vec!["Hello"]));
        c.dispatch(Action::SetMode(InputMode::File));
        c.upload(&path);
        c.process_next().await;

        c.dispatch(Action::RequestTranslation);
        c.process_next().await;

        assert_eq!(c.state().translated_text.as_deref(), Some("Bonjour"));
    }
}
