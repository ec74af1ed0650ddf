//! UI state and its transitions.
//!
//! User actions go through [`UiState::reduce`], which may hand back a [`Command`]
//! describing asynchronous work. When that work finishes, its outcome comes back
//! as a [`Completion`] and is applied with [`UiState::complete`]. Translations and
//! document loads carry the sequence number that was current when they were
//! issued; completions bearing an older number are dropped, so a stale request
//! never overwrites a newer one.

use crate::translator::TranslationRequest;
use crate::{
    ActionError, InputMode, Language, MAX_FILE_SIZE_BYTES, PDF_MIME_TYPE, TranslationFailed,
    ValidationError,
};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub path: PathBuf,
}

impl UploadedFile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size_bytes > MAX_FILE_SIZE_BYTES {
            return Err(ValidationError::FileTooLarge {
                size_bytes: self.size_bytes,
            });
        }
        if self.mime_type != PDF_MIME_TYPE {
            return Err(ValidationError::UnsupportedFileType {
                mime_type: self.mime_type.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EditText(String),
    SetMode(InputMode),
    SetSourceLang(Language),
    SetTargetLang(Language),
    UploadFile(UploadedFile),
    /// The file could not even be inspected, e.g. its metadata was unreadable.
    UploadFailed,
    SwapLanguages,
    RequestTranslation,
    CopyResult,
    DismissError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Translate { seq: u64, request: TranslationRequest },
    LoadDocument { seq: u64, path: PathBuf },
    CopyToClipboard { text: String },
}

#[derive(Debug)]
pub enum Completion {
    Translated {
        seq: u64,
        result: Result<String, TranslationFailed>,
    },
    DocumentLoaded {
        seq: u64,
        result: Result<String, ActionError>,
    },
    CopyFeedbackExpired,
}

/// Background work the state is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Translation,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub source_lang: Language,
    pub target_lang: Language,
    pub input_mode: InputMode,
    pub input_text: String,
    pub translated_text: Option<String>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub file_name: Option<String>,
    pub copy_feedback_active: bool,
    translation_seq: u64,
    document_seq: u64,
    pending: Option<Pending>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState::new(Language::English, Language::Arabic)
    }
}

impl UiState {
    pub fn new(source_lang: Language, target_lang: Language) -> Self {
        UiState {
            source_lang,
            target_lang,
            input_mode: InputMode::Text,
            input_text: String::new(),
            translated_text: None,
            is_loading: false,
            error_message: None,
            file_name: None,
            copy_feedback_active: false,
            translation_seq: 0,
            document_seq: 0,
            pending: None,
        }
    }

    pub fn can_translate(&self) -> bool {
        !self.is_loading && !self.input_text.trim().is_empty()
    }

    pub fn can_copy(&self) -> bool {
        self.translated_text
            .as_deref()
            .is_some_and(|text| !text.is_empty())
    }

    fn fail(&mut self, err: impl Into<ActionError>) {
        self.error_message = Some(err.into().to_string());
    }

    fn start(&mut self, work: Pending) {
        self.pending = Some(work);
        self.is_loading = true;
    }

    fn finish(&mut self) {
        self.pending = None;
        self.is_loading = false;
    }

    /// Forgets a translation in flight; its result no longer matches the input or languages.
    fn abandon_translation(&mut self) {
        if self.pending == Some(Pending::Translation) {
            log::debug!("Abandoning translation #{}", self.translation_seq);
            self.translation_seq += 1;
            self.finish();
        }
    }

    /// Forgets a document load in flight; its text would land on the wrong side of a swap.
    fn abandon_document(&mut self) {
        if self.pending == Some(Pending::Document) {
            log::debug!("Abandoning document load #{}", self.document_seq);
            self.document_seq += 1;
            self.file_name = None;
            self.finish();
        }
    }

    pub fn reduce(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::EditText(text) => {
                if self.input_mode == InputMode::Text {
                    self.input_text = text;
                }
                None
            }
            Action::SetMode(mode) => {
                self.input_mode = mode;
                None
            }
            Action::SetSourceLang(lang) => {
                if lang != self.source_lang {
                    self.abandon_translation();
                    self.source_lang = lang;
                }
                None
            }
            Action::SetTargetLang(lang) => {
                if lang != self.target_lang {
                    self.abandon_translation();
                    self.target_lang = lang;
                }
                None
            }
            Action::UploadFile(file) => self.upload(file),
            Action::UploadFailed => {
                self.fail(std::io::Error::other("file metadata unavailable"));
                None
            }
            Action::SwapLanguages => {
                self.abandon_translation();
                self.abandon_document();
                std::mem::swap(&mut self.source_lang, &mut self.target_lang);
                let previous_result = self.translated_text.take().unwrap_or_default();
                let previous_input = std::mem::replace(&mut self.input_text, previous_result);
                self.translated_text = Some(previous_input).filter(|text| !text.is_empty());
                None
            }
            Action::RequestTranslation => self.request_translation(),
            Action::CopyResult => {
                let text = self.translated_text.clone().filter(|t| !t.is_empty())?;
                self.copy_feedback_active = true;
                Some(Command::CopyToClipboard { text })
            }
            Action::DismissError => {
                self.error_message = None;
                None
            }
        }
    }

    fn upload(&mut self, file: UploadedFile) -> Option<Command> {
        if self.input_mode != InputMode::File {
            return None;
        }
        if let Err(e) = file.validate() {
            log::warn!("Rejected upload {}: {:?}", file.name, e);
            self.fail(e);
            return None;
        }

        self.document_seq += 1;
        // A translation still in flight belongs to the input being replaced.
        self.translation_seq += 1;
        self.file_name = Some(file.name);
        self.start(Pending::Document);
        self.input_text.clear();
        self.translated_text = None;
        self.error_message = None;
        Some(Command::LoadDocument {
            seq: self.document_seq,
            path: file.path,
        })
    }

    fn request_translation(&mut self) -> Option<Command> {
        if self.is_loading {
            return None;
        }
        if self.input_text.trim().is_empty() {
            self.fail(ValidationError::EmptyInput);
            return None;
        }

        self.translation_seq += 1;
        self.error_message = None;
        self.translated_text = None;
        self.start(Pending::Translation);
        Some(Command::Translate {
            seq: self.translation_seq,
            request: TranslationRequest {
                source_text: self.input_text.clone(),
                source_lang: self.source_lang,
                target_lang: self.target_lang,
            },
        })
    }

    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Translated { seq, result } => {
                if seq != self.translation_seq {
                    log::debug!("Dropping stale translation #{seq}");
                    return;
                }
                match result {
                    Ok(text) => self.translated_text = Some(text).filter(|t| !t.is_empty()),
                    Err(e) => self.fail(e),
                }
                self.finish();
            }
            Completion::DocumentLoaded { seq, result } => {
                if seq != self.document_seq {
                    log::debug!("Dropping stale document load #{seq}");
                    return;
                }
                match result {
                    Ok(text) => self.input_text = text,
                    Err(e) => {
                        self.file_name = None;
                        self.fail(e);
                    }
                }
                self.finish();
            }
            Completion::CopyFeedbackExpired => self.copy_feedback_active = false,
        }
    }
}
