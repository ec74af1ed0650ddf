use anyhow::anyhow;
use eframe::egui::{Button, Color32, ComboBox, TextEdit};
use eframe::{Frame, egui};
use glossa::controller::{Clipboard, Controller};
use glossa::llm::Provider;
use glossa::parser::pdf::PdfParser;
use glossa::settings::Settings;
use glossa::state::{Action, UiState};
use glossa::{InputMode, Language};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Log to stderr, override with `RUST_LOG=debug`.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("glossa=info"))
        .init();

    let settings = Settings::load()?;
    let llm = Provider::from_settings(&settings.llm)?;
    log::info!(
        "Using {:?} provider, model {}",
        settings.llm.provider,
        settings.llm.model
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Glossa",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let controller = Controller::new(
                UiState::new(settings.ui.source_lang, settings.ui.target_lang),
                llm,
                PdfParser,
                EguiClipboard(ctx.clone()),
                handle,
            )
            .with_notifier(move || ctx.request_repaint());
            Ok(Box::new(TranslationGui { controller }))
        }),
    )
    .map_err(|e| anyhow!("eframe/egui run failed: {e}"))
}

struct EguiClipboard(egui::Context);

impl Clipboard for EguiClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.0.copy_text(text.to_owned());
        Ok(())
    }
}

struct TranslationGui {
    controller: Controller<Provider, PdfParser, EguiClipboard>,
}

fn language_picker(ui: &mut egui::Ui, label: &str, current: Language) -> Option<Language> {
    let mut selected = current;
    ComboBox::from_label(label)
        .selected_text(current.name())
        .show_ui(ui, |ui| {
            for lang in Language::ALL {
                ui.selectable_value(&mut selected, lang, lang.name());
            }
        });
    (selected != current).then_some(selected)
}

impl eframe::App for TranslationGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.controller.poll();

        let mut actions = Vec::<Action>::new();
        let mut picked_file: Option<PathBuf> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let state = self.controller.state();

            ui.heading("Glossa");

            ui.horizontal(|ui| {
                if let Some(lang) = language_picker(ui, "From", state.source_lang) {
                    actions.push(Action::SetSourceLang(lang));
                }
                if ui
                    .button("⇄")
                    .on_hover_text("Swap languages and texts")
                    .clicked()
                {
                    actions.push(Action::SwapLanguages);
                }
                if let Some(lang) = language_picker(ui, "To", state.target_lang) {
                    actions.push(Action::SetTargetLang(lang));
                }
            });

            ui.horizontal(|ui| {
                if ui
                    .selectable_label(state.input_mode == InputMode::Text, "Text")
                    .clicked()
                {
                    actions.push(Action::SetMode(InputMode::Text));
                }
                if ui
                    .selectable_label(state.input_mode == InputMode::File, "PDF file")
                    .clicked()
                {
                    actions.push(Action::SetMode(InputMode::File));
                }
            });

            match state.input_mode {
                InputMode::Text => {
                    let mut input = state.input_text.clone();
                    let response = ui.add(
                        TextEdit::multiline(&mut input)
                            .hint_text("Enter text to translate")
                            .desired_rows(8)
                            .desired_width(f32::INFINITY),
                    );
                    if response.changed() {
                        actions.push(Action::EditText(input));
                    }
                }
                InputMode::File => {
                    ui.horizontal(|ui| {
                        let btn = ui
                            .add_enabled(!state.is_loading, Button::new("Select PDF file"))
                            .on_hover_text("Browse for a PDF up to 100 MB");
                        if btn.clicked() {
                            picked_file = rfd::FileDialog::new()
                                .add_filter("PDF", &["pdf"])
                                .pick_file();
                        }
                        if let Some(name) = state.file_name.as_deref() {
                            ui.label(name);
                        }
                    });
                    let mut extracted = state.input_text.as_str();
                    ui.add(
                        TextEdit::multiline(&mut extracted)
                            .desired_rows(8)
                            .desired_width(f32::INFINITY),
                    );
                }
            }
            ui.label(format!("{} characters", state.input_text.chars().count()));

            ui.horizontal(|ui| {
                let btn = ui
                    .add_enabled(state.can_translate(), Button::new("Translate"))
                    .on_hover_text("Translate the input text");
                if btn.clicked() {
                    actions.push(Action::RequestTranslation);
                }
                if state.is_loading {
                    ui.spinner();
                }
            });

            if let Some(error) = state.error_message.as_deref() {
                ui.horizontal(|ui| {
                    ui.colored_label(Color32::RED, error);
                    if ui.small_button("✕").clicked() {
                        actions.push(Action::DismissError);
                    }
                });
            }

            ui.separator();

            let mut result = state.translated_text.as_deref().unwrap_or("");
            ui.add(
                TextEdit::multiline(&mut result)
                    .hint_text("Translation")
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );

            ui.horizontal(|ui| {
                let (copy_label, copy_color) = if state.copy_feedback_active {
                    ("Copied!", Some(Color32::DARK_GREEN))
                } else {
                    ("Copy", None)
                };
                let mut btn = Button::new(copy_label);
                if let Some(color) = copy_color {
                    btn = btn.fill(color);
                }
                if ui.add_enabled(state.can_copy(), btn).clicked() {
                    actions.push(Action::CopyResult);
                }
                ui.label(format!("{} characters", result.chars().count()));
            });
        });

        for action in actions {
            self.controller.dispatch(action);
        }
        if let Some(path) = picked_file {
            self.controller.upload(&path);
        }
    }
}
