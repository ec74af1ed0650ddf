pub mod controller;
pub mod llm;
pub mod parser;
pub mod settings;
pub mod state;
pub mod translator;
pub mod utils;

use serde::Deserialize;
use std::fmt::Display;

/// Upload size ceiling, checked before a file is read.
pub const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Language {
    English,
    Arabic,
    French,
    Spanish,
    German,
    Italian,
    Portuguese,
    Russian,
    Chinese,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Arabic,
        Language::French,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Russian,
        Language::Chinese,
        Language::Japanese,
    ];

    /// English name of the language, as the model sees it in the prompt.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "Arabic",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    File,
}

/// Raw failure of the generation service.
#[derive(Debug)]
pub enum LLMError {
    ConnectionError(anyhow::Error),
    ApiError(anyhow::Error),
    InteractionError(anyhow::Error),
    OtherError(anyhow::Error),
}

impl Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::ConnectionError(e) => write!(f, "Connection error: {}", e),
            LLMError::ApiError(e) => write!(f, "API error: {}", e),
            LLMError::InteractionError(e) => write!(f, "Unexpected response: {}", e),
            LLMError::OtherError(e) => write!(f, "Error: {}", e),
        }
    }
}

/// Raw failure of text extraction from a document.
#[derive(Debug)]
pub enum ParseError {
    NotAPdf,
    NoText,
    OtherError(anyhow::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::NotAPdf => write!(f, "Missing PDF header"),
            ParseError::NoText => write!(f, "Document contains no extractable text"),
            ParseError::OtherError(e) => write!(f, "{}", e),
        }
    }
}

/// The only error the translation client hands out; the cause is logged instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationFailed;

impl Display for TranslationFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Translation failed. Please try again.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyInput,
    FileTooLarge { size_bytes: u64 },
    UnsupportedFileType { mime_type: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyInput => write!(f, "Please enter some text to translate"),
            ValidationError::FileTooLarge { .. } => {
                write!(
                    f,
                    "File size exceeds limit ({} MB)",
                    MAX_FILE_SIZE_BYTES / (1024 * 1024)
                )
            }
            ValidationError::UnsupportedFileType { .. } => {
                write!(f, "Only PDF files are supported")
            }
        }
    }
}

/// Everything that can go wrong while handling a user action.
///
/// `Display` renders the message shown in the error banner, never the raw cause.
#[derive(Debug)]
pub enum ActionError {
    Validation(ValidationError),
    Extraction(ParseError),
    Translation(TranslationFailed),
    Io(std::io::Error),
}

impl Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::Validation(e) => write!(f, "{}", e),
            ActionError::Extraction(_) => write!(
                f,
                "Failed to extract text from PDF. The file may be corrupted, \
                 password-protected, or contain only images."
            ),
            ActionError::Translation(e) => write!(f, "{}", e),
            ActionError::Io(_) => write!(f, "Failed to read file"),
        }
    }
}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        ActionError::Validation(err)
    }
}

impl From<ParseError> for ActionError {
    fn from(err: ParseError) -> Self {
        ActionError::Extraction(err)
    }
}

impl From<TranslationFailed> for ActionError {
    fn from(err: TranslationFailed) -> Self {
        ActionError::Translation(err)
    }
}

impl From<std::io::Error> for ActionError {
    fn from(err: std::io::Error) -> Self {
        ActionError::Io(err)
    }
}
