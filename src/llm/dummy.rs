use super::LLM;
use crate::LLMError;

/// Offline stand-in that answers every prompt with the same text.
pub struct DummyLLM {
    pub reply: String,
}

impl Default for DummyLLM {
    fn default() -> Self {
        DummyLLM {
            reply: "Dummy output".to_owned(),
        }
    }
}

impl LLM for DummyLLM {
    async fn generate(&self, _prompt: String) -> Result<String, LLMError> {
        Ok(self.reply.clone())
    }
}
