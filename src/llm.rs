pub mod dummy;
pub mod openai;

use crate::LLMError;
use crate::settings::{LlmSettings, ProviderKind};

/// A text-generation service: prompt in, generated text out.
pub trait LLM: Send + Sync {
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String, LLMError>> + Send;
}

/// Backend chosen at startup from the configuration.
pub enum Provider {
    OpenAi(openai::OpenAiGPT),
    Dummy(dummy::DummyLLM),
}

impl Provider {
    pub fn from_settings(settings: &LlmSettings) -> anyhow::Result<Self> {
        Ok(match settings.provider {
            ProviderKind::OpenAi => Provider::OpenAi(openai::OpenAiGPT::new(settings)?),
            ProviderKind::Dummy => Provider::Dummy(dummy::DummyLLM::default()),
        })
    }
}

impl LLM for Provider {
    async fn generate(&self, prompt: String) -> Result<String, LLMError> {
        match self {
            Provider::OpenAi(llm) => llm.generate(prompt).await,
            Provider::Dummy(llm) => llm.generate(prompt).await,
        }
    }
}
