use super::LLM;
use crate::LLMError;
use crate::settings::{LlmSettings, ReasoningLevel};
use crate::utils::preview;
use anyhow::{Context, anyhow};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, ReasoningEffort,
};
use std::error::Error;

/// Chat-completions backend for OpenAI-compatible APIs.
pub struct OpenAiGPT {
    client: Client<OpenAIConfig>,
    model: String,
    reasoning_effort: ReasoningLevel,
}

impl OpenAiGPT {
    pub fn new(settings: &LlmSettings) -> anyhow::Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .context("OpenAI provider requires an API key")?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = settings.api_base.as_deref() {
            config = config.with_api_base(api_base);
        }

        Ok(OpenAiGPT {
            client: Client::with_config(config),
            model: settings.model.clone(),
            reasoning_effort: settings.reasoning_effort,
        })
    }

    fn chat_request(&self, prompt: String) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;

        let mut req = CreateChatCompletionRequestArgs::default();
        req.model(self.model.clone()).messages([message.into()]);
        match self.reasoning_effort {
            ReasoningLevel::None => {}
            ReasoningLevel::Low => {
                req.reasoning_effort(ReasoningEffort::Low);
            }
            ReasoningLevel::Medium => {
                req.reasoning_effort(ReasoningEffort::Medium);
            }
            ReasoningLevel::High => {
                req.reasoning_effort(ReasoningEffort::High);
            }
        }
        req.build()
    }
}

impl LLM for OpenAiGPT {
    async fn generate(&self, prompt: String) -> Result<String, LLMError> {
        log::info!(r#"Sending prompt "{}" to {}"#, preview(&prompt, 20), self.model);

        let req = self.chat_request(prompt)?;
        let response = self.client.chat().create(req).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InteractionError(anyhow!("Response has no choices")))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(LLMError::InteractionError(anyhow!(
                "Model refused: {refusal}"
            )));
        }

        let content = choice
            .message
            .content
            .ok_or_else(|| LLMError::InteractionError(anyhow!("Response has no text content")))?;

        log::info!("Received {} bytes of generated text", content.len());
        Ok(content)
    }
}

impl From<OpenAIError> for LLMError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Reqwest(e) => LLMError::ConnectionError(match e.source() {
                Some(source) => anyhow!("{e}: {source}"),
                None => e.into(),
            }),
            OpenAIError::StreamError(e) => LLMError::ConnectionError(anyhow!("{e}")),
            OpenAIError::ApiError(e) => LLMError::ApiError(anyhow!("{e}")),
            OpenAIError::JSONDeserialize(e) => LLMError::InteractionError(e.into()),
            other => LLMError::OtherError(anyhow!("{other}")),
        }
    }
}
