use serde::de::DeserializeOwned;

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message, Role};

/// Asks a provider for structured data and parses the reply as JSON.
pub struct Extractor<'a, P: LlmProvider> {
    provider: &'a P,
    preamble: Option<String>,
}

impl<'a, P: LlmProvider> Extractor<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            preamble: None,
        }
    }

    #[must_use]
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    /// # Errors
    ///
    /// Returns an error if the provider fails; a reply that is not valid JSON
    /// for `T` maps to `LlmError::StructuredParse`.
    pub async fn extract<T>(&self, input: &str) -> Result<T, LlmError>
    where
        T: DeserializeOwned,
    {
        let mut messages = Vec::new();
        if let Some(ref preamble) = self.preamble {
            messages.push(Message::new(Role::System, preamble.clone()));
        }
        messages.push(Message::new(Role::User, input));

        let reply = self.provider.chat(&messages).await?;
        serde_json::from_str(reply.trim()).map_err(|e| LlmError::StructuredParse(e.to_string()))
    }
}
