//! Single entry point for assistant replies.
//!
//! [`AssistantGateway::reply`] never fails. In mock mode it delegates to the
//! [`MockResponder`]; in Gemini mode it makes exactly one request and turns
//! every failure into [`FALLBACK_REPLY`].

use tracing::{info, warn};

use crate::ai::GeminiClient;
use crate::category::category_prompt;
use crate::error::GatewayError;
use crate::provider::Provider;
use crate::responder::MockResponder;

pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting right now. Please try again in a moment. If you need immediate assistance, please contact your local emergency services or support hotline.";

/// Context for the chat screen.
pub const MOTOR_CONTEXT: &str = "You are assisting someone who may have motor disabilities. Provide clear, helpful responses and offer interactive options when appropriate.";

/// Context wrapped around transcribed voice commands.
pub const VOICE_CONTEXT: &str = "You are responding to a voice command from a user who is blind or visually impaired.
  Your response will be read aloud using text-to-speech, so:
  - Keep responses clear and concise
  - Avoid complex formatting or visual descriptions
  - Use natural, conversational language
  - Provide step-by-step instructions when needed
  - Ask clarifying questions if the request is unclear";

/// Full prompt sent to the live endpoint.
pub fn build_prompt(message: &str, context: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are AccessEase, an AI assistant designed to help people with disabilities.\n");
    prompt.push_str(context);
    prompt.push_str("\n\nUser message: ");
    prompt.push_str(message);
    prompt.push_str(
        "\n\nPlease provide a helpful, clear, and concise response. Keep your response conversational and supportive.",
    );

    prompt
}

pub struct AssistantGateway {
    provider: Provider,
    responder: MockResponder,
    gemini: Option<GeminiClient>,
}

impl AssistantGateway {
    pub fn mock(responder: MockResponder) -> Self {
        Self {
            provider: Provider::Mock,
            responder,
            gemini: None,
        }
    }

    /// Live gateway. A `None` client means no API key was supplied; every
    /// reply is then the fallback.
    pub fn gemini(client: Option<GeminiClient>, responder: MockResponder) -> Self {
        Self {
            provider: Provider::Gemini,
            responder,
            gemini: client,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> Option<&str> {
        self.gemini.as_ref().map(|g| g.model())
    }

    pub async fn reply(&self, message: &str, context: &str) -> String {
        match self.provider {
            Provider::Mock => self.responder.respond(message, context).await,
            Provider::Gemini => match self.generate(message, context).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "assistant request failed, using fallback reply");
                    FALLBACK_REPLY.to_string()
                }
            },
        }
    }

    async fn generate(&self, message: &str, context: &str) -> Result<String, GatewayError> {
        let client = self.gemini.as_ref().ok_or(GatewayError::MissingApiKey)?;
        let prompt = build_prompt(message, context);
        let text = client.generate(&prompt).await?;
        info!(reply_chars = text.chars().count(), "assistant reply received");
        Ok(text)
    }

    /// Reply for a visual-assistant category id.
    pub async fn category_reply(&self, category_id: &str) -> String {
        match self.provider {
            Provider::Mock => self.responder.respond_to_category(category_id).await,
            Provider::Gemini => self.reply("", category_prompt(category_id)).await,
        }
    }

    /// Reply to a transcribed voice command, phrased to be read aloud.
    pub async fn voice_reply(&self, command: &str) -> String {
        self.reply(command, VOICE_CONTEXT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::{Latency, MockResponder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instant_responder() -> MockResponder {
        MockResponder::new(StdRng::seed_from_u64(1)).with_latency(Latency::NONE, Latency::NONE)
    }

    #[test]
    fn test_build_prompt_embeds_context_and_message() {
        let prompt = build_prompt("Where is the bus stop?", "Blind user.");
        assert!(prompt.starts_with("You are AccessEase, an AI assistant designed to help people with disabilities.\nBlind user."));
        assert!(prompt.contains("\n\nUser message: Where is the bus stop?\n\n"));
        assert!(prompt.ends_with("Keep your response conversational and supportive."));
    }

    #[tokio::test]
    async fn test_mock_voice_reply_uses_blind_table() {
        let gateway = AssistantGateway::mock(instant_responder());
        let reply = gateway.voice_reply("What time is it?").await;
        assert!(reply.starts_with("The current time is"));
    }

    #[tokio::test]
    async fn test_mock_chat_reply_uses_motor_table() {
        let gateway = AssistantGateway::mock(instant_responder());
        let reply = gateway.reply("I have a billing question", MOTOR_CONTEXT).await;
        assert!(reply.starts_with("I can help with billing questions!"));
    }

    #[tokio::test]
    async fn test_mock_category_reply() {
        let gateway = AssistantGateway::mock(instant_responder());
        assert_eq!(
            gateway.category_reply("documents").await,
            crate::category::Category::Documents.body()
        );
    }

    #[tokio::test]
    async fn test_missing_key_falls_back() {
        let gateway = AssistantGateway::gemini(None, instant_responder());
        assert_eq!(gateway.reply("hello", "").await, FALLBACK_REPLY);
        assert_eq!(gateway.category_reply("emergency").await, FALLBACK_REPLY);
    }
}
