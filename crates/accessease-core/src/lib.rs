pub mod ai;
pub mod category;
pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod responder;
pub mod speech;
pub mod state;

// Re-export main types for convenience
pub use ai::GeminiClient;
pub use category::{select_category_response, Category};
pub use config::Config;
pub use error::{ConfigError, GatewayError};
pub use gateway::{AssistantGateway, FALLBACK_REPLY, MOTOR_CONTEXT, VOICE_CONTEXT};
pub use provider::Provider;
pub use responder::{select_response, Latency, MockResponder};
pub use speech::SimulatedListener;
pub use state::{Conversation, DisabilityType, Message, QuickAction};
