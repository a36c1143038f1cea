//! UI-agnostic application state types
//!
//! Screen-local data that any front end can drive: chat messages, the
//! disability type chosen on the first screen, and chat quick actions.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const CHAT_GREETING: &str = "Hello! How can I assist you today?";

pub const VOICE_GREETING: &str = "Welcome to AccessEase Voice Assistant. I'm here to help you with any questions or tasks you may have. Tap the microphone button to start speaking, or tap anywhere on the screen to hear this message again.";

/// Words in an assistant reply that bring up the quick-action buttons.
const BUTTON_TRIGGERS: [&str; 5] = ["account", "password", "billing", "help", "support"];

/// A chat message in the assistant conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Local>,
    pub has_buttons: bool,
}

impl Message {
    pub fn user(id: u64, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            is_user: true,
            timestamp: Local::now(),
            has_buttons: false,
        }
    }

    pub fn assistant(id: u64, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            is_user: false,
            timestamp: Local::now(),
            has_buttons: should_show_buttons(text),
        }
    }

    /// Assistant message without quick actions, for error notices.
    pub fn notice(id: u64, text: &str) -> Self {
        Self {
            has_buttons: false,
            ..Self::assistant(id, text)
        }
    }
}

pub fn should_show_buttons(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    BUTTON_TRIGGERS.iter().any(|t| lower.contains(t))
}

/// Ordered chat history with increasing ids.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Starts with the assistant greeting.
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        let id = conversation.take_id();
        conversation.messages.push(Message::notice(id, CHAT_GREETING));
        conversation
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_user(&mut self, text: &str) -> &Message {
        let id = self.take_id();
        self.messages.push(Message::user(id, text));
        &self.messages[self.messages.len() - 1]
    }

    pub fn push_assistant(&mut self, text: &str) -> &Message {
        let id = self.take_id();
        self.messages.push(Message::assistant(id, text));
        &self.messages[self.messages.len() - 1]
    }

    pub fn push_notice(&mut self, text: &str) -> &Message {
        let id = self.take_id();
        self.messages.push(Message::notice(id, text));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Quick actions apply only while the newest message offers them.
    pub fn buttons_active(&self) -> bool {
        self.messages
            .last()
            .is_some_and(|m| !m.is_user && m.has_buttons)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisabilityType {
    Blind,
    Deaf,
    Motor,
}

impl DisabilityType {
    pub fn all() -> [DisabilityType; 3] {
        [DisabilityType::Blind, DisabilityType::Deaf, DisabilityType::Motor]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisabilityType::Blind => "Blind",
            DisabilityType::Deaf => "Deaf",
            DisabilityType::Motor => "Motor Disability",
        }
    }

    pub fn assistant_name(&self) -> &'static str {
        match self {
            DisabilityType::Blind => "Voice Assistant",
            DisabilityType::Deaf => "AI Assistant",
            DisabilityType::Motor => "Chat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    AccountRecovery,
    PasswordReset,
    BillingInquiry,
}

impl QuickAction {
    pub fn all() -> [QuickAction; 3] {
        [
            QuickAction::AccountRecovery,
            QuickAction::PasswordReset,
            QuickAction::BillingInquiry,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::AccountRecovery => "Account Recovery",
            QuickAction::PasswordReset => "Password Reset",
            QuickAction::BillingInquiry => "Billing Inquiry",
        }
    }

    /// Message sent on the user's behalf.
    pub fn message(&self) -> &'static str {
        match self {
            QuickAction::AccountRecovery => "I need help with account recovery",
            QuickAction::PasswordReset => "I need to reset my password",
            QuickAction::BillingInquiry => "I have a billing question",
        }
    }

    /// 1-based position, as shown on screen.
    pub fn from_index(n: usize) -> Option<Self> {
        Self::all().get(n.checked_sub(1)?).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_show_buttons() {
        assert!(should_show_buttons("Contact SUPPORT for more"));
        assert!(should_show_buttons("I can help with billing questions!"));
        assert!(!should_show_buttons("The current time is 2:38 PM."));
    }

    #[test]
    fn test_conversation_ids_increase() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].text, CHAT_GREETING);

        conversation.push_user("hi");
        conversation.push_assistant("Hello there");
        let ids: Vec<u64> = conversation.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(conversation.messages()[1].is_user);
    }

    #[test]
    fn test_buttons_follow_latest_message() {
        let mut conversation = Conversation::new();
        assert!(!conversation.buttons_active());

        conversation.push_assistant("I can help you with account-related issues!");
        assert!(conversation.buttons_active());

        conversation.push_user("thanks");
        assert!(!conversation.buttons_active());

        conversation.push_notice("I'm sorry, please try again.");
        assert!(!conversation.buttons_active());
    }

    #[test]
    fn test_quick_action_from_index() {
        assert_eq!(QuickAction::from_index(1), Some(QuickAction::AccountRecovery));
        assert_eq!(QuickAction::from_index(3), Some(QuickAction::BillingInquiry));
        assert_eq!(QuickAction::from_index(0), None);
        assert_eq!(QuickAction::from_index(4), None);
    }
}
