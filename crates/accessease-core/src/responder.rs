//! Offline reply generation.
//!
//! Replies are picked by keyword rules scoped to the caller's context tag.
//! Rules are evaluated in declaration order and the first hit wins, so a
//! message mentioning both "help" and "password" under the motor context gets
//! the account reply.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::category::select_category_response;

struct KeywordRule {
    keywords: &'static [&'static str],
    reply: &'static str,
}

struct ContextTable {
    /// Substrings of the context tag that activate this table (case-sensitive).
    markers: &'static [&'static str],
    rules: &'static [KeywordRule],
}

const CONTEXT_TABLES: &[ContextTable] = &[
    ContextTable {
        markers: &["motor disabilities"],
        rules: &[
            KeywordRule {
                keywords: &["account", "help"],
                reply: "I can help you with account-related issues! I've provided some quick action buttons below for common tasks like account recovery, password reset, and billing inquiries. You can also type specific questions about your account, and I'll do my best to assist you.",
            },
            KeywordRule {
                keywords: &["password"],
                reply: "For password reset, I can guide you through the process step by step. Would you like me to help you reset your password? I can provide instructions that are easy to follow with minimal typing required.",
            },
            KeywordRule {
                keywords: &["billing"],
                reply: "I can help with billing questions! Common billing issues include payment problems, subscription changes, and invoice questions. What specific billing issue can I help you with today?",
            },
        ],
    },
    ContextTable {
        markers: &["blind", "visually impaired"],
        rules: &[
            KeywordRule {
                keywords: &["weather"],
                reply: "Today's weather is partly cloudy with a temperature of 72 degrees Fahrenheit. There's a light breeze from the west at 8 miles per hour. No precipitation is expected today. Would you like me to check the forecast for tomorrow as well?",
            },
            KeywordRule {
                keywords: &["transportation", "taxi"],
                reply: "I can help you find accessible transportation options. Many ride-sharing services offer wheelchair-accessible vehicles and audio announcements. Would you like me to help you book a ride or provide information about public transit accessibility in your area?",
            },
            KeywordRule {
                keywords: &["navigation", "directions"],
                reply: "I can provide turn-by-turn audio directions to help you navigate. Where would you like to go? I can also suggest accessible routes and identify landmarks along the way to help with navigation.",
            },
            KeywordRule {
                keywords: &["time"],
                reply: "The current time is 2:38 PM. Is there anything else you'd like to know about today's schedule or upcoming appointments?",
            },
            KeywordRule {
                keywords: &["message", "read"],
                reply: "I can help you manage your messages. You have 3 unread messages. Would you like me to read them aloud for you? I can also help you compose and send replies using voice commands.",
            },
        ],
    },
];

/// Replies used when no keyword rule matches.
pub const GENERAL_RESPONSES: [&str; 5] = [
    "Hello! I'm AccessEase, your AI assistant. I'm here to help make your daily tasks easier and more accessible. What can I assist you with today?",
    "I understand you need assistance. I'm designed to help people with various accessibility needs. Could you tell me more about what you'd like help with?",
    "Thank you for using AccessEase! I'm here to provide support and make technology more accessible for you. How can I help you today?",
    "I'm here to assist you with any questions or tasks you might have. My goal is to make your experience as smooth and accessible as possible. What would you like to know?",
    "Great question! I'm designed to help with a wide range of accessibility needs. Whether you need help with navigation, communication, or daily tasks, I'm here to support you.",
];

/// Deterministic part of the selector: the first keyword rule that matches.
pub fn keyword_response(message: &str, context: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();

    CONTEXT_TABLES
        .iter()
        .filter(|table| table.markers.iter().any(|m| context.contains(m)))
        .flat_map(|table| table.rules.iter())
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.reply)
}

/// Keyword reply if one matches, otherwise a uniform pick from [`GENERAL_RESPONSES`].
pub fn select_response<R: Rng + ?Sized>(message: &str, context: &str, rng: &mut R) -> &'static str {
    keyword_response(message, context).unwrap_or_else(|| {
        GENERAL_RESPONSES
            .choose(rng)
            .copied()
            .unwrap_or(GENERAL_RESPONSES[0])
    })
}

/// Inclusive bounds for a simulated delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub min: Duration,
    pub max: Duration,
}

impl Latency {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// 1.0–3.0 s, the delay before a general reply.
    pub const REPLY: Latency = Latency::new(Duration::from_millis(1000), Duration::from_millis(3000));

    /// 1.5–2.5 s, the delay before a category reply.
    pub const CATEGORY: Latency =
        Latency::new(Duration::from_millis(1500), Duration::from_millis(2500));

    pub const NONE: Latency = Latency::new(Duration::ZERO, Duration::ZERO);

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if lo == hi {
            return lo;
        }
        rng.gen_range(lo..=hi)
    }

    pub fn contains(&self, d: Duration) -> bool {
        d >= self.min && d <= self.max
    }
}

/// Canned replies behind an artificial delay, standing in for a backend call.
pub struct MockResponder {
    rng: Mutex<StdRng>,
    reply_latency: Latency,
    category_latency: Latency,
}

impl MockResponder {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            reply_latency: Latency::REPLY,
            category_latency: Latency::CATEGORY,
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn with_latency(mut self, reply: Latency, category: Latency) -> Self {
        self.reply_latency = reply;
        self.category_latency = category;
        self
    }

    pub fn reply_latency(&self) -> Latency {
        self.reply_latency
    }

    pub fn category_latency(&self) -> Latency {
        self.category_latency
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn respond(&self, message: &str, context: &str) -> String {
        // Guard must drop before the await.
        let (delay, reply) = {
            let mut rng = self.rng();
            let delay = self.reply_latency.sample(&mut *rng);
            (delay, select_response(message, context, &mut *rng))
        };

        debug!(delay_ms = delay.as_millis() as u64, "mock reply scheduled");
        tokio::time::sleep(delay).await;
        reply.to_string()
    }

    pub async fn respond_to_category(&self, category_id: &str) -> String {
        let delay = self.category_latency.sample(&mut *self.rng());

        debug!(category_id, delay_ms = delay.as_millis() as u64, "mock category reply scheduled");
        tokio::time::sleep(delay).await;
        select_category_response(category_id).to_string()
    }
}
