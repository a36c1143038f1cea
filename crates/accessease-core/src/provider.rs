use serde::{Deserialize, Serialize};

/// Where assistant replies come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Canned keyword responses with simulated latency.
    #[default]
    Mock,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Mock => "mock",
            Provider::Gemini => "gemini",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Some(Provider::Mock),
            "gemini" | "live" => Some(Provider::Gemini),
            _ => None,
        }
    }

    pub fn all() -> Vec<Provider> {
        vec![Provider::Mock, Provider::Gemini]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Mock => "Mock (Offline demo)",
            Provider::Gemini => "Gemini (Google)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!(Provider::from_str("MOCK"), Some(Provider::Mock));
        assert_eq!(Provider::from_str(" gemini "), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("live"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("ollama"), None);
    }

    #[test]
    fn test_as_str_matches_from_str() {
        for provider in Provider::all() {
            assert_eq!(Provider::from_str(provider.as_str()), Some(provider));
        }
    }
}
