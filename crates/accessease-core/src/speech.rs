//! Simulated speech input and spoken-output timing.
//!
//! There is no audio capture. "Listening" waits a fixed time and then yields a
//! random phrase from a canned list, which is enough to drive the voice and
//! chat screens end to end.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Phrases the voice screen pretends to hear.
pub const VOICE_DEMO_COMMANDS: [&str; 5] = [
    "What's the weather like today?",
    "Help me find accessible transportation",
    "Read my messages",
    "What time is it?",
    "Help me with navigation",
];

/// Phrases the chat screen's voice-input button pretends to hear.
pub const CHAT_DEMO_INPUTS: [&str; 4] = [
    "I need help with my account",
    "How do I reset my password?",
    "I have a billing question",
    "Can you help me with accessibility features?",
];

pub const VOICE_LISTEN_DURATION: Duration = Duration::from_secs(3);
pub const CHAT_LISTEN_DURATION: Duration = Duration::from_secs(2);

/// Slightly slower than normal speech, for comprehension.
pub const SPEECH_RATE: f32 = 0.8;

const WORDS_PER_MINUTE_AT_RATE_1: f32 = 160.0;

/// Fake speech-to-text: waits, then returns one of `phrases`.
#[derive(Debug, Clone)]
pub struct SimulatedListener {
    phrases: &'static [&'static str],
    duration: Duration,
}

impl SimulatedListener {
    pub fn new(phrases: &'static [&'static str], duration: Duration) -> Self {
        Self { phrases, duration }
    }

    pub fn voice() -> Self {
        Self::new(&VOICE_DEMO_COMMANDS, VOICE_LISTEN_DURATION)
    }

    pub fn chat() -> Self {
        Self::new(&CHAT_DEMO_INPUTS, CHAT_LISTEN_DURATION)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Pick the transcription up front so the caller's RNG is not held across the wait.
    pub fn transcribe<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.phrases.choose(rng).copied().unwrap_or_default()
    }

    /// Returns `None` if `cancel` fires before listening completes.
    pub async fn listen(
        &self,
        transcription: &'static str,
        cancel: &CancellationToken,
    ) -> Option<&'static str> {
        tokio::select! {
            _ = cancel.cancelled() => None,
            _ = tokio::time::sleep(self.duration) => Some(transcription),
        }
    }
}

/// How long `text` takes to read aloud at `rate` (1.0 = normal speed).
pub fn speaking_duration(text: &str, rate: f32) -> Duration {
    let words = text.split_whitespace().count() as f32;
    if words == 0.0 || !rate.is_finite() || rate <= 0.0 {
        return Duration::ZERO;
    }
    let minutes = words / (WORDS_PER_MINUTE_AT_RATE_1 * rate);
    Duration::try_from_secs_f32(minutes * 60.0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_transcribe_picks_from_list() {
        let mut rng = StdRng::seed_from_u64(3);
        let listener = SimulatedListener::voice();
        for _ in 0..20 {
            assert!(VOICE_DEMO_COMMANDS.contains(&listener.transcribe(&mut rng)));
        }
    }

    #[test]
    fn test_speaking_duration_scales_with_rate() {
        let text = "one two three four five six seven eight";
        let normal = speaking_duration(text, 1.0);
        let slow = speaking_duration(text, SPEECH_RATE);
        assert!(slow > normal);
        assert_eq!(speaking_duration("   ", 1.0), Duration::ZERO);
        assert_eq!(speaking_duration(text, 0.0), Duration::ZERO);
    }

    #[test]
    fn test_speaking_duration_rejects_non_finite_rate() {
        let text = "Welcome to AccessEase";
        assert_eq!(speaking_duration(text, f32::NAN), Duration::ZERO);
        assert_eq!(speaking_duration(text, f32::INFINITY), Duration::ZERO);
        assert_eq!(speaking_duration(text, f32::MIN_POSITIVE), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_completes_after_duration() {
        let listener = SimulatedListener::chat();
        let cancel = CancellationToken::new();
        let start = tokio::time::Instant::now();

        let heard = listener.listen("I have a billing question", &cancel).await;

        assert_eq!(heard, Some("I have a billing question"));
        assert!(start.elapsed() >= CHAT_LISTEN_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_stops_on_cancel() {
        let listener = SimulatedListener::voice();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(listener.listen("Read my messages", &cancel).await, None);
    }
}
