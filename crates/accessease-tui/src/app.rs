use std::future::Future;
use std::sync::Arc;

use accessease_core::speech::{speaking_duration, SPEECH_RATE};
use accessease_core::state::VOICE_GREETING;
use accessease_core::{
    AssistantGateway, Category, Config, Conversation, DisabilityType, QuickAction,
    SimulatedListener, MOTOR_CONTEXT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const SELECTION_REQUIRED: &str = "Please select a disability type to continue.";
pub const CHAT_ERROR_REPLY: &str = "I'm sorry, I'm having trouble responding right now. Please try again.";
pub const CATEGORY_ERROR_REPLY: &str =
    "Sorry, I encountered an error. Please try again or contact support for assistance.";
pub const VOICE_ERROR_REPLY: &str =
    "I'm sorry, I encountered an error processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    DisabilityType,
    Voice,
    DeafAssistant,
    Chat,
}

impl Screen {
    pub fn for_disability(kind: DisabilityType) -> Self {
        match kind {
            DisabilityType::Blind => Screen::Voice,
            DisabilityType::Deaf => Screen::DeafAssistant,
            DisabilityType::Motor => Screen::Chat,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::DisabilityType => "AccessEase",
            Screen::Voice => DisabilityType::Blind.assistant_name(),
            Screen::DeafAssistant => DisabilityType::Deaf.assistant_name(),
            Screen::Chat => DisabilityType::Motor.assistant_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Background work a screen is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    VoiceListen,
    VoiceReply,
    CategoryReply(Category),
    ChatListen,
    ChatReply,
}

impl TaskKind {
    fn screen(&self) -> Screen {
        match self {
            TaskKind::VoiceListen | TaskKind::VoiceReply => Screen::Voice,
            TaskKind::CategoryReply(_) => Screen::DeafAssistant,
            TaskKind::ChatListen | TaskKind::ChatReply => Screen::Chat,
        }
    }
}

pub struct PendingTask {
    pub kind: TaskKind,
    handle: JoinHandle<Option<String>>,
}

#[derive(Debug)]
pub struct SelectionState {
    pub list_state: ListState,
    pub selected: Option<DisabilityType>,
    pub notice: Option<&'static str>,
}

impl Default for SelectionState {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            selected: None,
            notice: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoicePhase {
    #[default]
    Idle,
    Listening,
    Processing,
    Speaking,
}

#[derive(Debug, Default)]
pub struct VoiceState {
    pub phase: VoicePhase,
    pub transcribed: String,
    pub spoken: String,
    pub speaking_until: Option<Instant>,
}

#[derive(Debug)]
pub struct DeafState {
    pub list_state: ListState,
    pub selected: Option<Category>,
    pub response: String,
    pub loading: bool,
    pub scroll: u16,
}

impl Default for DeafState {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            selected: None,
            response: String::new(),
            loading: false,
            scroll: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct ChatState {
    pub conversation: Conversation,
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars
    pub loading: bool,
    pub listening: bool,
    pub notice: Option<String>,
    pub scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    pub selection: SelectionState,
    pub voice: VoiceState,
    pub deaf: DeafState,
    pub chat: ChatState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub gateway: Arc<AssistantGateway>,
    pending: Option<PendingTask>,
    /// Simulated chat voice input; runs alongside a chat request.
    listen_task: Option<PendingTask>,
    /// Cancelled whenever the active screen is left.
    screen_token: CancellationToken,
    rng: StdRng,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let rng = match config.mock_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_gateway(config.build_gateway(), rng)
    }

    pub fn with_gateway(gateway: AssistantGateway, rng: StdRng) -> Self {
        Self {
            should_quit: false,
            screen: Screen::DisabilityType,
            input_mode: InputMode::Normal,

            selection: SelectionState::default(),
            voice: VoiceState::default(),
            deaf: DeafState::default(),
            chat: ChatState::default(),

            animation_frame: 0,

            gateway: Arc::new(gateway),
            pending: None,
            listen_task: None,
            screen_token: CancellationToken::new(),
            rng,
        }
    }

    /// True while a request or screen action is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_kind(&self) -> Option<TaskKind> {
        self.pending.as_ref().map(|p| p.kind)
    }

    // Navigation

    /// Leaves the current screen: outstanding work is cancelled and its
    /// results will be dropped.
    pub fn leave_screen(&mut self) {
        self.screen_token.cancel();
        for task in [self.pending.take(), self.listen_task.take()].into_iter().flatten() {
            debug!(kind = ?task.kind, "abandoning pending task");
            task.handle.abort();
        }
        self.screen_token = CancellationToken::new();
    }

    pub fn navigate(&mut self, screen: Screen) {
        self.leave_screen();
        info!(from = ?self.screen, to = ?screen, "navigate");

        self.screen = screen;
        self.input_mode = InputMode::Normal;
        match screen {
            Screen::DisabilityType => self.selection = SelectionState::default(),
            Screen::Voice => {
                self.voice = VoiceState::default();
                self.greet();
            }
            Screen::DeafAssistant => self.deaf = DeafState::default(),
            Screen::Chat => self.chat = ChatState::default(),
        }
    }

    pub fn go_back(&mut self) {
        self.navigate(Screen::DisabilityType);
    }

    // Disability type selection

    pub fn selection_down(&mut self) {
        let len = DisabilityType::all().len();
        let i = self.selection.list_state.selected().unwrap_or(0);
        self.selection.list_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn selection_up(&mut self) {
        let i = self.selection.list_state.selected().unwrap_or(0);
        self.selection.list_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_highlighted_type(&mut self) {
        if let Some(i) = self.selection.list_state.selected() {
            self.select_type(i);
        }
    }

    pub fn select_type(&mut self, idx: usize) {
        if let Some(kind) = DisabilityType::all().get(idx).copied() {
            self.selection.list_state.select(Some(idx));
            self.selection.selected = Some(kind);
            self.selection.notice = None;
        }
    }

    pub fn continue_to_assistant(&mut self) {
        match self.selection.selected {
            Some(kind) => self.navigate(Screen::for_disability(kind)),
            None => self.selection.notice = Some(SELECTION_REQUIRED),
        }
    }

    // Background tasks

    fn spawn_task<F>(&self, kind: TaskKind, work: F) -> PendingTask
    where
        F: Future<Output = Option<String>> + Send + 'static,
    {
        let token = self.screen_token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => None,
                out = work => out,
            }
        });
        PendingTask { kind, handle }
    }

    fn spawn<F>(&mut self, kind: TaskKind, work: F)
    where
        F: Future<Output = Option<String>> + Send + 'static,
    {
        self.pending = Some(self.spawn_task(kind, work));
    }

    /// Applies the results of finished tasks, if any.
    pub async fn poll_pending(&mut self) {
        if let Some(task) = take_finished(&mut self.pending) {
            self.finish(task).await;
        }
        if let Some(task) = take_finished(&mut self.listen_task) {
            self.finish(task).await;
        }
    }

    async fn finish(&mut self, task: PendingTask) {
        match task.handle.await {
            Ok(Some(text)) if task.kind.screen() == self.screen => self.apply_result(task.kind, text),
            Ok(_) => debug!(kind = ?task.kind, "discarding late result"),
            Err(e) => {
                warn!(kind = ?task.kind, error = %e, "background task failed");
                self.apply_failure(task.kind);
            }
        }
    }

    fn apply_result(&mut self, kind: TaskKind, text: String) {
        match kind {
            TaskKind::VoiceListen => {
                self.voice.transcribed = text.clone();
                self.process_voice_command(text);
            }
            TaskKind::VoiceReply => self.speak(&text),
            TaskKind::CategoryReply(category) => {
                if self.deaf.selected == Some(category) {
                    self.deaf.response = text;
                }
                self.deaf.loading = false;
            }
            TaskKind::ChatListen => {
                self.chat.listening = false;
                self.chat.cursor = text.chars().count();
                self.chat.notice = Some(format!("Simulated voice input: \"{}\"", text));
                self.chat.input = text;
            }
            TaskKind::ChatReply => {
                self.chat.conversation.push_assistant(&text);
                self.chat.loading = false;
                self.scroll_chat_to_bottom();
            }
        }
    }

    fn apply_failure(&mut self, kind: TaskKind) {
        if kind.screen() != self.screen {
            return;
        }
        match kind {
            TaskKind::VoiceListen => self.voice.phase = VoicePhase::Idle,
            TaskKind::VoiceReply => self.speak(VOICE_ERROR_REPLY),
            TaskKind::CategoryReply(_) => {
                self.deaf.response = CATEGORY_ERROR_REPLY.to_string();
                self.deaf.loading = false;
            }
            TaskKind::ChatListen => self.chat.listening = false,
            TaskKind::ChatReply => {
                self.chat.conversation.push_notice(CHAT_ERROR_REPLY);
                self.chat.loading = false;
                self.scroll_chat_to_bottom();
            }
        }
    }

    // Voice assistant

    pub fn greet(&mut self) {
        self.speak(VOICE_GREETING);
    }

    /// Simulated text-to-speech: shows the text and stays in `Speaking`
    /// for as long as reading it aloud would take.
    pub fn speak(&mut self, text: &str) {
        self.voice.spoken = text.to_string();
        self.voice.phase = VoicePhase::Speaking;
        self.voice.speaking_until = Some(Instant::now() + speaking_duration(text, SPEECH_RATE));
    }

    /// Screen tap: repeat the greeting when nothing else is going on.
    pub fn repeat_greeting(&mut self) {
        if self.voice.phase == VoicePhase::Idle {
            self.greet();
        }
    }

    pub fn toggle_microphone(&mut self) {
        match self.voice.phase {
            VoicePhase::Listening => self.stop_listening(),
            VoicePhase::Idle => self.start_listening(),
            VoicePhase::Processing | VoicePhase::Speaking => {}
        }
    }

    fn start_listening(&mut self) {
        let listener = SimulatedListener::voice();
        let heard = listener.transcribe(&mut self.rng);
        let token = self.screen_token.clone();

        self.voice.phase = VoicePhase::Listening;
        self.voice.transcribed.clear();
        self.spawn(TaskKind::VoiceListen, async move {
            listener.listen(heard, &token).await.map(str::to_string)
        });
    }

    fn stop_listening(&mut self) {
        if let Some(task) = self.pending.take() {
            task.handle.abort();
        }
        self.voice.phase = VoicePhase::Idle;
    }

    fn process_voice_command(&mut self, command: String) {
        self.voice.phase = VoicePhase::Processing;
        let gateway = Arc::clone(&self.gateway);
        self.spawn(TaskKind::VoiceReply, async move {
            Some(gateway.voice_reply(&command).await)
        });
    }

    // Visual (deaf) assistant

    pub fn category_down(&mut self) {
        let len = Category::all().len();
        let i = self.deaf.list_state.selected().unwrap_or(0);
        self.deaf.list_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn category_up(&mut self) {
        let i = self.deaf.list_state.selected().unwrap_or(0);
        self.deaf.list_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_highlighted_category(&mut self) {
        if let Some(i) = self.deaf.list_state.selected() {
            self.select_category(i);
        }
    }

    pub fn select_category(&mut self, idx: usize) {
        let Some(category) = Category::all().get(idx).copied() else {
            return;
        };
        if self.is_busy() {
            return;
        }

        self.deaf.list_state.select(Some(idx));
        self.deaf.selected = Some(category);
        self.deaf.response.clear();
        self.deaf.loading = true;
        self.deaf.scroll = 0;

        let gateway = Arc::clone(&self.gateway);
        self.spawn(TaskKind::CategoryReply(category), async move {
            Some(gateway.category_reply(category.id()).await)
        });
    }

    pub fn clear_category(&mut self) {
        if let Some(task) = self.pending.take() {
            task.handle.abort();
        }
        self.deaf.selected = None;
        self.deaf.response.clear();
        self.deaf.loading = false;
        self.deaf.scroll = 0;
    }

    // Chat

    /// Sends trimmed `text`; blank input or an outstanding request is ignored.
    pub fn send_chat_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() || self.is_busy() {
            return;
        }

        self.chat.conversation.push_user(text);
        self.chat.input.clear();
        self.chat.cursor = 0;
        self.chat.notice = None;
        self.chat.loading = true;
        self.scroll_chat_to_bottom();

        let gateway = Arc::clone(&self.gateway);
        let message = text.to_string();
        self.spawn(TaskKind::ChatReply, async move {
            Some(gateway.reply(&message, MOTOR_CONTEXT).await)
        });
    }

    pub fn submit_chat_input(&mut self) {
        let input = self.chat.input.clone();
        self.send_chat_message(&input);
    }

    /// Quick action by 1-based index, only while the latest reply offers them.
    pub fn quick_action(&mut self, n: usize) {
        if !self.chat.conversation.buttons_active() {
            return;
        }
        if let Some(action) = QuickAction::from_index(n) {
            self.send_chat_message(action.message());
        }
    }

    /// Independent of the reply task, so typing and sending stay available.
    pub fn start_chat_listening(&mut self) {
        if self.listen_task.is_some() {
            return;
        }
        let listener = SimulatedListener::chat();
        let heard = listener.transcribe(&mut self.rng);
        let token = self.screen_token.clone();

        self.chat.listening = true;
        self.chat.notice = None;
        self.listen_task = Some(self.spawn_task(TaskKind::ChatListen, async move {
            listener.listen(heard, &token).await.map(str::to_string)
        }));
    }

    pub fn chat_scroll_down(&mut self) {
        self.chat.scroll = self.chat.scroll.saturating_add(1);
    }

    pub fn chat_scroll_up(&mut self) {
        self.chat.scroll = self.chat.scroll.saturating_sub(1);
    }

    /// Scroll chat so the newest line (or "typing" indicator) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat.chat_width > 0 {
            self.chat.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;
        for msg in self.chat.conversation.messages() {
            total_lines += 1; // "You:" or "AI:"
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                total_lines += (char_count / wrap_width) + 1;
            }
            if msg.has_buttons {
                total_lines += QuickAction::all().len();
            }
            total_lines += 1;
        }
        if self.chat.loading {
            total_lines += 1; // "AI is typing..."
        }
        let total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);

        let visible_height = if self.chat.chat_height > 0 {
            self.chat.chat_height
        } else {
            20
        };

        self.chat.scroll = total_lines.saturating_sub(visible_height);
    }

    /// Tick: ellipsis animation and end of simulated speech.
    pub fn tick(&mut self) {
        if self.is_busy() || self.listen_task.is_some() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        if self.voice.phase == VoicePhase::Speaking
            && self.voice.speaking_until.is_some_and(|t| Instant::now() >= t)
        {
            self.voice.phase = VoicePhase::Idle;
            self.voice.speaking_until = None;
        }
    }
}

fn take_finished(slot: &mut Option<PendingTask>) -> Option<PendingTask> {
    if slot.as_ref().is_some_and(|t| t.handle.is_finished()) {
        slot.take()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessease_core::{Latency, MockResponder, FALLBACK_REPLY};
    use std::time::Duration;

    fn app() -> App {
        let responder = MockResponder::new(StdRng::seed_from_u64(1));
        App::with_gateway(AssistantGateway::mock(responder), StdRng::seed_from_u64(2))
    }

    async fn settle(app: &mut App) {
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            app.poll_pending().await;
            if !app.is_busy() && !app.chat.listening {
                break;
            }
        }
    }

    async fn crash() -> Option<String> {
        panic!("background task crashed")
    }

    async fn drain(app: &mut App) {
        for _ in 0..100 {
            if !app.is_busy() {
                break;
            }
            tokio::task::yield_now().await;
            app.poll_pending().await;
        }
    }

    #[test]
    fn test_continue_requires_selection() {
        let mut app = app();
        app.continue_to_assistant();
        assert_eq!(app.screen, Screen::DisabilityType);
        assert_eq!(app.selection.notice, Some(SELECTION_REQUIRED));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_routes_to_assistants() {
        let mut app = app();
        for (idx, screen) in [(0, Screen::Voice), (1, Screen::DeafAssistant), (2, Screen::Chat)] {
            app.go_back();
            app.select_type(idx);
            app.continue_to_assistant();
            assert_eq!(app.screen, screen);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_round_trip_adds_reply_with_buttons() {
        let mut app = app();
        app.navigate(Screen::Chat);

        app.chat.input = "  I need help with my account  ".to_string();
        app.submit_chat_input();
        assert!(app.chat.loading);
        assert!(app.chat.input.is_empty());

        settle(&mut app).await;

        let messages = app.chat.conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, "I need help with my account");
        assert!(messages[2].text.starts_with("I can help you with account-related issues"));
        assert!(app.chat.conversation.buttons_active());
        assert!(!app.chat.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_action_sends_canned_message() {
        let mut app = app();
        app.navigate(Screen::Chat);

        // greeting has no buttons
        app.quick_action(2);
        assert!(!app.is_busy());

        app.send_chat_message("help");
        settle(&mut app).await;
        app.quick_action(3);
        settle(&mut app).await;

        let messages = app.chat.conversation.messages();
        assert_eq!(messages[3].text, "I have a billing question");
        assert!(messages[4].text.starts_with("I can help with billing questions!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_one_outstanding_request() {
        let mut app = app();
        app.navigate(Screen::Chat);
        app.send_chat_message("first");
        app.send_chat_message("second");
        settle(&mut app).await;

        let user_messages: Vec<_> = app
            .chat
            .conversation
            .messages()
            .iter()
            .filter(|m| m.is_user)
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(user_messages, vec!["first"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_screen_discards_late_reply() {
        let mut app = app();
        app.navigate(Screen::DeafAssistant);
        app.select_category(0);
        assert!(app.deaf.loading);

        app.go_back();
        assert!(!app.is_busy());
        tokio::time::sleep(Duration::from_secs(5)).await;
        app.poll_pending().await;

        app.navigate(Screen::DeafAssistant);
        assert!(app.deaf.response.is_empty());
        assert_eq!(app.deaf.selected, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_category_reply_rendered_verbatim() {
        let mut app = app();
        app.navigate(Screen::DeafAssistant);
        app.select_category(2);
        settle(&mut app).await;

        assert_eq!(app.deaf.selected, Some(Category::Emergency));
        assert_eq!(app.deaf.response, Category::Emergency.body());
        assert!(!app.deaf.loading);

        app.clear_category();
        assert!(app.deaf.response.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_voice_listen_process_speak_cycle() {
        let mut app = app();
        app.navigate(Screen::Voice);
        assert_eq!(app.voice.phase, VoicePhase::Speaking);
        assert_eq!(app.voice.spoken, VOICE_GREETING);

        // mic is ignored while speaking
        app.toggle_microphone();
        assert!(!app.is_busy());

        tokio::time::sleep(Duration::from_secs(60)).await;
        app.tick();
        assert_eq!(app.voice.phase, VoicePhase::Idle);

        app.toggle_microphone();
        assert_eq!(app.voice.phase, VoicePhase::Listening);
        settle(&mut app).await;

        assert!(accessease_core::speech::VOICE_DEMO_COMMANDS.contains(&app.voice.transcribed.as_str()));
        assert_eq!(app.voice.phase, VoicePhase::Speaking);
        assert_ne!(app.voice.spoken, VOICE_GREETING);
    }

    #[tokio::test(start_paused = true)]
    async fn test_voice_stop_listening() {
        let mut app = app();
        app.navigate(Screen::Voice);
        app.voice.phase = VoicePhase::Idle;

        app.toggle_microphone();
        app.toggle_microphone();
        assert_eq!(app.voice.phase, VoicePhase::Idle);
        assert!(!app.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_voice_input_fills_input() {
        let mut app = app();
        app.navigate(Screen::Chat);
        app.start_chat_listening();
        assert!(app.chat.listening);
        settle(&mut app).await;

        assert!(!app.chat.listening);
        assert!(accessease_core::speech::CHAT_DEMO_INPUTS.contains(&app.chat.input.as_str()));
        assert_eq!(app.chat.cursor, app.chat.input.chars().count());
        assert!(app.chat.notice.as_deref().is_some_and(|n| n.starts_with("Simulated voice input")));
    }

    #[tokio::test]
    async fn test_live_gateway_without_key_shows_fallback() {
        let responder = MockResponder::new(StdRng::seed_from_u64(1)).with_latency(Latency::NONE, Latency::NONE);
        let mut app = App::with_gateway(AssistantGateway::gemini(None, responder), StdRng::seed_from_u64(2));
        app.navigate(Screen::Chat);
        app.send_chat_message("hello");
        while app.is_busy() {
            tokio::task::yield_now().await;
            app.poll_pending().await;
        }

        assert_eq!(app.chat.conversation.messages().last().map(|m| m.text.as_str()), Some(FALLBACK_REPLY));
    }

    #[tokio::test]
    async fn test_failed_chat_reply_shows_error_notice() {
        let mut app = app();
        app.navigate(Screen::Chat);
        app.chat.loading = true;
        app.spawn(TaskKind::ChatReply, crash());
        drain(&mut app).await;

        let last = app.chat.conversation.messages().last().cloned();
        assert_eq!(last.as_ref().map(|m| m.text.as_str()), Some(CHAT_ERROR_REPLY));
        assert!(last.is_some_and(|m| !m.is_user && !m.has_buttons));
        assert!(!app.chat.loading);
        assert!(!app.is_busy());
    }

    #[tokio::test]
    async fn test_failed_category_reply_shows_error_line() {
        let mut app = app();
        app.navigate(Screen::DeafAssistant);
        app.deaf.selected = Some(Category::Documents);
        app.deaf.loading = true;
        app.spawn(TaskKind::CategoryReply(Category::Documents), crash());
        drain(&mut app).await;

        assert_eq!(app.deaf.response, CATEGORY_ERROR_REPLY);
        assert!(!app.deaf.loading);
    }

    #[tokio::test]
    async fn test_failed_voice_reply_speaks_error_line() {
        let mut app = app();
        app.navigate(Screen::Voice);
        app.voice.phase = VoicePhase::Processing;
        app.spawn(TaskKind::VoiceReply, crash());
        drain(&mut app).await;

        assert_eq!(app.voice.spoken, VOICE_ERROR_REPLY);
        assert_eq!(app.voice.phase, VoicePhase::Speaking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_can_send_while_listening() {
        let mut app = app();
        app.navigate(Screen::Chat);
        app.start_chat_listening();
        assert!(app.chat.listening);
        assert!(!app.is_busy());

        app.send_chat_message("I have a billing question");
        assert!(app.is_busy());
        // a second listen request is ignored while one is running
        app.start_chat_listening();
        settle(&mut app).await;

        let messages = app.chat.conversation.messages();
        assert_eq!(messages[1].text, "I have a billing question");
        assert!(messages[2].text.starts_with("I can help with billing questions!"));
        assert!(!app.chat.listening);
        assert!(accessease_core::speech::CHAT_DEMO_INPUTS.contains(&app.chat.input.as_str()));
    }

    #[test]
    fn test_scroll_to_bottom_counts_typing_row_once() {
        let mut app = app();
        app.chat.chat_width = 50;
        app.chat.chat_height = 3;

        // greeting: label, one text line, spacer
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat.scroll, 0);

        app.chat.loading = true;
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat.scroll, 1);
    }

    #[test]
    fn test_scroll_to_bottom_saturates_on_long_history() {
        let mut app = app();
        let long = "x".repeat(1000);
        for _ in 0..5000 {
            app.chat.conversation.push_user(&long);
        }

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat.scroll, u16::MAX - 20);
    }
}
