use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick(),
    }
    app.poll_pending().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::DisabilityType => handle_selection(app, key),
        Screen::Voice => handle_voice(app, key),
        Screen::DeafAssistant => handle_deaf(app, key),
        Screen::Chat => match app.input_mode {
            InputMode::Normal => handle_chat_normal(app, key),
            InputMode::Editing => handle_chat_editing(app, key),
        },
    }
}

fn handle_selection(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.selection_up(),
        KeyCode::Char(' ') => app.select_highlighted_type(),
        KeyCode::Char(c @ '1'..='3') => app.select_type(digit_index(c)),
        KeyCode::Enter => app.continue_to_assistant(),
        _ => {}
    }
}

fn handle_voice(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Char('m') | KeyCode::Enter => app.toggle_microphone(),
        KeyCode::Char('r') | KeyCode::Char(' ') => app.repeat_greeting(),
        _ => {}
    }
}

fn handle_deaf(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Char('j') | KeyCode::Down => app.category_down(),
        KeyCode::Char('k') | KeyCode::Up => app.category_up(),
        KeyCode::Enter => app.select_highlighted_category(),
        KeyCode::Char(c @ '1'..='4') => app.select_category(digit_index(c)),
        KeyCode::Char('c') => app.clear_category(),
        KeyCode::PageDown => app.deaf.scroll = app.deaf.scroll.saturating_add(5),
        KeyCode::PageUp => app.deaf.scroll = app.deaf.scroll.saturating_sub(5),
        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Char('i') | KeyCode::Enter => {
            app.chat.notice = None;
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('v') => app.start_chat_listening(),
        KeyCode::Char(c @ '1'..='3') => app.quick_action(digit_index(c) + 1),
        KeyCode::Char('j') | KeyCode::Down => app.chat_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.chat_scroll_up(),
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    let chat = &mut app.chat;
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.submit_chat_input();
        }
        KeyCode::Backspace => {
            if chat.cursor > 0 {
                chat.cursor -= 1;
                let byte_pos = char_to_byte_index(&chat.input, chat.cursor);
                chat.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = chat.input.chars().count();
            if chat.cursor < char_count {
                let byte_pos = char_to_byte_index(&chat.input, chat.cursor);
                chat.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            chat.cursor = chat.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = chat.input.chars().count();
            chat.cursor = (chat.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            chat.cursor = 0;
        }
        KeyCode::End => {
            chat.cursor = chat.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&chat.input, chat.cursor);
            chat.input.insert(byte_pos, c);
            chat.cursor += 1;
        }
        _ => {}
    }
}

/// '1' -> 0
fn digit_index(c: char) -> usize {
    c.to_digit(10).map(|d| d as usize).unwrap_or(1).saturating_sub(1)
}
