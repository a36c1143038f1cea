use accessease_core::{Category, DisabilityType, Provider, QuickAction};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Screen, VoicePhase};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        let bold = &after[..end];
        if bold.is_empty() {
            spans.push(Span::raw("****"));
        } else {
            spans.push(Span::styled(
                bold.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        rest = &after[end + 2..];
    }

    // Unclosed ** stays literal
    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

fn ellipsis(app: &App) -> String {
    ".".repeat((app.animation_frame as usize) + 1)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::DisabilityType => render_selection_screen(app, frame, body_area),
        Screen::Voice => render_voice_screen(app, frame, body_area),
        Screen::DeafAssistant => render_deaf_screen(app, frame, body_area),
        Screen::Chat => render_chat_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    if let Some(notice) = app.chat.notice.clone().filter(|_| app.screen == Screen::Chat) {
        render_notice(frame, area, " Voice Input ", &notice);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let provider = app.gateway.provider();
    let source = match (provider, app.gateway.model()) {
        (Provider::Mock, _) => " [mock]".to_string(),
        (Provider::Gemini, Some(model)) => format!(" [{}]", model),
        (Provider::Gemini, None) => " [no API key]".to_string(),
    };

    let title = Line::from(vec![
        Span::styled(format!(" {} ", app.screen.title()), Style::default().fg(Color::Cyan).bold()),
        Span::styled(source, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::DisabilityType => " START ",
        Screen::Voice => " VOICE ",
        Screen::DeafAssistant => " VISUAL ",
        Screen::Chat => " CHAT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: Vec<(&str, &str)> = match (app.screen, app.input_mode) {
        (Screen::DisabilityType, _) => vec![
            (" j/k ", " move "),
            (" Space ", " select "),
            (" Enter ", " continue "),
            (" q ", " quit "),
        ],
        (Screen::Voice, _) => vec![
            (" m ", if app.voice.phase == VoicePhase::Listening { " stop " } else { " speak " }),
            (" r ", " repeat "),
            (" Esc ", " back "),
        ],
        (Screen::DeafAssistant, _) => vec![
            (" 1-4 ", " category "),
            (" Enter ", " select "),
            (" c ", " clear "),
            (" PgUp/PgDn ", " scroll "),
            (" Esc ", " back "),
        ],
        (Screen::Chat, InputMode::Normal) => {
            let mut pairs = vec![(" i ", " type "), (" v ", " voice input ")];
            if app.chat.conversation.buttons_active() {
                pairs.push((" 1-3 ", " quick action "));
            }
            pairs.extend([(" j/k ", " scroll "), (" Esc ", " back ")]);
            pairs
        }
        (Screen::Chat, InputMode::Editing) => vec![(" Enter ", " send "), (" Esc ", " stop typing ")],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(pairs.into_iter().flat_map(|(key, label)| {
            [Span::styled(key, key_style), Span::styled(label, label_style)]
        }))
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_selection_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [question_area, list_area, notice_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(DisabilityType::all().len() as u16 + 2),
        Constraint::Min(0),
    ])
    .areas(area);

    let question = Paragraph::new("What type of disability do you have?")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(question, question_area);

    let items: Vec<ListItem> = DisabilityType::all()
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let radio = if app.selection.selected == Some(*kind) { "(•)" } else { "( )" };
            ListItem::new(format!("{} {}. {}", radio, i + 1, kind.label()))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Options "))
        .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut app.selection.list_state);

    let continue_style = if app.selection.selected.is_some() {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut lines = vec![Line::from(Span::styled("[ Continue ]", continue_style))];
    if let Some(notice) = app.selection.notice {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(notice, Style::default().fg(Color::Red))));
    }
    frame.render_widget(Paragraph::new(lines), notice_area);
}

fn render_voice_screen(app: &App, frame: &mut Frame, area: Rect) {
    let [status_area, heard_area, spoken_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let (status, color) = match app.voice.phase {
        VoicePhase::Idle => ("🎤 Tap to Speak".to_string(), Color::Blue),
        VoicePhase::Listening => (format!("🎤 Listening{}", ellipsis(app)), Color::Red),
        VoicePhase::Processing => (format!("Processing{}", ellipsis(app)), Color::Yellow),
        VoicePhase::Speaking => ("🔊 Speaking...".to_string(), Color::Green),
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(color).bold())
        .block(Block::default().borders(Borders::ALL).title(" Microphone "));
    frame.render_widget(status, status_area);

    let heard = if app.voice.transcribed.is_empty() {
        Span::styled("Nothing heard yet", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("\"{}\"", app.voice.transcribed))
    };
    let heard = Paragraph::new(Line::from(heard))
        .block(Block::default().borders(Borders::ALL).title(" You said "));
    frame.render_widget(heard, heard_area);

    let spoken = Paragraph::new(app.voice.spoken.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Assistant "));
    frame.render_widget(spoken, spoken_area);
}

fn render_deaf_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [categories_area, response_area] =
        Layout::horizontal([Constraint::Length(36), Constraint::Min(0)]).areas(area);

    let items: Vec<ListItem> = Category::all()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let marker = if app.deaf.selected == Some(*category) { "●" } else { " " };
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("{} {}. {}", marker, i + 1, category.title()),
                    Style::default().bold(),
                )),
                Line::from(Span::styled(
                    format!("     {}", category.description()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" How can I help you? "))
        .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black));
    frame.render_stateful_widget(list, categories_area, &mut app.deaf.list_state);

    let title = app
        .deaf
        .selected
        .map(|c| format!(" {} ", c.title()))
        .unwrap_or_else(|| " Response ".to_string());

    let text = if app.deaf.loading {
        Text::from(Span::styled(
            format!("Loading{}", ellipsis(app)),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else if app.deaf.response.is_empty() {
        Text::from(Span::styled(
            "Select a category to see information and resources.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.deaf.response.lines().map(parse_markdown_line).collect::<Vec<_>>())
    };

    let response = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.deaf.scroll, 0));
    frame.render_widget(response, response_area);
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat.chat_height = chat_area.height.saturating_sub(2);
    app.chat.chat_width = chat_area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();
    let last_id = app.chat.conversation.messages().last().map(|m| m.id);

    for msg in app.chat.conversation.messages() {
        let time = msg.timestamp.format("%H:%M").to_string();
        if msg.is_user {
            lines.push(Line::from(vec![
                Span::styled("You:", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {}", time), Style::default().fg(Color::DarkGray)),
            ]));
            lines.push(Line::from(msg.text.clone()));
        } else {
            lines.push(Line::from(vec![
                Span::styled("AI:", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {}", time), Style::default().fg(Color::DarkGray)),
            ]));
            for line in msg.text.lines() {
                lines.push(parse_markdown_line(line));
            }
            if msg.has_buttons {
                // Older button rows are shown dimmed; only the newest is live
                let live = Some(msg.id) == last_id;
                let style = if live {
                    Style::default().fg(Color::Black).bg(Color::Green)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                for (i, action) in QuickAction::all().iter().enumerate() {
                    lines.push(Line::from(vec![
                        Span::raw("  "),
                        Span::styled(format!(" {} {} ", i + 1, action.label()), style),
                        Span::styled(" Select", Style::default().fg(Color::DarkGray)),
                    ]));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.chat.loading {
        lines.push(Line::from(Span::styled(
            format!("AI is typing{}", ellipsis(app)),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Messages "))
        .wrap(Wrap { trim: true })
        .scroll((app.chat.scroll, 0));
    frame.render_widget(chat, chat_area);

    let editing = app.input_mode == InputMode::Editing;
    let (input_text, input_style) = if app.chat.listening {
        (format!("Listening{}", ellipsis(app)), Style::default().fg(Color::Red))
    } else if app.chat.input.is_empty() && !editing {
        ("Type a message...".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (app.chat.input.clone(), Style::default())
    };

    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }))
            .title(" Message "),
    );
    frame.render_widget(input, input_area);

    if editing {
        let cursor_x = (app.chat.cursor as u16).min(input_area.width.saturating_sub(3));
        frame.set_cursor_position((input_area.x + 1 + cursor_x, input_area.y + 1));
    }
}

fn render_notice(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    // Calculate popup size and position (centered, above the input box)
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    // Clip to the frame; Clear writes to every cell it is given
    let popup_area =
        Rect::new(area.x + popup_x, area.y + popup_y, popup_width, popup_height).intersection(area);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let text = Text::from(vec![
        Line::from(message.to_string()),
        Line::from(Span::styled("Press i to edit and send", Style::default().fg(Color::DarkGray))),
    ]);

    let popup = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title.to_string()),
    );
    frame.render_widget(popup, popup_area);
}
