use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Tabs;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::ChatMode;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::SlashCommand;
use crate::domain::models::TextArea;
use crate::domain::services::actions::help_text;
use crate::domain::services::AppState;
use crate::domain::services::EventsService;

fn banner(app_state: &AppState) -> Paragraph<'static> {
    if app_state.active_mode == ChatMode::Azure {
        return Paragraph::new(app_state.azure_banner_text())
            .style(Style::default().fg(Color::Cyan));
    }

    if let Some(status) = &app_state.upload_status {
        let mut style = Style::default().fg(Color::Green);
        if !status.success {
            style = Style::default().fg(Color::Red);
        }

        return Paragraph::new(status.message.to_string()).style(style);
    }

    return Paragraph::new("");
}

fn render<B: Backend>(
    frame: &mut Frame<B>,
    app_state: &mut AppState,
    textarea: &tui_textarea::TextArea<'_>,
) {
    if !app_state.session_ready {
        Loading::new("Waiting for the document service to issue a session...")
            .render(frame, frame.size());
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Max(1),
            Constraint::Max(1),
            Constraint::Min(1),
            Constraint::Max(4),
        ])
        .split(frame.size());

    let titles = vec![
        Line::from(ChatMode::Upload.title()),
        Line::from(ChatMode::Azure.title()),
    ];
    let selected = match app_state.active_mode {
        ChatMode::Upload => 0,
        ChatMode::Azure => 1,
    };
    frame.render_widget(
        Tabs::new(titles).select(selected).highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        layout[0],
    );

    frame.render_widget(banner(app_state), layout[1]);

    if layout[2].width != app_state.last_known_width
        || layout[2].height != app_state.last_known_height
    {
        app_state.set_rect(layout[2]);
    }

    let uploading = app_state.uploading;
    let mode = app_state.active_mode;
    let pane = app_state.active_pane_mut();

    pane.bubble_list
        .render(frame, layout[2], pane.scroll.position);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        layout[2].inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut pane.scroll.scrollbar_state,
    );

    if pane.surface.waiting_for_backend {
        Loading::new("Thinking...").render(frame, layout[3]);
    } else if uploading && mode == ChatMode::Upload {
        Loading::new("Uploading documents...").render(frame, layout[3]);
    } else {
        frame.render_widget(textarea.widget(), layout[3]);
    }
}

fn handle_upload_command(
    app_state: &mut AppState,
    command: &SlashCommand,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<()> {
    if app_state.active_mode != ChatMode::Upload {
        app_state.add_app_message(
            "Uploads are available in the Local Document Chat tab. Press Tab to switch over.",
        );
        return Ok(());
    }

    // A second upload while one is in flight is dropped, not queued.
    if app_state.uploading {
        return Ok(());
    }

    let files = command.upload_paths();
    if files.is_empty() {
        app_state
            .add_app_message("You must pass at least one PDF to upload. Run `/help` for details.");
        return Ok(());
    }

    let missing = files
        .iter()
        .filter(|file| {
            return !file.exists();
        })
        .map(|file| {
            return file.to_string_lossy().to_string();
        })
        .collect::<Vec<String>>();
    if !missing.is_empty() {
        app_state.add_app_message(&format!(
            "The following files could not be found: {}",
            missing.join(", ")
        ));
        return Ok(());
    }

    app_state.uploading = true;
    app_state.upload_status = None;
    tx.send(Action::UploadDocuments(files, command.save_to_azure()))?;

    return Ok(());
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    events: &mut EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();

    loop {
        terminal.draw(|frame| {
            render(frame, app_state, &textarea);
        })?;

        match events.next().await? {
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCharInput(input) => {
                if app_state.session_ready && !app_state.active_pane().surface.waiting_for_backend
                {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if app_state.session_ready && !app_state.active_pane().surface.waiting_for_backend
                {
                    textarea.insert_str(&text);
                }
            }
            Event::KeyboardTab() => {
                if app_state.session_ready {
                    app_state.toggle_mode();
                }
            }
            Event::KeyboardEnter() => {
                if !app_state.session_ready {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    continue;
                }

                if let Some(command) = SlashCommand::parse(&input_str) {
                    textarea = TextArea::default();
                    if command.is_quit() {
                        break;
                    }
                    if command.is_help() {
                        app_state.add_app_message(&help_text());
                        continue;
                    }
                    if command.is_clear() {
                        tx.send(Action::ClearChat(app_state.active_mode))?;
                        continue;
                    }
                    if command.is_upload() {
                        handle_upload_command(app_state, &command, &tx)?;
                    }
                    continue;
                }

                let mode = app_state.active_mode;
                if app_state.begin_send(mode, &input_str) {
                    textarea = TextArea::default();
                    tx.send(Action::Query(mode, input_str))?;
                }
            }
            Event::UIScrollUp() => {
                app_state.active_pane_mut().scroll.up();
            }
            Event::UIScrollDown() => {
                app_state.active_pane_mut().scroll.down();
            }
            Event::UIScrollPageUp() => {
                app_state.active_pane_mut().scroll.up_page();
            }
            Event::UIScrollPageDown() => {
                app_state.active_pane_mut().scroll.down_page();
            }
            Event::UITick() => {}
            Event::UIResize() => {}
            Event::SessionReady(session_id) => {
                app_state.handle_session_ready(&session_id);
            }
            Event::ChatHistoryLoaded(mode, res) => {
                app_state.handle_history_loaded(mode, res);
            }
            Event::QueryCompleted(mode, res) => {
                app_state.handle_query_completed(mode, res);
            }
            Event::ChatCleared(mode, res) => {
                app_state.handle_chat_cleared(mode, res);
            }
            Event::AzureFilesLoaded(res) => {
                app_state.handle_azure_files_loaded(res);
            }
            Event::UploadCompleted(res) => {
                app_state.handle_upload_completed(res);
            }
            Event::UploadStatusExpired() => {
                app_state.handle_upload_status_expired();
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);

    tx.send(Action::StartSession())?;
    tx.send(Action::FetchChatHistory(ChatMode::Upload))?;
    tx.send(Action::FetchChatHistory(ChatMode::Azure))?;
    tx.send(Action::FetchAzureFiles())?;

    let mut app_state = AppState::new(ChatMode::parse(&Config::get(ConfigKey::Mode))?);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, &mut events).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
