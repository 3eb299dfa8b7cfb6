mod app;
mod logging;
mod tui;
mod ui;

use std::collections::HashMap;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;

use academy_core::config::{
    LESSONS_URL_VAR, SCHOOLS_URL_VAR, SERIES_URL_VAR, TIMEOUT_VAR, TOKEN_VAR,
};
use academy_core::{AdminClient, AdminConfig, BulkDeleteCoordinator, TableId};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, style::Style, widgets::Widget};
use tracing::info;

use app::{Action, AppMode, AppState, TableLoader};
use tui::{AppEvent, EventHandler, handle_key};
use ui::{
    AppLayout, ConfirmDeleteView, DeleteProgressView, Footer, Header, HelpView, MessageView,
    ModalView, TableView, Theme, modal_visible_rows,
};

const APP_NAME: &str = "academy-admin";

/// Terminal console for managing lessons, series and schools of the academy catalog
#[derive(Parser, Debug)]
#[command(name = "academy-admin")]
#[command(version)]
struct Args {
    /// `.env`-style config file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lessons list endpoint
    #[arg(long)]
    lessons_url: Option<String>,

    /// Schools list endpoint
    #[arg(long)]
    schools_url: Option<String>,

    /// Series list endpoint
    #[arg(long)]
    series_url: Option<String>,

    /// Authenticity token field name sent with deletes
    #[arg(long)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Log file (defaults to the user cache dir)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Flags given on the command line, keyed like the config variables
    fn overrides(&self) -> HashMap<String, String> {
        [
            (LESSONS_URL_VAR, self.lessons_url.clone()),
            (SCHOOLS_URL_VAR, self.schools_url.clone()),
            (SERIES_URL_VAR, self.series_url.clone()),
            (TOKEN_VAR, self.token.clone()),
            (TIMEOUT_VAR, self.timeout.map(|t| t.to_string())),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
    }

    fn config_file(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(APP_NAME).join(".env"))
                .filter(|p| p.is_file())
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    // Held until main returns so buffered lines reach the file
    let log_file = logging::init_logging(args.log_file.clone(), APP_NAME)?;

    let config_file = args.config_file();
    let config = AdminConfig::load(config_file.as_deref(), &args.overrides())
        .wrap_err("loading configuration")?;
    info!(
        config_file = ?config_file,
        log_file = ?log_file.as_ref().map(|f| f.dir.join(&f.prefix)),
        timeout_secs = config.request_timeout.as_secs(),
        "starting"
    );

    let client = Arc::new(AdminClient::new(&config.token, config.request_timeout)?);
    let coordinator = BulkDeleteCoordinator::new(client.clone(), config.batch_deadline());
    let loader = TableLoader::new(client, config);
    let mut state = AppState::new(coordinator, loader);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    let stats = &state.session_stats;
    info!(
        deleted = stats.items_deleted,
        failed = stats.items_failed,
        "exiting"
    );
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let theme = Theme::default();
    let event_handler = EventHandler::new(50); // 50ms tick rate

    state.load_all();

    loop {
        state.poll_loads();
        state.poll_deletes();

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::new(area);

            frame
                .buffer_mut()
                .set_style(area, Style::default().bg(theme.bg));

            // Visible rows of whichever table the cursor moves in
            state.visible_height = if state.modal.is_some() {
                modal_visible_rows(layout.table)
            } else {
                layout.table.height.saturating_sub(1) as usize
            };

            Header::new(state, &theme).render(layout.header, frame.buffer_mut());

            TableView::new(state.tab, state.table(state.tab), &state.tracker, &theme)
                .loading(state.loader.is_loading(state.tab), state.spinner_frame)
                .render(layout.table, frame.buffer_mut());

            if let Some(modal) = &state.modal {
                ModalView::new(
                    &modal.title,
                    state.table(TableId::Modal),
                    &state.tracker,
                    &theme,
                )
                .loading(state.loader.is_loading(TableId::Modal), state.spinner_frame)
                .render(layout.table, frame.buffer_mut());
            }

            match state.mode {
                AppMode::Browsing => {}
                AppMode::Help => HelpView::new(&theme).render(area, frame.buffer_mut()),
                AppMode::Confirm => {
                    if let Some(prompt) = &state.prompt {
                        ConfirmDeleteView::new(prompt, &theme).render(area, frame.buffer_mut());
                    }
                }
                AppMode::Deleting => {
                    if let Some((table, progress)) = state.shown_progress() {
                        DeleteProgressView::new(table, progress, &theme)
                            .render(area, frame.buffer_mut());
                    }
                }
                AppMode::Message => {
                    if let Some(message) = state.current_message() {
                        MessageView::new(message, state.messages.len() - 1, &theme)
                            .render(area, frame.buffer_mut());
                    }
                }
            }

            Footer::new(
                state.mode,
                state.modal.is_some(),
                &theme,
                &state.session_stats,
            )
            .render(layout.footer, frame.buffer_mut());
        })?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode, state.modal.is_some());
                handle_action(state, action);
            }
            AppEvent::Resize => {
                // Terminal will redraw on next loop
            }
            AppEvent::Tick => {
                state.tick_spinner();
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(state: &mut AppState, action: Action) {
    match action {
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::PageUp => state.page_up(),
        Action::PageDown => state.page_down(),
        Action::GoToFirst => state.go_to_first(),
        Action::GoToLast => state.go_to_last(),
        Action::NextTable => state.next_table(),
        Action::PrevTable => state.prev_table(),
        Action::ToggleCheck => state.toggle_check(),
        Action::SelectNone => state.select_none(),
        Action::Delete => state.request_delete(),
        Action::ViewLessons => state.view_lessons(),
        Action::Refresh => state.refresh_active(),
        Action::CloseModal => state.close_modal(),
        Action::ShowHelp => state.show_help(),
        Action::HideHelp => state.hide_help(),
        Action::ConfirmDelete => state.confirm_delete(),
        Action::CancelDelete => state.cancel_delete(),
        Action::HideProgress => state.hide_progress(),
        Action::DismissMessage => state.dismiss_message(),
        Action::Quit => state.quit(),
        Action::Tick => {}
    }
}
