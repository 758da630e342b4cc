//! Main application state.
//!
//! This module implements The Elm Architecture (TEA) pattern: every input
//! flows through [`App::update`] and [`App::view`] renders the current state.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;
use crate::entity::Record;
use crate::error::AppError;
use crate::events::Event;
use crate::filter::{FilterError, JsonField};
use crate::source::Source;
use crate::tasks::SourceMessage;
use crate::ui::{
    highlight_text, MultiSelect, MultiSelectAction, MultiSelectConfig, SpinnerStyle, Theme,
};

/// The picker over JSON records used by the binary.
pub type RecordPicker = MultiSelect<Record, JsonField>;

/// The main application struct that holds all state.
pub struct App {
    picker: RecordPicker,
    config: Config,
    source: Source,
    /// Whether the records are still being fetched.
    loading: bool,
    /// Last message for the status bar.
    status: Option<String>,
    should_quit: bool,
    /// Error that ended the session, reported after the terminal is restored.
    fatal: Option<AppError>,
}

impl App {
    /// Create the application for `source`, configured by `config`.
    pub fn new(config: Config, source: Source) -> Self {
        debug!(source = %source.describe(), "Creating application");
        let theme = Theme::by_name(&config.widget.theme);
        let picker_config = MultiSelectConfig {
            title: config.widget.title.clone(),
            placeholder: config.widget.placeholder.clone(),
            empty_text: config.widget.empty_text.clone(),
            loading_text: config.widget.loading_text.clone(),
            theme,
            spinner: SpinnerStyle::by_name(&config.widget.spinner),
        };

        let field = config.source.field.clone();
        let detail_field = config.source.detail_field.clone();
        let picker = MultiSelect::new(
            JsonField::new(field.clone()),
            config.filter_mode(),
            picker_config,
        )
        .with_renderer(move |record: &Record, ctx| {
            let label = record.get_str(&field).unwrap_or_default();
            let mut lines = vec![highlight_text(label, ctx.search, ctx.theme.match_style())];
            if let Some(detail) = detail_field.as_deref().and_then(|f| record.get(f)) {
                let text = match detail.as_str() {
                    Some(s) => s.to_string(),
                    None => detail.to_string(),
                };
                lines.push(Line::styled(text, Style::default().fg(ctx.theme.muted)));
            }
            lines
        });

        Self {
            picker,
            config,
            source,
            loading: true,
            status: None,
            should_quit: false,
            fatal: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn picker(&self) -> &RecordPicker {
        &self.picker
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The error that ended the session, if any.
    pub fn fatal(&self) -> Option<&AppError> {
        self.fatal.as_ref()
    }

    pub fn take_fatal(&mut self) -> Option<AppError> {
        self.fatal.take()
    }

    /// The selection as a pretty-printed JSON array.
    pub fn selection_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self.picker.selected())
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        self.update_at(event, Instant::now());
    }

    /// Update with `now` as the debounce clock.
    pub fn update_at(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key(key, now);
            }
            Event::Mouse(mouse) => {
                let result = self.picker.handle_mouse(mouse);
                self.handle_picker_result(result);
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {}
        }

        // Debounce deadlines are checked after every event, not only on ticks
        if let Err(e) = self.picker.tick_at(now) {
            self.fail(e.into());
        }
    }

    /// Apply the result of a background load.
    pub fn handle_message(&mut self, message: SourceMessage) {
        match message {
            SourceMessage::Loaded(Ok(records)) => {
                info!(count = records.len(), "Records loaded");
                self.loading = false;
                let count = records.len();
                match self.picker.set_options(Some(records)) {
                    Ok(()) => self.status = Some(format!("Loaded {} records", count)),
                    Err(e) => self.fail(e.into()),
                }
            }
            SourceMessage::Loaded(Err(e)) => {
                self.loading = false;
                self.fail(e.into());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            info!("Quit requested");
            self.should_quit = true;
            return;
        }

        let result = self.picker.handle_key_at(key, now);
        self.handle_picker_result(result);
    }

    fn handle_picker_result(
        &mut self,
        result: Result<Option<MultiSelectAction<Record>>, FilterError>,
    ) {
        match result {
            Ok(Some(action)) => self.handle_action(action),
            Ok(None) => {}
            Err(e) => self.fail(e.into()),
        }
    }

    fn handle_action(&mut self, action: MultiSelectAction<Record>) {
        let field = &self.config.source.field;
        let label = |record: &Record| {
            record
                .get_str(field)
                .map(str::to_string)
                .unwrap_or_else(|| record.id.to_string())
        };
        self.status = match &action {
            MultiSelectAction::Added(record) => Some(format!("Added {}", label(record))),
            MultiSelectAction::Removed(record) => Some(format!("Removed {}", label(record))),
            MultiSelectAction::Dismissed => None,
        };
        debug!(?action, selected = self.picker.selected().len(), "Picker action");
    }

    /// Record an error: critical ones end the session, others go to the status line.
    fn fail(&mut self, err: AppError) {
        if err.is_critical() {
            error!(error = %err, "Critical error occurred");
            self.should_quit = true;
            self.fatal = Some(err);
        } else {
            warn!(error = %err, "Recoverable error occurred");
            let message = err.user_message();
            self.picker.set_error(message.clone());
            self.status = Some(message);
        }
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        self.picker.render(frame, chunks[0]);
        self.render_footer(frame, chunks[1]);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.picker.config().theme;
        let state = if self.loading {
            format!("Loading {}", self.source.describe())
        } else {
            self.status
                .clone()
                .unwrap_or_else(|| format!("{} selected", self.picker.selected().len()))
        };
        let (state_style, state_text) = match self.picker.error() {
            Some(_) => (Style::default().fg(theme.error), state),
            None => (Style::default().fg(theme.fg), state),
        };

        let footer = Line::from(vec![
            Span::styled(
                " multipick ",
                Style::default().fg(theme.fg).bg(theme.tag),
            ),
            Span::raw(" "),
            Span::styled(state_text, state_style),
            Span::raw("  "),
            Span::styled(
                "↑↓ move  Enter toggle  ←→ tags  Esc close  Ctrl+Q done",
                Style::default().fg(theme.muted),
            ),
        ]);
        frame.render_widget(Paragraph::new(footer), area);
    }
}
