//! Multi-select picker with type-ahead filtering and removable tags.
//!
//! The picker owns a [`FilterEngine`], a [`SelectionSet`] and a [`Navigator`]
//! and wires them to terminal input:
//!
//! - typing edits the search text and re-filters the suggestions
//! - Up/Down move the highlight through the suggestions
//! - Left/Right move focus across the selected tags
//! - Enter toggles the highlighted suggestion (or the focused tag)
//! - Backspace drops the last selected tag
//! - Esc clears the search and closes the list
//!
//! Mouse clicks on a suggestion, a tag or the caret act directly, without
//! going through the keyboard cursors.

use std::time::Instant;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::{debug, trace};

use super::highlight::highlight_text;
use super::input::TextInput;
use super::loading::{Spinner, SpinnerStyle};
use crate::entity::Entity;
use crate::filter::{FieldResolver, FilterEngine, FilterMode, FilteredView, Result};
use crate::navigation::{NavKey, NavOutcome, Navigator, Target};
use crate::selection::{SelectionChange, SelectionSet};
use crate::ui::theme::Theme;

/// Height of the input box, borders included.
const INPUT_HEIGHT: u16 = 3;

/// Fallback text when nothing matches the search.
const DEFAULT_EMPTY_TEXT: &str = "Not found";

/// Action resulting from picker input, for the host to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum MultiSelectAction<T> {
    /// The entity was added to the selection.
    Added(T),
    /// The entity was removed from the selection.
    Removed(T),
    /// Esc closed the list.
    Dismissed,
}

/// Appearance and wording of the picker.
#[derive(Debug, Clone)]
pub struct MultiSelectConfig {
    /// Title of the input box.
    pub title: String,
    /// Placeholder shown while the search text is empty.
    pub placeholder: String,
    /// Replaces "Not found" when the search matches nothing.
    pub empty_text: Option<String>,
    /// Shown while the collection has not been loaded.
    pub loading_text: String,
    /// Colors.
    pub theme: Theme,
    /// Animation shown while loading.
    pub spinner: SpinnerStyle,
}

impl Default for MultiSelectConfig {
    fn default() -> Self {
        Self {
            title: " Select ".to_string(),
            placeholder: "Search...".to_string(),
            empty_text: None,
            loading_text: "Loading...".to_string(),
            theme: Theme::default(),
            spinner: SpinnerStyle::default(),
        }
    }
}

/// Read-only values handed to the option renderer.
#[derive(Debug, Clone, Copy)]
pub struct OptionContext<'a> {
    /// Position of the option in the filtered view.
    pub index: usize,
    /// The current search text, for highlighting.
    pub search: &'a str,
    /// The active theme.
    pub theme: &'a Theme,
}

/// Renders one suggestion as one or more lines.
pub type OptionRenderer<T> = Box<dyn Fn(&T, &OptionContext<'_>) -> Vec<Line<'static>>>;

/// Screen regions from the last render, used to resolve mouse clicks.
#[derive(Debug, Clone, Default)]
struct HitAreas {
    caret: Option<Rect>,
    tags: Vec<Rect>,
    list: Option<Rect>,
    row_heights: Vec<u16>,
}

/// The multi-select picker.
pub struct MultiSelect<T, R> {
    config: MultiSelectConfig,
    engine: FilterEngine<T, R>,
    selection: SelectionSet<T>,
    nav: Navigator,
    input: TextInput,
    renderer: Option<OptionRenderer<T>>,
    list_state: ListState,
    spinner: Spinner,
    error: Option<String>,
    hits: HitAreas,
}

impl<T: Entity, R: FieldResolver<T>> MultiSelect<T, R> {
    /// Create a picker filtering on `resolver`'s field.
    pub fn new(resolver: R, mode: FilterMode, config: MultiSelectConfig) -> Self {
        let input = TextInput::with_placeholder(config.placeholder.clone());
        let spinner = Spinner::new(config.spinner);
        Self {
            config,
            engine: FilterEngine::new(resolver, mode),
            selection: SelectionSet::new(),
            nav: Navigator::new(),
            input,
            renderer: None,
            list_state: ListState::default(),
            spinner,
            error: None,
            hits: HitAreas::default(),
        }
    }

    /// Use a custom renderer for suggestions.
    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&T, &OptionContext<'_>) -> Vec<Line<'static>> + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn config(&self) -> &MultiSelectConfig {
        &self.config
    }

    /// Replace the candidate collection.
    ///
    /// The search text is kept and the suggestions are recomputed against the
    /// new collection right away.
    pub fn set_options(&mut self, options: Option<Vec<T>>) -> Result<()> {
        self.error = None;
        self.engine.set_collection(options)?;
        self.after_view_change();
        Ok(())
    }

    /// Show a load failure in place of the suggestions.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The selected entities, oldest first.
    pub fn selected(&self) -> &[T] {
        self.selection.all()
    }

    pub fn selection(&self) -> &SelectionSet<T> {
        &self.selection
    }

    /// Whether `entity` is selected, for the checkbox indicator.
    pub fn is_checked(&self, entity: &T) -> bool {
        self.selection.contains(entity)
    }

    pub fn search_text(&self) -> &str {
        self.engine.search_text()
    }

    /// The committed suggestion view.
    pub fn view(&self) -> &FilteredView {
        self.engine.view()
    }

    /// Visible suggestions in view order.
    pub fn suggestions(&self) -> impl Iterator<Item = &T> + '_ {
        self.engine.visible()
    }

    /// The highlighted suggestion, as a view position.
    pub fn active(&self) -> Option<usize> {
        self.nav.active()
    }

    /// The keyboard-focused tag, as a selection position.
    pub fn focused_tag(&self) -> Option<usize> {
        self.nav.focused_tag()
    }

    /// Whether the suggestion list is shown.
    pub fn is_open(&self) -> bool {
        self.nav.is_visible()
    }

    /// Whether the text input holds focus (no tag is focused).
    pub fn input_focused(&self) -> bool {
        self.nav.focused_tag().is_none()
    }

    /// List state mirroring the active suggestion; rendering scrolls it into view.
    pub fn list_state(&self) -> &ListState {
        &self.list_state
    }

    /// Handle a key press at the current time.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Option<MultiSelectAction<T>>> {
        self.handle_key_at(key, Instant::now())
    }

    /// Handle a key press, with `now` as the debounce clock.
    pub fn handle_key_at(
        &mut self,
        key: KeyEvent,
        now: Instant,
    ) -> Result<Option<MultiSelectAction<T>>> {
        let nav_key = NavKey::from(&key);

        let edited = matches!(nav_key, NavKey::Other | NavKey::Backspace) && self.input.handle_input(key);
        if edited {
            self.engine.search(self.input.value(), now)?;
        }

        let outcome = self
            .nav
            .handle(nav_key, self.engine.view().len(), self.selection.len());
        if edited {
            self.nav.text_changed();
        }

        let action = match outcome {
            NavOutcome::None => None,
            NavOutcome::RemoveLast => {
                let removed = self.selection.remove_last();
                if let Some(entity) = &removed {
                    debug!(id = ?entity.id(), "Removed last tag");
                }
                removed.map(MultiSelectAction::Removed)
            }
            NavOutcome::Commit(target) => self.commit(target)?,
            NavOutcome::Reset => {
                self.reset()?;
                Some(MultiSelectAction::Dismissed)
            }
            NavOutcome::FocusInput => {
                trace!("Focus returned to input");
                None
            }
        };

        self.sync_list_state();
        Ok(action)
    }

    /// Advance timers: commit a due debounced search and animate the spinner.
    pub fn tick_at(&mut self, now: Instant) -> Result<bool> {
        if !self.engine.view().has_data() {
            self.spinner.tick();
        }
        let committed = self.engine.poll(now)?;
        if committed {
            self.after_view_change();
        }
        Ok(committed)
    }

    /// Toggle the suggestion at view position `pos`, as a pointer click does.
    pub fn click_option(&mut self, pos: usize) -> Result<Option<MultiSelectAction<T>>> {
        let Some(entity) = self.engine.entity_at(pos).cloned() else {
            return Ok(None);
        };
        self.toggle_and_reset(entity).map(Some)
    }

    /// Remove the tag at selection position `index`, as its remove button does.
    pub fn click_tag(&mut self, index: usize) -> Option<MultiSelectAction<T>> {
        let removed = self.selection.remove(index)?;
        debug!(id = ?removed.id(), "Tag removed by click");
        self.nav
            .clamp(self.engine.view().len(), self.selection.len());
        self.sync_list_state();
        Some(MultiSelectAction::Removed(removed))
    }

    /// Open the suggestion list, as the caret does.
    pub fn open(&mut self) {
        self.nav.show();
    }

    /// Handle a mouse event against the regions of the last render.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<Option<MultiSelectAction<T>>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let (col, row) = (mouse.column, mouse.row);

        if self.hits.caret.is_some_and(|r| hit(r, col, row)) {
            self.open();
            return Ok(None);
        }
        if let Some(index) = self.hits.tags.iter().position(|r| hit(*r, col, row)) {
            return Ok(self.click_tag(index));
        }
        if let Some(list) = self.hits.list.filter(|r| hit(*r, col, row)) {
            if let Some(pos) = self.row_to_option(row - list.y) {
                return self.click_option(pos);
            }
        }
        Ok(None)
    }

    fn row_to_option(&self, row: u16) -> Option<usize> {
        let mut top = 0u16;
        for (i, height) in self.hits.row_heights.iter().enumerate() {
            if row < top + height {
                return Some(self.list_state.offset() + i);
            }
            top += height;
        }
        None
    }

    fn commit(&mut self, target: Target) -> Result<Option<MultiSelectAction<T>>> {
        let entity = match target {
            Target::Suggestion(pos) => self.engine.entity_at(pos).cloned(),
            Target::Tag(index) => self.selection.get(index).cloned(),
        };
        match entity {
            Some(entity) => self.toggle_and_reset(entity).map(Some),
            None => Ok(None),
        }
    }

    fn toggle_and_reset(&mut self, entity: T) -> Result<MultiSelectAction<T>> {
        let change = self.selection.toggle(entity.clone());
        self.reset()?;
        Ok(match change {
            SelectionChange::Added => MultiSelectAction::Added(entity),
            SelectionChange::Removed => MultiSelectAction::Removed(entity),
        })
    }

    /// Clear the search, drop both cursors and close the list.
    fn reset(&mut self) -> Result<()> {
        self.input.clear();
        self.engine.clear_search()?;
        self.nav.reset();
        self.sync_list_state();
        Ok(())
    }

    fn after_view_change(&mut self) {
        self.nav
            .clamp(self.engine.view().len(), self.selection.len());
        self.sync_list_state();
    }

    fn sync_list_state(&mut self) {
        self.list_state.select(self.nav.active());
    }

    fn tag_label(&self, entity: &T) -> String {
        match self.engine.resolver().resolve(entity) {
            Ok(label) => label.to_string(),
            Err(_) => format!("{:?}", entity.id()),
        }
    }

    fn option_lines(&self, entity: &T, index: usize) -> Vec<Line<'static>> {
        let ctx = OptionContext {
            index,
            search: self.engine.search_text(),
            theme: &self.config.theme,
        };
        match &self.renderer {
            Some(render) => render(entity, &ctx),
            None => {
                let label = self.engine.resolver().resolve(entity).unwrap_or_default();
                vec![highlight_text(label, ctx.search, ctx.theme.match_style())]
            }
        }
    }

    /// Render the picker.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)])
            .split(area);

        self.hits = HitAreas::default();
        self.render_input(frame, chunks[0]);

        if self.nav.is_visible() {
            self.render_suggestions(frame, chunks[1]);
        }
    }

    /// Render the tag chips, the search text and the caret.
    fn render_input(&mut self, frame: &mut Frame, area: Rect) {
        let theme = &self.config.theme;
        let border_style = if self.input_focused() {
            Style::default().fg(theme.border_focused)
        } else {
            Style::default().fg(theme.border)
        };

        let title = if self.selection.is_empty() {
            self.config.title.clone()
        } else {
            format!("{}({}) ", self.config.title, self.selection.len())
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut x = inner.x;
        for (i, entity) in self.selection.all().iter().enumerate() {
            let chip = Span::styled(
                format!(" {} x ", self.tag_label(entity)),
                theme.tag_style(self.nav.focused_tag() == Some(i)),
            );
            let width = chip.width() as u16;
            self.hits.tags.push(Rect::new(x, inner.y, width, 1));
            x = x.saturating_add(width + 1);
            spans.push(chip);
            spans.push(Span::raw(" "));
        }

        let text_x = x;
        if self.input.is_empty() {
            spans.push(Span::styled(
                self.input.placeholder().to_string(),
                Style::default().fg(theme.muted),
            ));
        } else {
            spans.push(Span::styled(
                self.input.value().to_string(),
                Style::default().fg(theme.fg),
            ));
        }

        let caret_area = Rect::new(inner.right().saturating_sub(1), inner.y, 1, 1);
        let text_area = Rect::new(inner.x, inner.y, inner.width.saturating_sub(2), 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), text_area);

        let caret = if self.nav.is_visible() { "▲" } else { "▼" };
        frame.render_widget(
            Paragraph::new(caret)
                .style(Style::default().fg(theme.muted))
                .alignment(Alignment::Right),
            caret_area,
        );
        self.hits.caret = Some(caret_area);

        if self.input_focused() {
            let cursor_x = text_x.saturating_add(self.input.cursor_column() as u16);
            if cursor_x < text_area.right() {
                frame.set_cursor_position(Position::new(cursor_x, inner.y));
            }
        }
    }

    /// Render the suggestion list, or the loading/empty state.
    fn render_suggestions(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.config.theme.clone();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border));
        let inner = block.inner(area);

        if let Some(error) = &self.error {
            let paragraph = Paragraph::new(error.clone())
                .style(Style::default().fg(theme.error))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        match self.engine.view() {
            FilteredView::NoData => {
                let paragraph = Paragraph::new(self.spinner.text(&self.config.loading_text))
                    .style(Style::default().fg(theme.muted))
                    .block(block);
                frame.render_widget(paragraph, area);
            }
            FilteredView::Empty => {
                let text = self
                    .config
                    .empty_text
                    .clone()
                    .unwrap_or_else(|| DEFAULT_EMPTY_TEXT.to_string());
                let paragraph = Paragraph::new(text)
                    .style(Style::default().fg(theme.muted))
                    .block(block);
                frame.render_widget(paragraph, area);
            }
            FilteredView::Matches(_) => {
                let mut heights = Vec::new();
                let items: Vec<ListItem> = self
                    .engine
                    .visible()
                    .enumerate()
                    .map(|(pos, entity)| {
                        let checked = self.selection.contains(entity);
                        let lines = self.checkbox_lines(entity, pos, checked, &theme);
                        heights.push(lines.len() as u16);
                        ListItem::new(Text::from(lines))
                    })
                    .collect();

                let list = List::new(items)
                    .block(block)
                    .highlight_style(theme.active_style())
                    .highlight_symbol("> ");
                frame.render_stateful_widget(list, area, &mut self.list_state);

                let offset = self.list_state.offset();
                self.hits.row_heights = heights.into_iter().skip(offset).collect();
                self.hits.list = Some(inner);
            }
        }
    }

    fn checkbox_lines(
        &self,
        entity: &T,
        pos: usize,
        checked: bool,
        theme: &Theme,
    ) -> Vec<Line<'static>> {
        let mut lines = self.option_lines(entity, pos);
        if lines.is_empty() {
            lines.push(Line::default());
        }
        let (checkbox, style) = if checked {
            ("[x]", Style::default().fg(theme.checked))
        } else {
            ("[ ]", Style::default())
        };
        for (i, line) in lines.iter_mut().enumerate() {
            let prefix = if i == 0 {
                vec![Span::styled(checkbox, style), Span::raw(" ")]
            } else {
                vec![Span::raw("    ")]
            };
            let rest = std::mem::take(&mut line.spans);
            line.spans = prefix.into_iter().chain(rest).collect();
        }
        lines
    }
}

fn hit(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.right() && row >= rect.y && row < rect.bottom()
}
