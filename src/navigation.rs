//! Keyboard navigation across the suggestion list and the selected tags.
//!
//! Two independent cursors are tracked: the active suggestion (Up/Down) and the
//! focused tag (Left/Right). Moving one clears the other, so at most one of them
//! is ever set. `None` stands for "nothing highlighted" in both.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::trace;

/// The keys the navigator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Backspace,
    Enter,
    /// Anything else, including typed characters.
    Other,
}

impl From<&KeyEvent> for NavKey {
    fn from(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::Up => NavKey::Up,
            KeyCode::Down => NavKey::Down,
            KeyCode::Left => NavKey::Left,
            KeyCode::Right => NavKey::Right,
            KeyCode::Esc => NavKey::Escape,
            KeyCode::Backspace => NavKey::Backspace,
            KeyCode::Enter => NavKey::Enter,
            _ => NavKey::Other,
        }
    }
}

/// What Enter resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Position in the filtered view.
    Suggestion(usize),
    /// Position in the selection.
    Tag(usize),
}

/// Follow-up work for the controller after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Nothing beyond the index update.
    None,
    /// Drop the last selected entity.
    RemoveLast,
    /// Toggle the resolved entity, then reset.
    Commit(Target),
    /// Clear the search text and return focus to the input.
    Reset,
    /// Tag focus left the tag row; return focus to the input.
    FocusInput,
}

/// Highlight and visibility state of the picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    active: Option<usize>,
    focused_tag: Option<usize>,
    visible: bool,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The highlighted suggestion, as a view position.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// The focused tag, as a selection position.
    pub fn focused_tag(&self) -> Option<usize> {
        self.focused_tag
    }

    /// Whether the suggestion list is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hide the list and clear both cursors.
    pub fn reset(&mut self) {
        self.active = None;
        self.focused_tag = None;
        self.visible = false;
    }

    /// The search text changed; the old highlight no longer means anything.
    pub fn text_changed(&mut self) {
        self.visible = true;
        self.active = None;
        self.focused_tag = None;
    }

    /// Drop cursors that point past the end of their list.
    pub fn clamp(&mut self, view_len: usize, selection_len: usize) {
        if self.active.is_some_and(|i| i >= view_len) {
            self.active = None;
        }
        if self.focused_tag.is_some_and(|i| i >= selection_len) {
            self.focused_tag = None;
        }
    }

    /// Apply a key against lists of the given lengths.
    pub fn handle(&mut self, key: NavKey, view_len: usize, selection_len: usize) -> NavOutcome {
        let outcome = match key {
            NavKey::Up => {
                self.visible = true;
                self.focused_tag = None;
                if view_len > 0 {
                    self.active = Some(match self.active {
                        Some(i) if i > 0 && i < view_len => i - 1,
                        _ => view_len - 1,
                    });
                }
                NavOutcome::None
            }
            NavKey::Down => {
                self.visible = true;
                self.focused_tag = None;
                if view_len > 0 {
                    self.active = Some(match self.active {
                        Some(i) if i + 1 < view_len => i + 1,
                        _ => 0,
                    });
                }
                NavOutcome::None
            }
            NavKey::Left => {
                self.active = None;
                self.focused_tag = match self.focused_tag {
                    _ if selection_len == 0 => None,
                    Some(i) if i > 0 && i < selection_len => Some(i - 1),
                    _ => Some(selection_len - 1),
                };
                NavOutcome::None
            }
            NavKey::Right => {
                self.active = None;
                match self.focused_tag {
                    Some(i) if i + 1 < selection_len => {
                        self.focused_tag = Some(i + 1);
                        NavOutcome::None
                    }
                    Some(_) => {
                        self.focused_tag = None;
                        NavOutcome::FocusInput
                    }
                    None if selection_len > 0 => {
                        self.focused_tag = Some(0);
                        NavOutcome::None
                    }
                    None => NavOutcome::None,
                }
            }
            NavKey::Escape => {
                self.reset();
                NavOutcome::Reset
            }
            NavKey::Backspace => {
                self.active = None;
                self.focused_tag = None;
                if selection_len > 0 {
                    NavOutcome::RemoveLast
                } else {
                    NavOutcome::None
                }
            }
            NavKey::Enter => match self.resolve(view_len, selection_len) {
                Some(target) => NavOutcome::Commit(target),
                None => NavOutcome::None,
            },
            NavKey::Other => {
                self.active = None;
                self.focused_tag = None;
                NavOutcome::None
            }
        };
        trace!(?key, active = ?self.active, focused_tag = ?self.focused_tag, ?outcome, "Navigation");
        outcome
    }

    /// The entity Enter would act on: the active suggestion, else the focused tag.
    pub fn resolve(&self, view_len: usize, selection_len: usize) -> Option<Target> {
        match (self.active, self.focused_tag) {
            (Some(i), _) if i < view_len => Some(Target::Suggestion(i)),
            (_, Some(i)) if i < selection_len => Some(Target::Tag(i)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(nav: &mut Navigator, key: NavKey, times: usize, view_len: usize) {
        for _ in 0..times {
            nav.handle(key, view_len, 0);
        }
    }

    #[test]
    fn test_new_navigator() {
        let nav = Navigator::new();
        assert_eq!(nav.active(), None);
        assert_eq!(nav.focused_tag(), None);
        assert!(!nav.is_visible());
    }

    #[test]
    fn test_key_mapping() {
        let key = |code| NavKey::from(&KeyEvent::new(code, KeyModifiers::NONE));
        assert_eq!(key(KeyCode::Up), NavKey::Up);
        assert_eq!(key(KeyCode::Down), NavKey::Down);
        assert_eq!(key(KeyCode::Left), NavKey::Left);
        assert_eq!(key(KeyCode::Right), NavKey::Right);
        assert_eq!(key(KeyCode::Esc), NavKey::Escape);
        assert_eq!(key(KeyCode::Backspace), NavKey::Backspace);
        assert_eq!(key(KeyCode::Enter), NavKey::Enter);
        assert_eq!(key(KeyCode::Char('a')), NavKey::Other);
        assert_eq!(key(KeyCode::Tab), NavKey::Other);
    }

    #[test]
    fn test_down_wraps() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Down, 3, 0);
        assert_eq!(nav.active(), Some(0));
        assert!(nav.is_visible());

        press(&mut nav, NavKey::Down, 2, 3);
        assert_eq!(nav.active(), Some(2));

        nav.handle(NavKey::Down, 3, 0);
        assert_eq!(nav.active(), Some(0));
    }

    #[test]
    fn test_down_presses_cycle() {
        for len in 1..5 {
            for n in 1..12 {
                let mut nav = Navigator::new();
                press(&mut nav, NavKey::Down, n, len);
                assert_eq!(nav.active(), Some((n - 1) % len), "len {} presses {}", len, n);
            }
        }
    }

    #[test]
    fn test_up_wraps() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Up, 3, 0);
        assert_eq!(nav.active(), Some(2));

        press(&mut nav, NavKey::Up, 2, 3);
        assert_eq!(nav.active(), Some(0));

        nav.handle(NavKey::Up, 3, 0);
        assert_eq!(nav.active(), Some(2));
    }

    #[test]
    fn test_up_down_on_empty_view() {
        let mut nav = Navigator::new();
        assert_eq!(nav.handle(NavKey::Up, 0, 0), NavOutcome::None);
        assert_eq!(nav.active(), None);
        assert_eq!(nav.handle(NavKey::Down, 0, 0), NavOutcome::None);
        assert_eq!(nav.active(), None);
        assert!(nav.is_visible());
    }

    #[test]
    fn test_stale_active_is_replaced() {
        let mut nav = Navigator::new();
        press(&mut nav, NavKey::Down, 5, 10);
        assert_eq!(nav.active(), Some(4));

        // View shrank to two entries without a clamp
        nav.handle(NavKey::Down, 2, 0);
        assert_eq!(nav.active(), Some(0));
    }

    #[test]
    fn test_left_wraps_to_last_tag() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Left, 0, 3);
        assert_eq!(nav.focused_tag(), Some(2));
        nav.handle(NavKey::Left, 0, 3);
        assert_eq!(nav.focused_tag(), Some(1));
        nav.handle(NavKey::Left, 0, 3);
        nav.handle(NavKey::Left, 0, 3);
        assert_eq!(nav.focused_tag(), Some(2));
    }

    #[test]
    fn test_left_with_no_tags() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Left, 0, 0);
        assert_eq!(nav.focused_tag(), None);
    }

    #[test]
    fn test_right_exits_to_input_after_last_tag() {
        let mut nav = Navigator::new();
        assert_eq!(nav.handle(NavKey::Right, 0, 2), NavOutcome::None);
        assert_eq!(nav.focused_tag(), Some(0));
        assert_eq!(nav.handle(NavKey::Right, 0, 2), NavOutcome::None);
        assert_eq!(nav.focused_tag(), Some(1));

        assert_eq!(nav.handle(NavKey::Right, 0, 2), NavOutcome::FocusInput);
        assert_eq!(nav.focused_tag(), None);

        // From the input, Right re-enters at the first tag
        nav.handle(NavKey::Right, 0, 2);
        assert_eq!(nav.focused_tag(), Some(0));
    }

    #[test]
    fn test_right_with_no_tags() {
        let mut nav = Navigator::new();
        assert_eq!(nav.handle(NavKey::Right, 3, 0), NavOutcome::None);
        assert_eq!(nav.focused_tag(), None);
    }

    #[test]
    fn test_cursors_never_both_set() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Down, 3, 2);
        assert_eq!(nav.active(), Some(0));

        nav.handle(NavKey::Left, 3, 2);
        assert_eq!(nav.active(), None);
        assert_eq!(nav.focused_tag(), Some(1));

        nav.handle(NavKey::Up, 3, 2);
        assert_eq!(nav.focused_tag(), None);
        assert_eq!(nav.active(), Some(2));
    }

    #[test]
    fn test_escape_resets() {
        let mut nav = Navigator::new();
        press(&mut nav, NavKey::Down, 2, 3);

        assert_eq!(nav.handle(NavKey::Escape, 3, 0), NavOutcome::Reset);
        assert_eq!(nav.active(), None);
        assert!(!nav.is_visible());
    }

    #[test]
    fn test_backspace() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Left, 0, 2);
        assert_eq!(nav.handle(NavKey::Backspace, 0, 2), NavOutcome::RemoveLast);
        assert_eq!(nav.focused_tag(), None);

        assert_eq!(nav.handle(NavKey::Backspace, 0, 0), NavOutcome::None);
    }

    #[test]
    fn test_enter_prefers_active_suggestion() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Down, 3, 2);
        assert_eq!(
            nav.handle(NavKey::Enter, 3, 2),
            NavOutcome::Commit(Target::Suggestion(0))
        );
    }

    #[test]
    fn test_enter_falls_back_to_focused_tag() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Left, 3, 2);
        assert_eq!(nav.handle(NavKey::Enter, 3, 2), NavOutcome::Commit(Target::Tag(1)));
    }

    #[test]
    fn test_enter_with_nothing_resolved() {
        let mut nav = Navigator::new();
        assert_eq!(nav.handle(NavKey::Enter, 3, 2), NavOutcome::None);
        assert_eq!(nav.resolve(3, 2), None);
    }

    #[test]
    fn test_other_key_clears_cursors() {
        let mut nav = Navigator::new();
        nav.handle(NavKey::Down, 3, 0);
        nav.handle(NavKey::Other, 3, 0);
        assert_eq!(nav.active(), None);

        nav.handle(NavKey::Left, 3, 2);
        nav.handle(NavKey::Other, 3, 2);
        assert_eq!(nav.focused_tag(), None);
    }

    #[test]
    fn test_text_changed_shows_and_clears() {
        let mut nav = Navigator::new();
        press(&mut nav, NavKey::Down, 2, 5);
        nav.reset();

        nav.text_changed();
        assert!(nav.is_visible());
        assert_eq!(nav.active(), None);
    }

    #[test]
    fn test_clamp() {
        let mut nav = Navigator::new();
        press(&mut nav, NavKey::Down, 3, 5);
        nav.clamp(5, 0);
        assert_eq!(nav.active(), Some(2));
        nav.clamp(2, 0);
        assert_eq!(nav.active(), None);

        nav.handle(NavKey::Left, 0, 3);
        assert_eq!(nav.focused_tag(), Some(2));
        nav.clamp(0, 2);
        assert_eq!(nav.focused_tag(), None);
    }
}
