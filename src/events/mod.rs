//! Terminal events fed to the application.

mod handler;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;

/// An input the application reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// No input arrived within the tick rate.
    Tick,
    /// A key press.
    Key(KeyEvent),
    /// A mouse action.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
}
