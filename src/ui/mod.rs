//! Terminal user interface.
//!
//! The picker widget and its building blocks, rendered with ratatui.

mod components;
pub mod theme;

pub use components::{
    highlight_text, MultiSelect, MultiSelectAction, MultiSelectConfig, OptionContext,
    OptionRenderer, Spinner, SpinnerStyle, TextInput,
};
pub use theme::Theme;
