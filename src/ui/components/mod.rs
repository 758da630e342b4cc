//! Reusable UI components.

mod highlight;
mod input;
mod loading;
mod multiselect;

pub use highlight::highlight_text;
pub use input::TextInput;
pub use loading::{Spinner, SpinnerStyle};
pub use multiselect::{
    MultiSelect, MultiSelectAction, MultiSelectConfig, OptionContext, OptionRenderer,
};
