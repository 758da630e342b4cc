//! multipick: a terminal multi-select input with type-ahead filtering and
//! removable tags.
//!
//! The widget itself lives in [`ui::MultiSelect`]; it is built from three
//! independent pieces that can be used on their own:
//!
//! - [`filter::FilterEngine`] narrows a collection by a search string,
//!   synchronously or debounced
//! - [`selection::SelectionSet`] keeps the chosen entities, deduped by id
//! - [`navigation::Navigator`] tracks the keyboard cursors

pub mod app;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod filter;
pub mod logging;
pub mod navigation;
pub mod selection;
pub mod source;
pub mod tasks;
pub mod ui;
