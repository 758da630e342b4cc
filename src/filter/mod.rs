//! Text filtering over a candidate collection.
//!
//! Matching is a case-insensitive literal substring test against one string
//! field of each entity. The field is read through a [`FieldResolver`], so typed
//! collections can use an infallible accessor while JSON records are checked
//! at runtime.
//!
//! [`FilterEngine`] keeps the current search text and filtered view, and runs
//! either synchronously or behind a [`Debouncer`].

mod debounce;

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace};

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};

use crate::entity::{json_type_name, Record};

/// Errors raised while filtering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The filter field does not hold a string. This is a configuration error.
    #[error(
        "type of \"{field}\" is \"{actual}\" which cannot be filtered; make sure the value is a string"
    )]
    TypeMismatch {
        /// The configured field name.
        field: String,
        /// The runtime type that was found instead.
        actual: &'static str,
    },
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Reads the string an entity is matched against.
pub trait FieldResolver<T> {
    /// Name of the field, for error messages and display.
    fn field_name(&self) -> &str;

    /// Resolve the field value of `entity`.
    fn resolve<'a>(&self, entity: &'a T) -> Result<&'a str>;
}

/// Resolver backed by a plain accessor function. Never fails.
pub struct Accessor<T> {
    name: &'static str,
    get: fn(&T) -> &str,
}

impl<T> Accessor<T> {
    /// Create an accessor resolver.
    pub fn new(name: &'static str, get: fn(&T) -> &str) -> Self {
        Self { name, get }
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            get: self.get,
        }
    }
}

impl<T> std::fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessor").field("name", &self.name).finish()
    }
}

impl<T> FieldResolver<T> for Accessor<T> {
    fn field_name(&self) -> &str {
        self.name
    }

    fn resolve<'a>(&self, entity: &'a T) -> Result<&'a str> {
        Ok((self.get)(entity))
    }
}

/// Resolver that reads a named key of a JSON [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonField {
    name: String,
}

impl JsonField {
    /// Create a resolver for the given key.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl FieldResolver<Record> for JsonField {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn resolve<'a>(&self, entity: &'a Record) -> Result<&'a str> {
        let value = entity.get(&self.name);
        match value.and_then(|v| v.as_str()) {
            Some(s) => Ok(s),
            None => Err(FilterError::TypeMismatch {
                field: self.name.clone(),
                actual: json_type_name(value),
            }),
        }
    }
}

/// Check whether `value` contains `search`, ignoring case.
///
/// An empty search matches everything.
pub fn matches(value: &str, search: &str) -> bool {
    search.is_empty() || value.to_lowercase().contains(&search.to_lowercase())
}

/// Indices of the entities whose field contains `search`, in collection order.
///
/// Every entity is resolved, even when `search` is empty, so a misconfigured
/// field fails on the first pass.
pub fn filter_indices<T, R>(collection: &[T], search: &str, resolver: &R) -> Result<Vec<usize>>
where
    R: FieldResolver<T> + ?Sized,
{
    let needle = search.to_lowercase();
    let mut indices = Vec::new();
    for (i, entity) in collection.iter().enumerate() {
        let value = resolver.resolve(entity)?;
        if needle.is_empty() || value.to_lowercase().contains(&needle) {
            indices.push(i);
        }
    }
    Ok(indices)
}

/// The entities whose field contains `search`, in collection order.
pub fn filter<'c, T, R>(collection: &'c [T], search: &str, resolver: &R) -> Result<Vec<&'c T>>
where
    R: FieldResolver<T> + ?Sized,
{
    Ok(filter_indices(collection, search, resolver)?
        .into_iter()
        .map(|i| &collection[i])
        .collect())
}

/// The result of the last committed filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilteredView {
    /// No collection has been supplied yet.
    #[default]
    NoData,
    /// A pass ran and nothing matched.
    Empty,
    /// Indices into the collection of the matching entities.
    Matches(Vec<usize>),
}

impl FilteredView {
    fn from_indices(indices: Vec<usize>) -> Self {
        if indices.is_empty() {
            FilteredView::Empty
        } else {
            FilteredView::Matches(indices)
        }
    }

    /// Number of visible entities.
    pub fn len(&self) -> usize {
        self.indices().len()
    }

    /// Whether nothing is visible, for either reason.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a collection was available for the last pass.
    pub fn has_data(&self) -> bool {
        !matches!(self, FilteredView::NoData)
    }

    /// Collection indices of the visible entities.
    pub fn indices(&self) -> &[usize] {
        match self {
            FilteredView::Matches(indices) => indices,
            FilteredView::NoData | FilteredView::Empty => &[],
        }
    }

    /// Collection index of the entity at view position `pos`.
    pub fn get(&self, pos: usize) -> Option<usize> {
        self.indices().get(pos).copied()
    }
}

/// How search requests are committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Recompute on every request.
    Sync,
    /// Recompute once requests stop arriving for the given window.
    Debounced(Duration),
}

impl FilterMode {
    /// Debounced mode with the default window.
    pub fn debounced() -> Self {
        FilterMode::Debounced(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    /// Build a mode from a window in milliseconds; zero means synchronous.
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            FilterMode::Sync
        } else {
            FilterMode::Debounced(Duration::from_millis(ms))
        }
    }
}

impl Default for FilterMode {
    fn default() -> Self {
        Self::debounced()
    }
}

/// Filters a collection against the current search text.
///
/// The collection may be absent until loaded and may be replaced at any time;
/// the search text survives replacement.
#[derive(Debug)]
pub struct FilterEngine<T, R> {
    resolver: R,
    mode: FilterMode,
    collection: Option<Vec<T>>,
    search: String,
    view: FilteredView,
    debouncer: Option<Debouncer>,
}

impl<T, R: FieldResolver<T>> FilterEngine<T, R> {
    /// Create an engine with no collection.
    pub fn new(resolver: R, mode: FilterMode) -> Self {
        let debouncer = match mode {
            FilterMode::Sync => None,
            FilterMode::Debounced(window) => Some(Debouncer::new(window)),
        };
        Self {
            resolver,
            mode,
            collection: None,
            search: String::new(),
            view: FilteredView::NoData,
            debouncer,
        }
    }

    /// The configured mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// The field resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The latest search text, committed or not.
    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// The last committed view.
    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// The current collection, if loaded.
    pub fn collection(&self) -> Option<&[T]> {
        self.collection.as_deref()
    }

    /// The entity at view position `pos`.
    pub fn entity_at(&self, pos: usize) -> Option<&T> {
        let index = self.view.get(pos)?;
        self.collection.as_ref()?.get(index)
    }

    /// Visible entities in view order.
    pub fn visible(&self) -> impl Iterator<Item = &T> + '_ {
        let collection = self.collection.as_deref().unwrap_or(&[]);
        self.view
            .indices()
            .iter()
            .filter_map(move |&i| collection.get(i))
    }

    /// Whether a debounced commit is waiting.
    pub fn is_pending(&self) -> bool {
        self.debouncer.as_ref().is_some_and(Debouncer::is_pending)
    }

    /// Replace the collection and recompute against the current search text.
    ///
    /// On error the previous collection and view are kept.
    pub fn set_collection(&mut self, collection: Option<Vec<T>>) -> Result<()> {
        debug!(
            len = collection.as_ref().map(Vec::len),
            "Filter collection replaced"
        );
        let view = self.compute(collection.as_deref())?;
        self.collection = collection;
        self.commit(view);
        Ok(())
    }

    /// Request a search.
    ///
    /// Returns true if the view was recomputed now, false if the commit was
    /// deferred to the debouncer.
    pub fn search(&mut self, text: impl Into<String>, now: Instant) -> Result<bool> {
        self.search = text.into();
        match self.debouncer.as_mut() {
            Some(debouncer) => {
                debouncer.schedule(now);
                Ok(false)
            }
            None => {
                self.recompute()?;
                Ok(true)
            }
        }
    }

    /// Commit a pending debounced search if its window elapsed.
    ///
    /// Returns true if the view was recomputed.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        let due = self
            .debouncer
            .as_mut()
            .is_some_and(|debouncer| debouncer.fire(now));
        if due {
            self.recompute()?;
        }
        Ok(due)
    }

    /// Commit a pending debounced search right away.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.is_pending() {
            return Ok(false);
        }
        if let Some(debouncer) = self.debouncer.as_mut() {
            debouncer.cancel();
        }
        self.recompute()?;
        Ok(true)
    }

    /// Reset the search text to empty and recompute immediately.
    pub fn clear_search(&mut self) -> Result<()> {
        self.search.clear();
        if let Some(debouncer) = self.debouncer.as_mut() {
            debouncer.cancel();
        }
        self.recompute()
    }

    fn recompute(&mut self) -> Result<()> {
        let view = self.compute(self.collection.as_deref())?;
        self.commit(view);
        Ok(())
    }

    fn compute(&self, collection: Option<&[T]>) -> Result<FilteredView> {
        Ok(match collection {
            None => FilteredView::NoData,
            Some(collection) => {
                FilteredView::from_indices(filter_indices(collection, &self.search, &self.resolver)?)
            }
        })
    }

    fn commit(&mut self, view: FilteredView) {
        self.view = view;
        trace!(search = %self.search, visible = self.view.len(), "Filter committed");
    }
}
