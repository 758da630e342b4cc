//! The set of chosen entities.

use tracing::debug;

use crate::entity::Entity;

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The entity was appended.
    Added,
    /// An entity with the same identity was removed.
    Removed,
}

/// Ordered, identity-deduplicated selection.
///
/// Insertion order is kept; the newest entity is last.
#[derive(Debug, Clone)]
pub struct SelectionSet<T> {
    items: Vec<T>,
}

impl<T: Entity> SelectionSet<T> {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `entity` if absent, otherwise remove the entry with its identity.
    pub fn toggle(&mut self, entity: T) -> SelectionChange {
        let id = entity.id();
        if self.items.iter().any(|item| item.id() == id) {
            self.items.retain(|item| item.id() != id);
            debug!(id = ?id, "Deselected");
            SelectionChange::Removed
        } else {
            self.items.push(entity);
            debug!(id = ?id, "Selected");
            SelectionChange::Added
        }
    }

    /// Remove the most recently added entity.
    pub fn remove_last(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove the entity at `index`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Whether an entity with the same identity is selected.
    pub fn contains(&self, entity: &T) -> bool {
        let id = entity.id();
        self.items.iter().any(|item| item.id() == id)
    }

    /// All selected entities, oldest first.
    pub fn all(&self) -> &[T] {
        &self.items
    }

    /// Identities of the selected entities, oldest first.
    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(Entity::id).collect()
    }

    /// The entity at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every selected entity.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Entity> Default for SelectionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, Record};

    fn rec(id: i64) -> Record {
        Record::new(id)
    }

    fn ids(set: &SelectionSet<Record>) -> Vec<EntityId> {
        set.ids()
    }

    #[test]
    fn test_toggle_scenario() {
        let mut set = SelectionSet::new();

        assert_eq!(set.toggle(rec(1)), SelectionChange::Added);
        assert_eq!(ids(&set), vec![EntityId::from(1)]);

        assert_eq!(set.toggle(rec(1)), SelectionChange::Removed);
        assert!(set.is_empty());

        set.toggle(rec(1));
        set.toggle(rec(2));
        assert_eq!(ids(&set), vec![EntityId::from(1), EntityId::from(2)]);

        assert_eq!(set.remove_last().map(|r| r.id), Some(EntityId::from(2)));
        assert_eq!(ids(&set), vec![EntityId::from(1)]);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut base = SelectionSet::new();
        base.toggle(rec(1));
        base.toggle(rec(2));

        // Absent entity: exact round trip
        let mut set = base.clone();
        set.toggle(rec(3));
        set.toggle(rec(3));
        assert_eq!(ids(&set), ids(&base));

        // Present entity: same members, re-added at the end
        let mut set = base.clone();
        set.toggle(rec(1));
        set.toggle(rec(1));
        assert_eq!(set.len(), base.len());
        assert!(base.all().iter().all(|r| set.contains(r)));
    }

    #[test]
    fn test_identity_not_structure() {
        let mut set = SelectionSet::new();
        set.toggle(Record::new(1).with_field("name", "Rick"));

        // Same id, different fields
        let other = Record::new(1).with_field("name", "Evil Rick");
        assert!(set.contains(&other));
        assert_eq!(set.toggle(other), SelectionChange::Removed);
        assert!(set.is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let mut set = SelectionSet::new();
        set.toggle(rec(1));
        set.toggle(rec(2));
        set.toggle(rec(1));
        set.toggle(rec(1));
        assert_eq!(set.len(), 2);
        // Re-added entity goes to the end
        assert_eq!(ids(&set), vec![EntityId::from(2), EntityId::from(1)]);
    }

    #[test]
    fn test_remove_last_on_empty() {
        let mut set: SelectionSet<Record> = SelectionSet::new();
        assert!(set.remove_last().is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_by_index() {
        let mut set = SelectionSet::new();
        set.toggle(rec(1));
        set.toggle(rec(2));
        set.toggle(rec(3));

        assert_eq!(set.remove(1).map(|r| r.id), Some(EntityId::from(2)));
        assert!(set.remove(5).is_none());
        assert_eq!(ids(&set), vec![EntityId::from(1), EntityId::from(3)]);
    }

    #[test]
    fn test_get_and_clear() {
        let mut set = SelectionSet::new();
        set.toggle(rec(4));
        assert_eq!(set.get(0).map(|r| r.id.clone()), Some(EntityId::from(4)));
        assert!(set.get(1).is_none());

        set.clear();
        assert!(set.is_empty());
        assert!(set.all().is_empty());
    }
}
