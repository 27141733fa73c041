//! Top-level menu structure as seen by the navigator.

use xmb_types::SubMenu;

use crate::error::EngineError;

/// Ordered, non-empty list of menu items, left to right.
///
/// Each entry only tracks what navigation needs: whether the item has a
/// sub-menu, how many children it has and which one is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCollection {
    items: Vec<SubMenu>,
}

impl MenuCollection {
    pub fn new(items: Vec<SubMenu>) -> Result<Self, EngineError> {
        if items.is_empty() {
            return Err(EngineError::EmptyMenu);
        }
        Ok(Self { items })
    }

    /// Builds a collection from per-item child counts.
    ///
    /// `None` marks an item without a sub-menu; `Some(0)` is normalised to
    /// the same sentinel.
    pub fn from_counts<I>(counts: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = Option<usize>>,
    {
        let items = counts
            .into_iter()
            .map(|count| count.map(SubMenu::with_count).unwrap_or_default())
            .collect();
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Never true for a constructed collection.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&SubMenu> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut SubMenu> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubMenu> {
        self.items.iter()
    }
}
