//! Player inventory.

use std::collections::BTreeMap;

use universe_core::types::TileKind;

/// Tile counts carried by the player, ordered by kind.
///
/// Entries never hold a zero count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<TileKind, u32>,
}

impl Inventory {
    /// Empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count held of `kind`.
    pub fn count(&self, kind: TileKind) -> u32 {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    /// Add one of `kind`, returning the new count.
    pub fn add(&mut self, kind: TileKind) -> u32 {
        let count = self.items.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Take one of `kind`, returning the remaining count, or `None` if none was held.
    pub fn take(&mut self, kind: TileKind) -> Option<u32> {
        let count = self.items.get_mut(&kind)?;
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            self.items.remove(&kind);
        }
        Some(remaining)
    }

    /// Check if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct kinds held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `(kind, count)` pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (TileKind, u32)> + '_ {
        self.items.iter().map(|(kind, count)| (*kind, *count))
    }

    /// Kind of the `index`-th entry in kind order.
    pub fn nth_kind(&self, index: usize) -> Option<TileKind> {
        self.items.keys().nth(index).copied()
    }
}

impl FromIterator<(TileKind, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (TileKind, u32)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().filter(|(_, count)| *count > 0).collect(),
        }
    }
}
