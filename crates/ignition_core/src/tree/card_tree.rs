//! Read-only forest computations over a card snapshot.
//!
//! # Responsibility
//! - Enumerate descendants along `parent_id` edges.
//! - Veto reparenting that would close a cycle.
//! - Compute the exact id set removed by a cascading delete.
//!
//! # Invariants
//! - Traversal is an explicit worklist guarded by a visited set; a corrupted
//!   cyclic snapshot terminates and is reported, never looped on.
//! - `CardTree` borrows the snapshot and never mutates it.

use crate::model::card::{Card, CardId};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Parent/child index built from one immutable card snapshot.
pub struct CardTree<'a> {
    ids: HashSet<&'a str>,
    children: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> CardTree<'a> {
    /// Indexes `cards`. Children keep the snapshot's relative order.
    pub fn new(cards: &'a [Card]) -> Self {
        let mut ids = HashSet::with_capacity(cards.len());
        let mut children: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for card in cards {
            ids.insert(card.id.as_str());
            if let Some(parent_id) = card.parent_id.as_deref() {
                children.entry(parent_id).or_default().push(card.id.as_str());
            }
        }
        Self { ids, children }
    }

    pub fn contains(&self, card_id: &str) -> bool {
        self.ids.contains(card_id)
    }

    /// Direct children of `card_id` in snapshot order.
    pub fn children_of(&self, card_id: &str) -> &[&'a str] {
        self.children
            .get(card_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All transitive descendants of `card_id`, depth-first pre-order.
    ///
    /// `card_id` itself is never included, even when a corrupted snapshot
    /// routes back to it.
    pub fn descendants_of(&self, card_id: &str) -> Vec<CardId> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(card_id);

        let mut result = Vec::new();
        let mut stack: Vec<&str> = self.children_of(card_id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                warn!(
                    "event=card_tree_cycle module=tree status=corrupted root={card_id} revisited={current}"
                );
                continue;
            }
            result.push(current.to_string());
            stack.extend(self.children_of(current).iter().rev().copied());
        }
        result
    }

    /// Number of cards a cascading delete of `card_id` would remove besides itself.
    pub fn descendant_count(&self, card_id: &str) -> usize {
        self.descendants_of(card_id).len()
    }

    /// Returns whether making `new_parent_id` the parent of `child_id` closes a cycle.
    pub fn would_create_cycle(&self, child_id: &str, new_parent_id: &str) -> bool {
        child_id == new_parent_id
            || self
                .descendants_of(child_id)
                .iter()
                .any(|id| id == new_parent_id)
    }

    /// `{card_id} ∪ descendants_of(card_id)`.
    pub fn cascade_delete_set(&self, card_id: &str) -> HashSet<CardId> {
        let mut set: HashSet<CardId> = self.descendants_of(card_id).into_iter().collect();
        set.insert(card_id.to_string());
        set
    }
}
