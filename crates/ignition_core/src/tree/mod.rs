//! Card forest computations.

pub mod card_tree;
