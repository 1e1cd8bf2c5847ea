//! Synchronization between a workspace working set and the shared store.

pub mod persistence_sync;
