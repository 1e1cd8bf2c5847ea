//! Board ordering within a workspace.

pub mod board_sequencer;
