//! Vox agent: library crate for the voice command assistant.
//!
//! Re-exports all modules so external crates (e.g. `vox-e2e-tests`) can
//! drive the classifier, dispatcher, and conversation loop with mock
//! collaborators.

pub mod assistant;
pub mod classifier;
pub mod config;
pub mod conversation;
pub mod dispatcher;
pub mod gate;
pub mod handlers;
pub mod help;
pub mod registry;
pub mod speech;
