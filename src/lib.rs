//! Shotpath - sequence edit paths and publishing for a DCC pipeline engine
//!
//! Shotpath resolves where a level sequence is used: every chain of shot and
//! subsequence edits from the sequence up to a root sequence. Publishing,
//! loading, and the engine menu are built on top of those paths, working
//! against a JSON snapshot of the host editor session.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates)
//! - [`engine`] - Invocation context and session loading
//! - [`core`] - Node identities, the edit index, path resolution,
//!   templates, and configuration
//! - [`host`] - Scene snapshot exported by the host editor
//! - [`publish`] - Collector and publish plugins for movies and FBX assets
//! - [`loader`] - Loader actions importing publishes into the host
//! - [`menu`] - Engine menu and its commands
//! - [`ui`] - Output helpers
//!
//! # Invariants
//!
//! 1. Every enumerated path starts at the queried node and ends at a root
//! 2. No path visits a node twice; cyclic edits are reported and pruned
//! 3. Resolution never mutates the edit index

pub mod cli;
pub mod core;
pub mod engine;
pub mod host;
pub mod loader;
pub mod menu;
pub mod publish;
pub mod ui;
