//! core
//!
//! Core domain types and algorithms for Shotpath.
//!
//! # Modules
//!
//! - [`types`] - Strong types: NodeId
//! - [`edits`] - Edit records and the child-to-parent edit index
//! - [`resolve`] - Edit path enumeration with cycle pruning
//! - [`template`] - Path templates and field resolution
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Identities are validated at construction
//! - Per-node edit order is scan order
//! - Resolution is deterministic for a given index

pub mod config;
pub mod edits;
pub mod resolve;
pub mod template;
pub mod types;
