//! VyOS firewall ruleset modeling, compilation, and snapshot management.
//!
//! This library turns a structured firewall document (groups, chains,
//! stateful filters, flow-offload tables, interfaces) into the ordered
//! sequence of imperative `set` directives the VyOS CLI expects, keeps
//! historical snapshots of the document, and renders line-aligned
//! differences between any two snapshots' compiled output.
//!
//! # Architecture
//!
//! - [`model`] — typed configuration document and its closed enums
//! - [`migrate`] — best-effort upgrade of legacy on-disk document shapes
//! - [`store`] — document store adapter (trait plus memory and
//!   filesystem backends)
//! - [`repo`] — load/save of the live document with migrate-on-read
//! - [`ops`] — one mutation operation per entity/action pair
//! - [`compile`] — pure document → directive compiler
//! - [`snapshot`] — create/list/tag/select/delete point-in-time copies
//! - [`diff`] — compile two snapshots and align their output, built on
//!   `line-diff-core`
//! - [`device`] — boundary types handed to the external device client
//! - [`report`] — terminal-friendly colored rendering
//!
//! The persistence backend and the SSH/device protocol are external
//! collaborators; this crate only consumes the [`store::DocumentStore`]
//! contract and produces [`device::PushRequest`] values.

pub mod compile;
pub mod context;
pub mod device;
pub mod diff;
pub mod error;
pub mod migrate;
pub mod model;
pub mod ops;
pub mod repo;
pub mod report;
pub mod snapshot;
pub mod store;

pub use context::RequestContext;
pub use error::{Error, Result, ValidationError};
pub use model::ConfigDocument;
