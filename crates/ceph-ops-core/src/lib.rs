//! Shared building blocks for the Ceph operator tools.
//!
//! The scrub monitor pipeline runs one way per cycle:
//! [`SnapshotSource::fetch`] produces a [`Snapshot`], [`Monitor::observe`]
//! classifies it against the previous cycle, and [`render`] lays the result
//! out for a fixed-size terminal.

pub mod classify;
pub mod error;
pub mod ledger;
pub mod model;
pub mod monitor;
pub mod render;
pub mod source;

pub use classify::{Classifier, DEFAULT_IDLE_THRESHOLD};
pub use error::DataSourceError;
pub use ledger::IdleLedger;
pub use model::{Category, CategoryCounts, ItemId, ItemRecord, Snapshot, VisualState};
pub use monitor::Monitor;
pub use render::{render, LineTone, Screen, ScreenLine, RESERVED_ROWS};
pub use source::{parse_pg_listing, CephCli, SnapshotSource};
