//! Run state for a single crawl
//!
//! This module defines the frontier, the record store and the aggregate
//! `RunState` the coordinator threads through every step.

mod frontier;
mod record;
mod record_store;
mod run_state;

pub use frontier::Frontier;
pub use record::Record;
pub use record_store::RecordStore;
pub use run_state::{Budget, Origin, RunState};
