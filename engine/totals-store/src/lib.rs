//! Totals Store - persistence boundary and consistency synchronizer
//!
//! Stored aggregates (per-stage totals and the all-time total) are derived
//! data: always safe to discard and rebuild from slips + matches. This crate
//! owns the [`TotalsStore`] document-store boundary, a memory backend and a
//! local JSON backend, and the [`TotalsSynchronizer`] that recomputes and
//! commits totals atomically so the stage-total / all-time pair can never be
//! observed half-written.

pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod store;
pub mod sync;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use local::LocalTotalsStore;
pub use memory::MemoryTotalsStore;
pub use store::TotalsStore;
pub use sync::TotalsSynchronizer;
