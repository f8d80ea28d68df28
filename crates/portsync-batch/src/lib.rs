//! Batch port renaming: source file parsing and per-row application.
//!
//! A batch is the ordered set of rows parsed from one input file. Each
//! row is applied as one independent remote update; one row's failure
//! never prevents the rows after it from being attempted.

#![deny(missing_docs)]

pub mod apply;
pub mod source;

pub use apply::{
    BatchApplier, BatchOptions, BatchReport, RowStatus, UpdateOutcome, Verbosity,
};
pub use source::{read_rows, ParsedRow, PortRow, RowKind};

/// Convenient result alias sharing the `portsync-core` error type.
pub type Result<T> = portsync_core::Result<T>;
