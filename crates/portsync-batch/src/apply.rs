//! Batch application of port renames.
//!
//! Rows are processed strictly in source order, one remote call at a
//! time. Each well-formed row costs exactly one mutating call; a
//! malformed row costs none. Failures are recorded against their row
//! and the batch runs to completion.

use crate::source::{ParsedRow, RowKind};
use portsync_dashboard::PortWriter;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, trace, warn};

/// How much per-row output the applier emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No per-row output; outcomes are only accumulated.
    Quiet,
    /// One progress line per row.
    #[default]
    Verbose,
    /// Per-row progress plus the payload being sent.
    Trace,
}

/// Final state of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// The rename was accepted by the remote side.
    Applied,
    /// The remote call failed; the cause is in the outcome detail.
    RemoteError,
    /// The row was missing required fields; no remote call was made.
    MalformedRow,
    /// The run deadline expired before this row; no remote call was made.
    DeadlineExceeded,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Applied => "applied",
            Self::RemoteError => "remote error",
            Self::MalformedRow => "malformed row",
            Self::DeadlineExceeded => "deadline exceeded",
        };
        f.write_str(label)
    }
}

/// Result of attempting to apply one row. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The source row this outcome corresponds to.
    pub row: ParsedRow,
    /// Final state of the row.
    pub status: RowStatus,
    /// Human-readable cause when the row did not apply.
    pub detail: Option<String>,
}

impl UpdateOutcome {
    /// True if the rename was applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self.status, RowStatus::Applied)
    }
}

/// The ordered outcomes of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    outcomes: Vec<UpdateOutcome>,
}

impl BatchReport {
    /// Outcomes in source-row order.
    #[must_use]
    pub fn outcomes(&self) -> &[UpdateOutcome] {
        &self.outcomes
    }

    /// Number of rows that applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Number of rows that did not apply, for any reason.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.applied()
    }

    /// Total number of data rows in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True if the batch had no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True if every row applied.
    #[must_use]
    pub fn all_applied(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applied, {} failed of {} rows",
            self.applied(),
            self.failed(),
            self.len()
        )
    }
}

/// Options controlling one batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Per-row output level.
    pub verbosity: Verbosity,
    /// Overall wall-clock budget for the run. Rows not started before
    /// the deadline are recorded without a remote call.
    pub run_deadline: Option<Duration>,
}

/// Applies a batch of parsed rows through a [`PortWriter`].
pub struct BatchApplier<W: PortWriter> {
    writer: W,
    options: BatchOptions,
}

impl<W: PortWriter> BatchApplier<W> {
    /// Create an applier over the given writer.
    pub fn new(writer: W, options: BatchOptions) -> Self {
        Self { writer, options }
    }

    /// Apply every row, in order, and return the ordered report.
    ///
    /// One outcome is produced per data row. A failed or malformed row
    /// never prevents the rows after it from being attempted.
    pub async fn run(&self, rows: Vec<ParsedRow>) -> BatchReport {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(rows.len());

        for row in rows {
            let outcome = if self.deadline_elapsed(started) {
                UpdateOutcome {
                    row,
                    status: RowStatus::DeadlineExceeded,
                    detail: Some("run deadline exceeded before this row".to_string()),
                }
            } else {
                self.apply_row(row).await
            };

            self.report_row(&outcome);
            outcomes.push(outcome);
        }

        BatchReport { outcomes }
    }

    fn deadline_elapsed(&self, started: Instant) -> bool {
        self.options
            .run_deadline
            .is_some_and(|deadline| started.elapsed() >= deadline)
    }

    async fn apply_row(&self, row: ParsedRow) -> UpdateOutcome {
        let port = match &row.kind {
            RowKind::Malformed(reason) => {
                let detail = reason.clone();
                return UpdateOutcome {
                    row,
                    status: RowStatus::MalformedRow,
                    detail: Some(detail),
                };
            }
            RowKind::Row(port) => port.clone(),
        };

        // The raw request payload is logged by the writer itself at
        // trace level; here we announce the attempt.
        if self.options.verbosity == Verbosity::Trace {
            trace!(
                serial = %port.serial,
                port = %port.port_number,
                name = %port.name,
                "Sending rename"
            );
        }

        match self
            .writer
            .set_port_name(&port.serial, &port.port_number, &port.name)
            .await
        {
            Ok(()) => UpdateOutcome {
                row,
                status: RowStatus::Applied,
                detail: None,
            },
            Err(err) => UpdateOutcome {
                row,
                status: RowStatus::RemoteError,
                detail: Some(err.to_string()),
            },
        }
    }

    fn report_row(&self, outcome: &UpdateOutcome) {
        if self.options.verbosity == Verbosity::Quiet {
            return;
        }

        match (&outcome.row.kind, outcome.status) {
            (RowKind::Row(port), RowStatus::Applied) => {
                info!(
                    line = outcome.row.line,
                    serial = %port.serial,
                    port = %port.port_number,
                    name = %port.name,
                    "Port renamed"
                );
            }
            (RowKind::Row(port), status) => {
                warn!(
                    line = outcome.row.line,
                    serial = %port.serial,
                    port = %port.port_number,
                    status = %status,
                    detail = outcome.detail.as_deref().unwrap_or(""),
                    "Port not renamed"
                );
            }
            (RowKind::Malformed(_), _) => {
                warn!(
                    line = outcome.row.line,
                    detail = outcome.detail.as_deref().unwrap_or(""),
                    "Row skipped"
                );
            }
        }
    }
}
