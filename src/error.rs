//! Error types for table access and comparison validation.
//!
//! Only genuine misuse is an error: unknown columns, mismatched column
//! lengths, and comparisons over a group column that does not carry exactly
//! two arms. Insufficient data (small subgroups, degenerate denominators,
//! too few observations for an assumption check) is reported as data in the
//! result records, never as an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The named column does not exist in the observation table.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A column being added does not match the table's row count.
    #[error("column '{name}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Two-arm comparisons require exactly two distinct group labels.
    #[error("expected exactly 2 groups in column '{column}', found {n}: {labels:?}", n = labels.len())]
    GroupCount { column: String, labels: Vec<String> },
}
