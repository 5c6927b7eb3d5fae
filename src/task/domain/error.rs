//! Error types for task domain validation and decoding.

use super::{ContractMethod, TaskId, TaskStatus};
use std::fmt;
use thiserror::Error;

/// Errors returned while constructing, decoding or transitioning tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// Task ids start at one.
    #[error("invalid task id {0}, expected a positive integer")]
    InvalidTaskId(u64),

    /// A text field does not fit its 16-bit length prefix.
    #[error("{field} is {len} bytes, exceeding the {max}-byte box limit", max = super::MAX_TEXT_LEN)]
    FieldTooLong {
        /// Offending field.
        field: RecordField,
        /// Actual length in bytes.
        len: usize,
    },

    /// Box bytes do not follow the task layout.
    #[error("malformed record for task {task_id}: {reason}")]
    MalformedRecord {
        /// Task whose box was decoded.
        task_id: TaskId,
        /// What went wrong.
        reason: MalformedRecordReason,
    },

    /// The requested contract method is not legal from the current status.
    #[error("{method} is not permitted for task {task_id} in status {from}")]
    InvalidTransition {
        /// Task the method was requested for.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested method.
        method: ContractMethod,
    },
}

/// Decode failure detail for [`TaskDomainError::MalformedRecord`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MalformedRecordReason {
    /// A read would run past the end of the buffer.
    #[error("{field} needs {needed} bytes but only {remaining} remain")]
    Truncated {
        /// Field being read.
        field: RecordField,
        /// Bytes the field needs.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A text field is not UTF-8.
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 {
        /// Field being read.
        field: RecordField,
    },

    /// Bytes remain after the last field.
    #[error("{count} unexpected bytes after the proof hash")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },
}

/// Fields of the task box layout, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// Creator and funder address.
    Client,
    /// Claimant address.
    Freelancer,
    /// Bounty amount.
    Amount,
    /// Deadline in unix seconds.
    Deadline,
    /// Status byte.
    Status,
    /// Length prefix of the title.
    TitleLength,
    /// Title text.
    Title,
    /// Length prefix of the description.
    DescriptionLength,
    /// Description text.
    Description,
    /// Length prefix of the proof hash.
    ProofHashLength,
    /// Proof hash text.
    ProofHash,
}

impl RecordField {
    /// Returns the field name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Freelancer => "freelancer",
            Self::Amount => "amount",
            Self::Deadline => "deadline",
            Self::Status => "status",
            Self::TitleLength => "title length",
            Self::Title => "title",
            Self::DescriptionLength => "description length",
            Self::Description => "description",
            Self::ProofHashLength => "proof hash length",
            Self::ProofHash => "proof hash",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
