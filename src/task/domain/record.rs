//! The task record stored in each task box.

use super::{
    ContractMethod, RecordField, TaskDomainError, TaskId, TaskStatus,
    codec::{FIXED_HEADER_LEN, LENGTH_PREFIX_LEN},
};
use crate::ledger::domain::{Address, MicroAlgos};
use serde::Serialize;
use std::fmt;

/// UTF-8 text whose byte length fits a 16-bit length prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct BoxText {
    text: String,
    len: u16,
}

impl BoxText {
    /// Validates `value` for storage in `field`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::FieldTooLong`] when the text exceeds
    /// 65535 bytes.
    pub fn new(field: RecordField, value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let text = value.into();
        let len = u16::try_from(text.len()).map_err(|_| TaskDomainError::FieldTooLong {
            field,
            len: text.len(),
        })?;
        Ok(Self { text, len })
    }

    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the byte length as stored in the length prefix.
    #[must_use]
    pub const fn prefix(&self) -> u16 {
        self.len
    }

    /// Returns the stored size: prefix plus payload.
    #[must_use]
    pub fn stored_len(&self) -> usize {
        LENGTH_PREFIX_LEN + usize::from(self.len)
    }
}

impl From<BoxText> for String {
    fn from(value: BoxText) -> Self {
        value.text
    }
}

impl fmt::Display for BoxText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parameter object for building a [`TaskRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecordData {
    /// Task identifier (box name).
    pub task_id: TaskId,
    /// Creator and funder.
    pub client: Address,
    /// Claimant, or [`Address::ZERO`] before a claim.
    pub freelancer: Address,
    /// Bounty in micro units.
    pub amount: MicroAlgos,
    /// Deadline in unix seconds.
    pub deadline: u64,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Title text.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Proof hash, empty until work is submitted.
    pub proof_hash: String,
}

/// Snapshot of one task as stored on-chain.
///
/// Records are read-only: the ledger box is the source of truth and every
/// read yields a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    task_id: TaskId,
    client: Address,
    freelancer: Address,
    amount: MicroAlgos,
    deadline: u64,
    status: TaskStatus,
    title: BoxText,
    description: BoxText,
    proof_hash: BoxText,
}

impl TaskRecord {
    /// Builds a record, validating text field lengths.
    ///
    /// The status is normalized through its byte code, so
    /// `TaskStatus::Unknown(3)` is stored as [`TaskStatus::Approved`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::FieldTooLong`] when a text field exceeds
    /// 65535 bytes.
    pub fn new(data: TaskRecordData) -> Result<Self, TaskDomainError> {
        Ok(Self {
            task_id: data.task_id,
            client: data.client,
            freelancer: data.freelancer,
            amount: data.amount,
            deadline: data.deadline,
            status: TaskStatus::from(data.status.code()),
            title: BoxText::new(RecordField::Title, data.title)?,
            description: BoxText::new(RecordField::Description, data.description)?,
            proof_hash: BoxText::new(RecordField::ProofHash, data.proof_hash)?,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the creator and funder.
    #[must_use]
    pub const fn client(&self) -> Address {
        self.client
    }

    /// Returns the claimant, [`Address::ZERO`] when unclaimed.
    #[must_use]
    pub const fn freelancer(&self) -> Address {
        self.freelancer
    }

    /// Returns `true` once a freelancer has claimed the task.
    #[must_use]
    pub fn has_freelancer(&self) -> bool {
        !self.freelancer.is_zero()
    }

    /// Returns the bounty amount.
    #[must_use]
    pub const fn amount(&self) -> MicroAlgos {
        self.amount
    }

    /// Returns the deadline in unix seconds.
    #[must_use]
    pub const fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the proof hash, empty before submission.
    #[must_use]
    pub fn proof_hash(&self) -> &str {
        self.proof_hash.as_str()
    }

    pub(super) const fn texts(&self) -> [&BoxText; 3] {
        [&self.title, &self.description, &self.proof_hash]
    }

    /// Returns the exact size of this record's box in bytes.
    #[must_use]
    pub fn box_len(&self) -> usize {
        FIXED_HEADER_LEN
            + self
                .texts()
                .iter()
                .map(|text| text.stored_len())
                .sum::<usize>()
    }

    /// Checks `method` against the status transition table.
    ///
    /// Returns the status the contract will move the task to.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the table has no
    /// edge for `method` from the current status.
    pub const fn ensure_permits(
        &self,
        method: ContractMethod,
    ) -> Result<TaskStatus, TaskDomainError> {
        match self.status.next(method) {
            Some(status) => Ok(status),
            None => Err(TaskDomainError::InvalidTransition {
                task_id: self.task_id,
                from: self.status,
                method,
            }),
        }
    }
}
