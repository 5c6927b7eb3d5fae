//! Byte-exact codec for the task box layout.
//!
//! Layout, big-endian throughout and without padding:
//!
//! ```text
//! client      32 bytes
//! freelancer  32 bytes
//! amount       8 bytes  u64
//! deadline     8 bytes  u64, unix seconds
//! status       1 byte
//! title        2-byte length prefix + UTF-8 bytes
//! description  2-byte length prefix + UTF-8 bytes
//! proof hash   2-byte length prefix + UTF-8 bytes
//! ```
//!
//! The layout carries no version tag. A contract-side change must be
//! mirrored here by hand.

use super::{
    MalformedRecordReason, RecordField, TaskDomainError, TaskId, TaskRecord, TaskRecordData,
    TaskStatus,
};
use crate::ledger::domain::{ADDRESS_LEN, Address, MicroAlgos};

/// Size of the fixed-width header preceding the text fields.
pub const FIXED_HEADER_LEN: usize = ADDRESS_LEN + ADDRESS_LEN + 8 + 8 + 1;

/// Width of each text length prefix.
pub(crate) const LENGTH_PREFIX_LEN: usize = 2;

/// Smallest valid box: the header plus three empty text fields.
pub const MIN_BOX_LEN: usize = FIXED_HEADER_LEN + 3 * LENGTH_PREFIX_LEN;

/// Largest text payload a length prefix can describe.
pub const MAX_TEXT_LEN: usize = 65_535;

/// Read cursor over box bytes that checks bounds before every read.
#[derive(Debug, Clone)]
pub struct BoxCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> BoxCursor<'a> {
    /// Starts reading at the beginning of `bytes`.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Consumes `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordReason::Truncated`] when fewer than `len`
    /// bytes remain. The cursor does not advance on failure.
    pub fn take(
        &mut self,
        field: RecordField,
        len: usize,
    ) -> Result<&'a [u8], MalformedRecordReason> {
        let truncated = MalformedRecordReason::Truncated {
            field,
            needed: len,
            remaining: self.remaining(),
        };
        let end = self.offset.checked_add(len).ok_or(truncated)?;
        let slice = self.bytes.get(self.offset..end).ok_or(truncated)?;
        self.offset = end;
        Ok(slice)
    }

    /// Consumes exactly `N` bytes as an array.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordReason::Truncated`] when fewer than `N`
    /// bytes remain.
    pub fn take_array<const N: usize>(
        &mut self,
        field: RecordField,
    ) -> Result<[u8; N], MalformedRecordReason> {
        let remaining = self.remaining();
        let slice = self.take(field, N)?;
        <[u8; N]>::try_from(slice).map_err(|_| MalformedRecordReason::Truncated {
            field,
            needed: N,
            remaining,
        })
    }

    /// Reads a big-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordReason::Truncated`] when fewer than 8 bytes
    /// remain.
    pub fn read_u64(&mut self, field: RecordField) -> Result<u64, MalformedRecordReason> {
        self.take_array(field).map(u64::from_be_bytes)
    }

    /// Reads a big-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordReason::Truncated`] when fewer than 2 bytes
    /// remain.
    pub fn read_u16(&mut self, field: RecordField) -> Result<u16, MalformedRecordReason> {
        self.take_array(field).map(u16::from_be_bytes)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordReason::Truncated`] when the buffer is
    /// exhausted.
    pub fn read_u8(&mut self, field: RecordField) -> Result<u8, MalformedRecordReason> {
        self.take_array::<1>(field).map(|[byte]| byte)
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordReason::Truncated`] when the prefix or the
    /// payload overruns the buffer, or [`MalformedRecordReason::InvalidUtf8`]
    /// when the payload is not UTF-8.
    pub fn read_text(
        &mut self,
        length_field: RecordField,
        field: RecordField,
    ) -> Result<String, MalformedRecordReason> {
        let len = usize::from(self.read_u16(length_field)?);
        let payload = self.take(field, len)?;
        std::str::from_utf8(payload)
            .map(str::to_owned)
            .map_err(|_| MalformedRecordReason::InvalidUtf8 { field })
    }

    /// Ensures every byte was consumed.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordReason::TrailingBytes`] when bytes remain.
    pub const fn finish(&self) -> Result<(), MalformedRecordReason> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(MalformedRecordReason::TrailingBytes { count }),
        }
    }
}

/// Decodes the box bytes of task `task_id`.
///
/// Unknown status bytes are preserved as [`TaskStatus::Unknown`].
///
/// The box must end exactly after the proof hash. A contract that
/// pre-sizes boxes for a later proof, or pads them, leaves bytes past the
/// proof hash and every such task fails to decode with
/// [`MalformedRecordReason::TrailingBytes`]. Relaxing this means changing
/// the layout contract, not the decoder alone.
///
/// # Errors
///
/// Returns [`TaskDomainError::MalformedRecord`] when the bytes are
/// truncated, contain invalid UTF-8, or carry bytes past the proof hash.
pub fn decode_task_box(task_id: TaskId, bytes: &[u8]) -> Result<TaskRecord, TaskDomainError> {
    let data = read_record(task_id, &mut BoxCursor::new(bytes))
        .map_err(|reason| TaskDomainError::MalformedRecord { task_id, reason })?;
    TaskRecord::new(data)
}

fn read_record(
    task_id: TaskId,
    cursor: &mut BoxCursor<'_>,
) -> Result<TaskRecordData, MalformedRecordReason> {
    let client = Address::new(cursor.take_array(RecordField::Client)?);
    let freelancer = Address::new(cursor.take_array(RecordField::Freelancer)?);
    let amount = MicroAlgos::new(cursor.read_u64(RecordField::Amount)?);
    let deadline = cursor.read_u64(RecordField::Deadline)?;
    let status = TaskStatus::from(cursor.read_u8(RecordField::Status)?);
    let title = cursor.read_text(RecordField::TitleLength, RecordField::Title)?;
    let description =
        cursor.read_text(RecordField::DescriptionLength, RecordField::Description)?;
    let proof_hash = cursor.read_text(RecordField::ProofHashLength, RecordField::ProofHash)?;
    cursor.finish()?;

    Ok(TaskRecordData {
        task_id,
        client,
        freelancer,
        amount,
        deadline,
        status,
        title,
        description,
        proof_hash,
    })
}

/// Encodes a record into its box bytes.
///
/// The task id is not part of the payload.
#[must_use]
pub fn encode_task_box(record: &TaskRecord) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(record.box_len());
    bytes.extend_from_slice(record.client().as_bytes());
    bytes.extend_from_slice(record.freelancer().as_bytes());
    bytes.extend_from_slice(&record.amount().value().to_be_bytes());
    bytes.extend_from_slice(&record.deadline().to_be_bytes());
    bytes.push(record.status().code());
    for text in record.texts() {
        bytes.extend_from_slice(&text.prefix().to_be_bytes());
        bytes.extend_from_slice(text.as_str().as_bytes());
    }
    bytes
}
