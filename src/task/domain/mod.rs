//! Domain model for bounty tasks.
//!
//! The task domain covers the on-chain task record, its byte-exact box
//! layout and the status state machine. Nothing here performs I/O: records
//! are decoded from bytes handed in by services and every decode produces a
//! fresh snapshot.

mod codec;
mod deadline;
mod error;
mod ids;
mod record;
mod status;

pub use codec::{
    BoxCursor, FIXED_HEADER_LEN, MAX_TEXT_LEN, MIN_BOX_LEN, decode_task_box, encode_task_box,
};
pub use deadline::{
    DEADLINE_SOON_WINDOW_SECS, SECONDS_PER_DAY, deadline_after_days, format_deadline,
    is_deadline_passed, is_deadline_soon, unix_now,
};
pub use error::{MalformedRecordReason, RecordField, TaskDomainError};
pub use ids::TaskId;
pub use record::{BoxText, TaskRecord, TaskRecordData};
pub use status::{ContractMethod, TaskStatus};
