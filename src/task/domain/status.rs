//! Task lifecycle status and the contract methods that drive it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status as stored in the status byte.
///
/// Bytes outside the documented range are preserved as
/// [`TaskStatus::Unknown`] so decoding never fails on the status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum TaskStatus {
    /// Funded and waiting for a freelancer.
    Open,
    /// Claimed by a freelancer.
    Claimed,
    /// Work submitted with a proof hash.
    Submitted,
    /// Approved and paid out.
    Approved,
    /// Submission rejected by the client.
    Rejected,
    /// Funds returned to the client.
    Refunded,
    /// Any other status byte. Decoding never yields a documented code here.
    Unknown(u8),
}

impl TaskStatus {
    /// The six documented statuses in code order.
    pub const KNOWN: [Self; 6] = [
        Self::Open,
        Self::Claimed,
        Self::Submitted,
        Self::Approved,
        Self::Rejected,
        Self::Refunded,
    ];

    /// Returns the raw status byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Claimed => 1,
            Self::Submitted => 2,
            Self::Approved => 3,
            Self::Rejected => 4,
            Self::Refunded => 5,
            Self::Unknown(code) => code,
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Claimed => "Claimed",
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Refunded => "Refunded",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Returns `true` for statuses with no outgoing transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Refunded)
    }

    /// Returns the status reached by applying `method`, or `None` when the
    /// transition table has no such edge.
    ///
    /// `Rejected` only leads to `Refunded`; re-opening or re-claiming a
    /// rejected task is not defined.
    #[must_use]
    pub const fn next(self, method: ContractMethod) -> Option<Self> {
        match (self, method) {
            (Self::Open, ContractMethod::ClaimTask) => Some(Self::Claimed),
            (Self::Claimed, ContractMethod::SubmitWork) => Some(Self::Submitted),
            (Self::Submitted, ContractMethod::ApproveTask) => Some(Self::Approved),
            (Self::Submitted, ContractMethod::RejectTask) => Some(Self::Rejected),
            (Self::Open | Self::Claimed | Self::Rejected, ContractMethod::RefundTask) => {
                Some(Self::Refunded)
            }
            _ => None,
        }
    }

    /// Returns `true` when `method` is legal from this status.
    #[must_use]
    pub const fn permits(self, method: ContractMethod) -> bool {
        self.next(method).is_some()
    }

    /// Lists the methods callable from this status.
    #[must_use]
    pub fn allowed_methods(self) -> Vec<ContractMethod> {
        ContractMethod::ALL
            .into_iter()
            .filter(|method| self.permits(*method))
            .collect()
    }
}

impl From<u8> for TaskStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Open,
            1 => Self::Claimed,
            2 => Self::Submitted,
            3 => Self::Approved,
            4 => Self::Rejected,
            5 => Self::Refunded,
            other => Self::Unknown(other),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Contract methods, identified on-chain by their ASCII selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractMethod {
    /// Funds and creates a task.
    CreateTask,
    /// Claims an open task.
    ClaimTask,
    /// Submits work for a claimed task.
    SubmitWork,
    /// Approves submitted work and releases the bounty.
    ApproveTask,
    /// Rejects submitted work.
    RejectTask,
    /// Returns the bounty to the client after the deadline.
    RefundTask,
}

impl ContractMethod {
    /// Every method in declaration order.
    pub const ALL: [Self; 6] = [
        Self::CreateTask,
        Self::ClaimTask,
        Self::SubmitWork,
        Self::ApproveTask,
        Self::RejectTask,
        Self::RefundTask,
    ];

    /// Returns the ASCII selector passed as the first call argument.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::ClaimTask => "claim_task",
            Self::SubmitWork => "submit_work",
            Self::ApproveTask => "approve_task",
            Self::RejectTask => "reject_task",
            Self::RefundTask => "refund_task",
        }
    }
}

impl fmt::Display for ContractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}
