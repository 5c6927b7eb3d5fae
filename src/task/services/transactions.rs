//! Write-side service: shapes unsigned transactions for contract actions.

use crate::{
    ledger::{
        domain::{
            Address, ContractRef, LedgerDomainError, MicroAlgos, SuggestedParams,
            TransactionGroup, UnsignedTransaction,
        },
        ports::{LedgerClient, LedgerError},
    },
    task::domain::{
        BoxText, ContractMethod, RecordField, TaskDomainError, TaskId, TaskRecord,
        deadline_after_days,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for funding and creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    sender: Address,
    title: String,
    description: String,
    amount: MicroAlgos,
    deadline_days: u64,
}

impl CreateTaskRequest {
    /// Creates a request funding `amount` micro units. The deadline is
    /// counted in days from the builder clock's current time.
    #[must_use]
    pub fn new(
        sender: Address,
        title: impl Into<String>,
        description: impl Into<String>,
        amount: MicroAlgos,
        deadline_days: u64,
    ) -> Self {
        Self {
            sender,
            title: title.into(),
            description: description.into(),
            amount,
            deadline_days,
        }
    }

    /// Creates a request funding a whole number of ALGO.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::AmountOverflow`] when `algos` does not
    /// fit in micro units.
    pub fn with_whole_algos(
        sender: Address,
        title: impl Into<String>,
        description: impl Into<String>,
        algos: u64,
        deadline_days: u64,
    ) -> Result<Self, LedgerDomainError> {
        let amount = MicroAlgos::from_algos(algos)?;
        Ok(Self::new(sender, title, description, amount, deadline_days))
    }

    /// Returns the bounty in micro units.
    #[must_use]
    pub const fn amount(&self) -> MicroAlgos {
        self.amount
    }
}

/// A single-transaction contract action on an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCall {
    /// `claim_task`
    Claim,
    /// `submit_work` with the proof hash argument.
    SubmitWork {
        /// Hash or reference identifying the delivered work.
        proof_hash: String,
    },
    /// `approve_task`
    Approve,
    /// `reject_task`
    Reject,
    /// `refund_task`
    Refund,
}

impl TaskCall {
    /// Returns the contract method this call invokes.
    #[must_use]
    pub const fn method(&self) -> ContractMethod {
        match self {
            Self::Claim => ContractMethod::ClaimTask,
            Self::SubmitWork { .. } => ContractMethod::SubmitWork,
            Self::Approve => ContractMethod::ApproveTask,
            Self::Reject => ContractMethod::RejectTask,
            Self::Refund => ContractMethod::RefundTask,
        }
    }
}

/// Errors raised while building transactions.
#[derive(Debug, Error)]
pub enum TransactionBuildError {
    /// The bounty must be funded.
    #[error("bounty amount must be positive")]
    ZeroAmount,

    /// The deadline must be in the future.
    #[error("deadline must be at least one day away")]
    ZeroDeadline,

    /// The deadline does not fit in 64-bit unix seconds.
    #[error("deadline {0} days from now is out of range")]
    DeadlineOverflow(u64),

    /// Task field validation or transition check failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Grouping failed.
    #[error(transparent)]
    Ledger(#[from] LedgerDomainError),

    /// Network parameters could not be fetched.
    #[error("failed to fetch network parameters: {0}")]
    Params(#[source] LedgerError),
}

/// Result type for transaction building.
pub type TransactionBuildResult<T> = Result<T, TransactionBuildError>;

/// Builds unsigned transactions for the bounty contract.
///
/// Inputs are validated before any network call. The only ledger query is
/// the network parameter fetch.
#[derive(Clone)]
pub struct TransactionBuilder<L, C>
where
    L: LedgerClient,
    C: Clock + Send + Sync,
{
    ledger: Arc<L>,
    clock: Arc<C>,
    contract: ContractRef,
}

impl<L, C> TransactionBuilder<L, C>
where
    L: LedgerClient,
    C: Clock + Send + Sync,
{
    /// Creates a builder for `contract`.
    #[must_use]
    pub const fn new(ledger: Arc<L>, clock: Arc<C>, contract: ContractRef) -> Self {
        Self {
            ledger,
            clock,
            contract,
        }
    }

    /// Returns the contract this builder targets.
    #[must_use]
    pub const fn contract(&self) -> ContractRef {
        self.contract
    }

    async fn params(&self) -> TransactionBuildResult<SuggestedParams> {
        self.ledger
            .suggested_params()
            .await
            .map_err(TransactionBuildError::Params)
    }

    /// Builds the funded creation group: a payment of the bounty to the
    /// contract followed by the `create_task` call, sharing one group id.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionBuildError`] when the amount or deadline is zero
    /// or out of range, a text field is too long, or the parameter fetch
    /// fails.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
    ) -> TransactionBuildResult<TransactionGroup> {
        if request.amount.is_zero() {
            return Err(TransactionBuildError::ZeroAmount);
        }
        if request.deadline_days == 0 {
            return Err(TransactionBuildError::ZeroDeadline);
        }
        let title = BoxText::new(RecordField::Title, request.title)?;
        let description = BoxText::new(RecordField::Description, request.description)?;
        let deadline = deadline_after_days(&*self.clock, request.deadline_days)
            .ok_or(TransactionBuildError::DeadlineOverflow(request.deadline_days))?;

        let params = self.params().await?;
        let payment = UnsignedTransaction::payment(
            request.sender,
            self.contract.address,
            request.amount,
            &params,
        );
        let call = UnsignedTransaction::app_call(
            request.sender,
            self.contract.app_id,
            vec![
                selector_arg(ContractMethod::CreateTask),
                String::from(title).into_bytes(),
                String::from(description).into_bytes(),
                deadline.to_be_bytes().to_vec(),
            ],
            &params,
        );
        let group = TransactionGroup::new(vec![payment, call])?;

        tracing::info!(
            app_id = %self.contract.app_id,
            sender = %request.sender,
            amount = %request.amount,
            deadline,
            group = %group.id(),
            "assembled task creation group"
        );
        Ok(group)
    }

    /// Builds a `claim_task` call.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionBuildError::Params`] when the parameter fetch
    /// fails.
    pub async fn claim_task(
        &self,
        sender: Address,
        task_id: TaskId,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        self.task_call(sender, task_id, ContractMethod::ClaimTask, None)
            .await
    }

    /// Builds a `submit_work` call carrying the proof hash.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionBuildError::Domain`] when the proof hash exceeds
    /// 65535 bytes, or [`TransactionBuildError::Params`] when the parameter
    /// fetch fails.
    pub async fn submit_work(
        &self,
        sender: Address,
        task_id: TaskId,
        proof_hash: impl Into<String>,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        let proof = BoxText::new(RecordField::ProofHash, proof_hash)?;
        self.task_call(
            sender,
            task_id,
            ContractMethod::SubmitWork,
            Some(String::from(proof).into_bytes()),
        )
        .await
    }

    /// Builds an `approve_task` call.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionBuildError::Params`] when the parameter fetch
    /// fails.
    pub async fn approve_task(
        &self,
        sender: Address,
        task_id: TaskId,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        self.task_call(sender, task_id, ContractMethod::ApproveTask, None)
            .await
    }

    /// Builds a `reject_task` call.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionBuildError::Params`] when the parameter fetch
    /// fails.
    pub async fn reject_task(
        &self,
        sender: Address,
        task_id: TaskId,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        self.task_call(sender, task_id, ContractMethod::RejectTask, None)
            .await
    }

    /// Builds a `refund_task` call.
    ///
    /// Deadline eligibility is enforced by the contract.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionBuildError::Params`] when the parameter fetch
    /// fails.
    pub async fn refund_task(
        &self,
        sender: Address,
        task_id: TaskId,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        self.task_call(sender, task_id, ContractMethod::RefundTask, None)
            .await
    }

    /// Builds the call for `call` on `task_id` without a local status check.
    ///
    /// # Errors
    ///
    /// See the per-action builders.
    pub async fn call(
        &self,
        sender: Address,
        task_id: TaskId,
        call: TaskCall,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        match call {
            TaskCall::Claim => self.claim_task(sender, task_id).await,
            TaskCall::SubmitWork { proof_hash } => {
                self.submit_work(sender, task_id, proof_hash).await
            }
            TaskCall::Approve => self.approve_task(sender, task_id).await,
            TaskCall::Reject => self.reject_task(sender, task_id).await,
            TaskCall::Refund => self.refund_task(sender, task_id).await,
        }
    }

    /// Builds the call after checking it against the record's status.
    ///
    /// The contract remains the authority; this check only stops requests
    /// the transition table already rules out.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] (wrapped) before any
    /// network call when the status does not permit the method, otherwise
    /// the errors of [`Self::call`].
    pub async fn build_checked(
        &self,
        sender: Address,
        record: &TaskRecord,
        call: TaskCall,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        record.ensure_permits(call.method())?;
        self.call(sender, record.task_id(), call).await
    }

    async fn task_call(
        &self,
        sender: Address,
        task_id: TaskId,
        method: ContractMethod,
        extra: Option<Vec<u8>>,
    ) -> TransactionBuildResult<UnsignedTransaction> {
        let mut args = vec![selector_arg(method), task_id.to_be_bytes().to_vec()];
        args.extend(extra);
        let params = self.params().await?;

        tracing::debug!(
            app_id = %self.contract.app_id,
            task_id = %task_id,
            method = %method,
            "assembled task call"
        );
        Ok(UnsignedTransaction::app_call(
            sender,
            self.contract.app_id,
            args,
            &params,
        ))
    }
}

fn selector_arg(method: ContractMethod) -> Vec<u8> {
    method.selector().as_bytes().to_vec()
}
