//! In-memory integration tests for the transaction builder.

use crate::in_memory::helpers::{APP, CLIENT, FREELANCER, contract, ledger, record, task_id};
use bounty_board::{
    ledger::{
        adapters::memory::InMemoryLedger,
        domain::{
            Address, ContractRef, LedgerDomainError, MicroAlgos, TransactionKind,
            UnsignedTransaction,
        },
    },
    task::{
        domain::{ContractMethod, RecordField, TaskDomainError, TaskStatus, unix_now},
        services::{CreateTaskRequest, TaskCall, TransactionBuildError, TransactionBuilder},
    },
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

type TestBuilder = TransactionBuilder<InMemoryLedger, DefaultClock>;

const DEADLINE_TOLERANCE_SECS: u64 = 5;

#[fixture]
fn builder(ledger: Arc<InMemoryLedger>, contract: ContractRef) -> TestBuilder {
    TransactionBuilder::new(ledger, Arc::new(DefaultClock), contract)
}

fn args(transaction: &UnsignedTransaction) -> eyre::Result<&[Vec<u8>]> {
    transaction
        .app_args()
        .ok_or_else(|| eyre::eyre!("expected an application call"))
}

#[rstest]
#[tokio::test]
async fn create_task_builds_a_funded_group(builder: TestBuilder) -> eyre::Result<()> {
    let before = unix_now(&DefaultClock);
    let request = CreateTaskRequest::with_whole_algos(CLIENT, "Build Website", "desc", 10, 7)?;

    let group = builder.create_task(request).await?;

    let [payment, call] = group.transactions() else {
        eyre::bail!("expected two transactions, got {}", group.len());
    };
    eyre::ensure!(payment.group() == Some(group.id()));
    eyre::ensure!(call.group() == Some(group.id()));
    eyre::ensure!(
        *payment.kind()
            == TransactionKind::Payment {
                receiver: APP.address(),
                amount: MicroAlgos::new(10_000_000),
            }
    );
    eyre::ensure!(payment.sender() == CLIENT && call.sender() == CLIENT);

    let [selector, title, description, deadline_arg] = args(call)? else {
        eyre::bail!("expected four call arguments");
    };
    eyre::ensure!(selector.as_slice() == b"create_task");
    eyre::ensure!(title.as_slice() == b"Build Website");
    eyre::ensure!(description.as_slice() == b"desc");
    let deadline = u64::from_be_bytes(deadline_arg.as_slice().try_into()?);
    let expected = before + 7 * 86_400;
    eyre::ensure!(
        deadline >= expected && deadline <= expected + DEADLINE_TOLERANCE_SECS,
        "deadline {deadline} not within tolerance of {expected}"
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn create_task_applies_minimum_fee(builder: TestBuilder) -> eyre::Result<()> {
    let group = builder
        .create_task(CreateTaskRequest::new(CLIENT, "t", "d", MicroAlgos::new(1), 1))
        .await?;

    for transaction in group.transactions() {
        eyre::ensure!(transaction.fee() == MicroAlgos::new(1_000));
    }
    Ok(())
}

#[rstest]
#[case::zero_amount(0, 7)]
#[case::zero_deadline(10_000_000, 0)]
#[tokio::test]
async fn create_task_rejects_non_positive_inputs_offline(
    ledger: Arc<InMemoryLedger>,
    contract: ContractRef,
    #[case] amount: u64,
    #[case] days: u64,
) -> eyre::Result<()> {
    ledger.set_offline(true)?;
    let builder = TransactionBuilder::new(ledger, Arc::new(DefaultClock), contract);

    let result = builder
        .create_task(CreateTaskRequest::new(
            CLIENT,
            "t",
            "d",
            MicroAlgos::new(amount),
            days,
        ))
        .await;

    eyre::ensure!(matches!(
        result,
        Err(TransactionBuildError::ZeroAmount | TransactionBuildError::ZeroDeadline)
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn create_task_rejects_oversized_title(builder: TestBuilder) {
    let request =
        CreateTaskRequest::new(CLIENT, "t".repeat(65_536), "d", MicroAlgos::new(1), 1);

    let result = builder.create_task(request).await;

    assert!(matches!(
        result,
        Err(TransactionBuildError::Domain(TaskDomainError::FieldTooLong {
            field: RecordField::Title,
            ..
        }))
    ));
}

#[rstest]
#[tokio::test]
async fn create_task_funds_fractional_bounty(builder: TestBuilder) -> eyre::Result<()> {
    let request = CreateTaskRequest::new(CLIENT, "t", "d", MicroAlgos::new(500_000), 1);

    let group = builder.create_task(request).await?;

    let [payment, _] = group.transactions() else {
        eyre::bail!("expected two transactions, got {}", group.len());
    };
    eyre::ensure!(
        *payment.kind()
            == TransactionKind::Payment {
                receiver: APP.address(),
                amount: MicroAlgos::new(500_000),
            }
    );
    let amt = [0xa3, b'a', b'm', b't', 0xce, 0x00, 0x07, 0xa1, 0x20];
    eyre::ensure!(payment.encode().get(1..10) == Some(amt.as_slice()));
    Ok(())
}

#[rstest]
fn whole_algo_request_rejects_amount_overflow() {
    assert_eq!(
        CreateTaskRequest::with_whole_algos(CLIENT, "t", "d", u64::MAX, 1),
        Err(LedgerDomainError::AmountOverflow(u64::MAX))
    );
}

#[rstest]
fn whole_algo_request_scales_to_micro_units() -> eyre::Result<()> {
    let request = CreateTaskRequest::with_whole_algos(CLIENT, "t", "d", 3, 1)?;
    eyre::ensure!(request.amount() == MicroAlgos::new(3_000_000));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn unreachable_ledger_surfaces_params_error(
    ledger: Arc<InMemoryLedger>,
    contract: ContractRef,
) -> eyre::Result<()> {
    ledger.set_offline(true)?;
    let builder = TransactionBuilder::new(ledger, Arc::new(DefaultClock), contract);
    eyre::ensure!(matches!(
        builder.claim_task(FREELANCER, task_id(1)).await,
        Err(TransactionBuildError::Params(_))
    ));
    Ok(())
}

#[rstest]
#[case(TaskCall::Claim, "claim_task")]
#[case(TaskCall::Approve, "approve_task")]
#[case(TaskCall::Reject, "reject_task")]
#[case(TaskCall::Refund, "refund_task")]
#[tokio::test]
async fn task_calls_carry_selector_and_id(
    builder: TestBuilder,
    #[case] call: TaskCall,
    #[case] selector: &str,
) -> eyre::Result<()> {
    let transaction = builder.call(FREELANCER, task_id(0x0102), call).await?;

    eyre::ensure!(transaction.group().is_none());
    eyre::ensure!(
        args(&transaction)?
            == [
                selector.as_bytes().to_vec(),
                vec![0, 0, 0, 0, 0, 0, 1, 2]
            ]
            .as_slice()
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn submit_work_appends_proof_hash(builder: TestBuilder) -> eyre::Result<()> {
    let transaction = builder
        .submit_work(FREELANCER, task_id(5), "ipfs://proof")
        .await?;

    let [selector, id, proof] = args(&transaction)? else {
        eyre::bail!("expected three call arguments");
    };
    eyre::ensure!(selector.as_slice() == ContractMethod::SubmitWork.selector().as_bytes());
    eyre::ensure!(id.as_slice() == 5_u64.to_be_bytes().as_slice());
    eyre::ensure!(proof.as_slice() == b"ipfs://proof");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn build_checked_allows_documented_transition(builder: TestBuilder) -> eyre::Result<()> {
    let task = record(2, TaskStatus::Open, Address::ZERO);

    let transaction = builder
        .build_checked(FREELANCER, &task, TaskCall::Claim)
        .await?;

    let selector = args(&transaction)?.first().map(Vec::as_slice);
    eyre::ensure!(selector == Some(b"claim_task".as_slice()));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn build_checked_refuses_reclaiming_rejected_task(
    ledger: Arc<InMemoryLedger>,
    contract: ContractRef,
) -> eyre::Result<()> {
    ledger.set_offline(true)?;
    let builder = TransactionBuilder::new(ledger, Arc::new(DefaultClock), contract);
    let task = record(3, TaskStatus::Rejected, FREELANCER);

    let result = builder
        .build_checked(FREELANCER, &task, TaskCall::Claim)
        .await;

    eyre::ensure!(matches!(
        result,
        Err(TransactionBuildError::Domain(TaskDomainError::InvalidTransition {
            from: TaskStatus::Rejected,
            method: ContractMethod::ClaimTask,
            ..
        }))
    ));
    Ok(())
}
