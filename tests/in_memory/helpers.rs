//! Shared test helpers for in-memory ledger integration tests.

use bounty_board::{
    ledger::{
        adapters::memory::InMemoryLedger,
        domain::{Address, AppId, ContractRef, MicroAlgos},
    },
    task::{
        domain::{TaskId, TaskRecord, TaskRecordData, TaskStatus, encode_task_box},
        services::TASK_COUNTER_KEY,
    },
};
use rstest::fixture;
use std::sync::Arc;

/// Application id used by every in-memory test.
pub const APP: AppId = AppId::new(7_331);

/// Address of the task creator.
pub const CLIENT: Address = Address::new([0xc1; 32]);

/// Address of the freelancer.
pub const FREELANCER: Address = Address::new([0xf2; 32]);

/// Provides an in-memory ledger with the bounty application deployed.
#[fixture]
pub fn ledger() -> Arc<InMemoryLedger> {
    let ledger = InMemoryLedger::new();
    ledger
        .create_application(APP)
        .expect("application should be created");
    Arc::new(ledger)
}

/// Provides the contract reference for [`APP`].
#[fixture]
pub fn contract() -> ContractRef {
    ContractRef::from_app_id(APP)
}

/// Builds a task id, panicking on zero.
pub fn task_id(value: u64) -> TaskId {
    TaskId::new(value).expect("task id should be positive")
}

/// Builds a record for `id` created by [`CLIENT`].
pub fn record(id: u64, status: TaskStatus, freelancer: Address) -> TaskRecord {
    record_for(CLIENT, id, status, freelancer)
}

/// Builds a record for `id` created by `client`.
pub fn record_for(
    client: Address,
    id: u64,
    status: TaskStatus,
    freelancer: Address,
) -> TaskRecord {
    TaskRecord::new(TaskRecordData {
        task_id: task_id(id),
        client,
        freelancer,
        amount: MicroAlgos::new(id * 1_000_000),
        deadline: 1_700_000_000 + id,
        status,
        title: format!("Task {id}"),
        description: "Write the thing".to_owned(),
        proof_hash: String::new(),
    })
    .expect("record should be valid")
}

/// Stores `records` as boxes and sets the counter to `counter`.
///
/// # Errors
///
/// Returns an error if the ledger rejects a write.
pub fn seed(
    ledger: &InMemoryLedger,
    counter: u64,
    records: &[TaskRecord],
) -> eyre::Result<()> {
    ledger.set_global_uint(APP, TASK_COUNTER_KEY, counter)?;
    for record in records {
        ledger.put_box(APP, &record.task_id().box_name(), encode_task_box(record))?;
    }
    Ok(())
}
