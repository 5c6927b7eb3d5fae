//! In-memory integration tests for the task repository.

use crate::in_memory::helpers::{
    APP, CLIENT, FREELANCER, ledger, record, record_for, seed, task_id,
};
use bounty_board::{
    ledger::{adapters::memory::InMemoryLedger, domain::Address},
    task::{
        domain::{TaskDomainError, TaskRecord, TaskStatus},
        services::{FetchStrategy, TaskFetchError, TaskQueryError, TaskRepository},
    },
};
use rstest::rstest;
use std::{num::NonZeroUsize, sync::Arc};

fn ids(tasks: &[TaskRecord]) -> Vec<u64> {
    tasks.iter().map(|task| task.task_id().value()).collect()
}

fn concurrent(limit: usize) -> FetchStrategy {
    FetchStrategy::Concurrent {
        limit: NonZeroUsize::new(limit).unwrap_or(NonZeroUsize::MIN),
    }
}

#[rstest]
#[tokio::test]
async fn missing_counter_means_no_tasks(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    let repo = TaskRepository::new(ledger, APP);

    eyre::ensure!(repo.task_count().await? == 0);
    eyre::ensure!(repo.get_all_tasks().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn scan_returns_tasks_in_ascending_order(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    seed(
        &ledger,
        3,
        &[
            record(3, TaskStatus::Open, Address::ZERO),
            record(1, TaskStatus::Open, Address::ZERO),
            record(2, TaskStatus::Claimed, FREELANCER),
        ],
    )?;
    let repo = TaskRepository::new(Arc::clone(&ledger), APP);

    let tasks = repo.get_all_tasks().await?;

    eyre::ensure!(ids(&tasks) == vec![1, 2, 3], "unexpected order {:?}", ids(&tasks));
    eyre::ensure!(ledger.box_reads()? == 3);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn absent_boxes_are_skipped(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    seed(
        &ledger,
        3,
        &[
            record(1, TaskStatus::Open, Address::ZERO),
            record(3, TaskStatus::Open, Address::ZERO),
        ],
    )?;
    let repo = TaskRepository::new(ledger, APP);

    let scan = repo.scan_tasks().await?;

    eyre::ensure!(ids(scan.tasks()) == vec![1, 3]);
    let [(missing, error)] = scan.misses() else {
        eyre::bail!("expected one miss, got {}", scan.misses().len());
    };
    eyre::ensure!(*missing == task_id(2));
    eyre::ensure!(error.is_not_found());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn failing_read_does_not_abort_the_scan(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    seed(
        &ledger,
        3,
        &[
            record(1, TaskStatus::Open, Address::ZERO),
            record(2, TaskStatus::Open, Address::ZERO),
            record(3, TaskStatus::Open, Address::ZERO),
        ],
    )?;
    ledger.fail_box_reads(APP, &task_id(2).box_name())?;
    let repo = TaskRepository::new(ledger, APP);

    let scan = repo.scan_tasks().await?;

    eyre::ensure!(ids(scan.tasks()) == vec![1, 3]);
    eyre::ensure!(matches!(
        scan.misses(),
        [(_, TaskFetchError::Transport { .. })]
    ));
    Ok(())
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(16)]
#[tokio::test]
async fn concurrent_scan_preserves_order(
    ledger: Arc<InMemoryLedger>,
    #[case] limit: usize,
) -> eyre::Result<()> {
    let records: Vec<_> = (1..=10)
        .filter(|id| *id != 4)
        .map(|id| record(id, TaskStatus::Open, Address::ZERO))
        .collect();
    seed(&ledger, 10, &records)?;
    ledger.fail_box_reads(APP, &task_id(7).box_name())?;
    let repo = TaskRepository::new(Arc::clone(&ledger), APP).with_strategy(concurrent(limit));

    let scan = repo.scan_tasks().await?;

    eyre::ensure!(ids(scan.tasks()) == vec![1, 2, 3, 5, 6, 8, 9, 10]);
    eyre::ensure!(scan.misses().len() == 2);
    eyre::ensure!(ledger.box_reads()? == 10);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn get_task_distinguishes_not_found_from_transport(
    ledger: Arc<InMemoryLedger>,
) -> eyre::Result<()> {
    seed(&ledger, 2, &[record(1, TaskStatus::Open, Address::ZERO)])?;
    let repo = TaskRepository::new(Arc::clone(&ledger), APP);

    eyre::ensure!(repo.get_task(task_id(1)).await?.title() == "Task 1");
    eyre::ensure!(matches!(
        repo.get_task(task_id(2)).await,
        Err(TaskFetchError::NotFound(id)) if id == task_id(2)
    ));

    ledger.set_offline(true)?;
    eyre::ensure!(matches!(
        repo.get_task(task_id(1)).await,
        Err(TaskFetchError::Transport { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn find_task_collapses_failures(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    seed(&ledger, 1, &[record(1, TaskStatus::Open, Address::ZERO)])?;
    let repo = TaskRepository::new(Arc::clone(&ledger), APP);

    eyre::ensure!(repo.find_task(task_id(1)).await.is_some());
    eyre::ensure!(repo.find_task(task_id(9)).await.is_none());
    ledger.set_offline(true)?;
    eyre::ensure!(repo.find_task(task_id(1)).await.is_none());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn malformed_box_is_reported(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    ledger.set_global_uint(APP, b"task_counter", 1)?;
    ledger.put_box(APP, &task_id(1).box_name(), vec![0; 40])?;
    let repo = TaskRepository::new(ledger, APP);

    let result = repo.get_task(task_id(1)).await;

    eyre::ensure!(matches!(
        result,
        Err(TaskFetchError::Malformed(TaskDomainError::MalformedRecord { .. }))
    ));
    eyre::ensure!(repo.get_all_tasks().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn unreachable_ledger_fails_the_scan(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    ledger.set_offline(true)?;
    let repo = TaskRepository::new(ledger, APP);

    eyre::ensure!(matches!(
        repo.scan_tasks().await,
        Err(TaskQueryError::Counter { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn byte_valued_counter_is_rejected(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    ledger.set_global_bytes(APP, b"task_counter", b"three".to_vec())?;
    let repo = TaskRepository::new(ledger, APP);

    eyre::ensure!(matches!(
        repo.task_count().await,
        Err(TaskQueryError::CounterType(app)) if app == APP
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn filters_select_matching_tasks(ledger: Arc<InMemoryLedger>) -> eyre::Result<()> {
    let other_client = Address::new([0x0c; 32]);
    seed(
        &ledger,
        4,
        &[
            record(1, TaskStatus::Open, Address::ZERO),
            record(2, TaskStatus::Claimed, FREELANCER),
            record(3, TaskStatus::Submitted, FREELANCER),
            record_for(other_client, 4, TaskStatus::Open, Address::ZERO),
        ],
    )?;
    let repo = TaskRepository::new(ledger, APP);

    eyre::ensure!(ids(&repo.get_tasks_by_status(TaskStatus::Open).await?) == vec![1, 4]);
    eyre::ensure!(ids(&repo.get_tasks_by_client(&CLIENT).await?) == vec![1, 2, 3]);
    eyre::ensure!(ids(&repo.get_tasks_by_client(&other_client).await?) == vec![4]);
    eyre::ensure!(ids(&repo.get_tasks_by_freelancer(&FREELANCER).await?) == vec![2, 3]);
    eyre::ensure!(
        repo.get_tasks_by_status(TaskStatus::Refunded)
            .await?
            .is_empty()
    );
    Ok(())
}
