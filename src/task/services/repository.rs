//! Read-side service: fetches task records from application boxes.

use crate::{
    ledger::{
        domain::{Address, AppId},
        ports::{LedgerClient, LedgerError, TealValue},
    },
    task::domain::{TaskDomainError, TaskId, TaskRecord, TaskStatus, decode_task_box},
};
use futures_util::{StreamExt, stream};
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;

/// Global state key holding the highest issued task id.
pub const TASK_COUNTER_KEY: &[u8] = b"task_counter";

/// How a full scan issues its box reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// One read at a time, in ascending id order.
    #[default]
    Sequential,
    /// Up to `limit` reads in flight; results still arrive in ascending id
    /// order.
    Concurrent {
        /// Maximum number of in-flight reads.
        limit: NonZeroUsize,
    },
}

/// Why a single task could not be read.
#[derive(Debug, Clone, Error)]
pub enum TaskFetchError {
    /// The task's box does not exist.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// The ledger query failed.
    #[error("failed to read task {task_id}: {source}")]
    Transport {
        /// Requested task.
        task_id: TaskId,
        /// Underlying ledger error.
        #[source]
        source: LedgerError,
    },

    /// The box exists but does not decode.
    #[error(transparent)]
    Malformed(#[from] TaskDomainError),
}

impl TaskFetchError {
    /// Returns `true` when the box is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Why a scan could not start.
#[derive(Debug, Clone, Error)]
pub enum TaskQueryError {
    /// Reading the application's global state failed.
    #[error("failed to read task counter for application {app_id}: {source}")]
    Counter {
        /// Queried application.
        app_id: AppId,
        /// Underlying ledger error.
        #[source]
        source: LedgerError,
    },

    /// The counter key holds a byte string instead of an integer.
    #[error("task counter of application {0} is not an integer")]
    CounterType(AppId),
}

/// Result of a full scan: decoded tasks plus the ids that could not be read.
#[derive(Debug, Clone, Default)]
pub struct TaskScan {
    tasks: Vec<TaskRecord>,
    misses: Vec<(TaskId, TaskFetchError)>,
}

impl TaskScan {
    /// Returns decoded tasks in ascending id order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Returns the ids skipped by the scan and why, in ascending id order.
    #[must_use]
    pub fn misses(&self) -> &[(TaskId, TaskFetchError)] {
        &self.misses
    }

    /// Consumes the scan, keeping only the decoded tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<TaskRecord> {
        self.tasks
    }
}

/// Task reader over the contract's boxes.
///
/// Holds no cache: every call reads the ledger again.
#[derive(Clone)]
pub struct TaskRepository<L>
where
    L: LedgerClient,
{
    ledger: Arc<L>,
    app_id: AppId,
    strategy: FetchStrategy,
}

impl<L> TaskRepository<L>
where
    L: LedgerClient,
{
    /// Creates a repository reading sequentially.
    #[must_use]
    pub const fn new(ledger: Arc<L>, app_id: AppId) -> Self {
        Self {
            ledger,
            app_id,
            strategy: FetchStrategy::Sequential,
        }
    }

    /// Replaces the scan strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reads and decodes one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFetchError::NotFound`] when the box is absent,
    /// [`TaskFetchError::Transport`] when the query fails, or
    /// [`TaskFetchError::Malformed`] when the bytes do not decode.
    pub async fn get_task(&self, task_id: TaskId) -> Result<TaskRecord, TaskFetchError> {
        tracing::debug!(app_id = %self.app_id, task_id = %task_id, "reading task box");
        let bytes = self
            .ledger
            .application_box(self.app_id, &task_id.box_name())
            .await
            .map_err(|source| {
                if source.is_not_found() {
                    TaskFetchError::NotFound(task_id)
                } else {
                    TaskFetchError::Transport { task_id, source }
                }
            })?;
        Ok(decode_task_box(task_id, &bytes)?)
    }

    /// Reads one task, collapsing every failure to `None`.
    ///
    /// Failures are logged at `warn`.
    pub async fn find_task(&self, task_id: TaskId) -> Option<TaskRecord> {
        match self.get_task(task_id).await {
            Ok(task) => Some(task),
            Err(err) => {
                tracing::warn!(task_id = %task_id, error = %err, "task unavailable");
                None
            }
        }
    }

    /// Reads the task counter from global state.
    ///
    /// An absent counter means no task has been created yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError::Counter`] when the state query fails or
    /// [`TaskQueryError::CounterType`] when the key holds bytes.
    pub async fn task_count(&self) -> Result<u64, TaskQueryError> {
        tracing::debug!(app_id = %self.app_id, "reading task counter");
        let application = self
            .ledger
            .application(self.app_id)
            .await
            .map_err(|source| TaskQueryError::Counter {
                app_id: self.app_id,
                source,
            })?;
        match application.global(TASK_COUNTER_KEY) {
            None => Ok(0),
            Some(TealValue::Uint(count)) => Ok(*count),
            Some(TealValue::Bytes(_)) => Err(TaskQueryError::CounterType(self.app_id)),
        }
    }

    /// Reads every task from id 1 up to the counter.
    ///
    /// A failing read is recorded in [`TaskScan::misses`] and never aborts
    /// the others.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError`] when the counter cannot be read.
    pub async fn scan_tasks(&self) -> Result<TaskScan, TaskQueryError> {
        let count = self.task_count().await?;
        let ids = TaskId::issued_up_to(count);

        let results: Vec<(TaskId, Result<TaskRecord, TaskFetchError>)> = match self.strategy {
            FetchStrategy::Sequential => {
                let mut results = Vec::new();
                for task_id in ids {
                    results.push((task_id, self.get_task(task_id).await));
                }
                results
            }
            FetchStrategy::Concurrent { limit } => {
                stream::iter(ids)
                    .map(|task_id| async move { (task_id, self.get_task(task_id).await) })
                    .buffered(limit.get())
                    .collect()
                    .await
            }
        };

        let mut scan = TaskScan::default();
        for (task_id, result) in results {
            match result {
                Ok(task) => scan.tasks.push(task),
                Err(err) => {
                    if err.is_not_found() {
                        tracing::debug!(task_id = %task_id, "task box absent, skipping");
                    } else {
                        tracing::warn!(
                            task_id = %task_id,
                            error = %err,
                            "skipping unreadable task"
                        );
                    }
                    scan.misses.push((task_id, err));
                }
            }
        }
        Ok(scan)
    }

    /// Reads every readable task in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError`] when the counter cannot be read.
    pub async fn get_all_tasks(&self) -> Result<Vec<TaskRecord>, TaskQueryError> {
        Ok(self.scan_tasks().await?.into_tasks())
    }

    /// Reads every task and keeps those matching `predicate`.
    async fn filtered(
        &self,
        predicate: impl Fn(&TaskRecord) -> bool,
    ) -> Result<Vec<TaskRecord>, TaskQueryError> {
        let mut tasks = self.get_all_tasks().await?;
        tasks.retain(|task| predicate(task));
        Ok(tasks)
    }

    /// Reads every task with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError`] when the counter cannot be read.
    pub async fn get_tasks_by_status(
        &self,
        status: TaskStatus,
    ) -> Result<Vec<TaskRecord>, TaskQueryError> {
        self.filtered(|task| task.status() == status).await
    }

    /// Reads every task created by `client`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError`] when the counter cannot be read.
    pub async fn get_tasks_by_client(
        &self,
        client: &Address,
    ) -> Result<Vec<TaskRecord>, TaskQueryError> {
        self.filtered(|task| task.client() == *client).await
    }

    /// Reads every task claimed by `freelancer`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError`] when the counter cannot be read.
    pub async fn get_tasks_by_freelancer(
        &self,
        freelancer: &Address,
    ) -> Result<Vec<TaskRecord>, TaskQueryError> {
        self.filtered(|task| task.freelancer() == *freelancer).await
    }
}
