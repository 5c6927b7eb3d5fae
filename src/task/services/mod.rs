//! Application services for reading tasks and building contract calls.

mod repository;
mod transactions;

pub use repository::{
    FetchStrategy, TASK_COUNTER_KEY, TaskFetchError, TaskQueryError, TaskRepository, TaskScan,
};
pub use transactions::{
    CreateTaskRequest, TaskCall, TransactionBuildError, TransactionBuildResult,
    TransactionBuilder,
};
