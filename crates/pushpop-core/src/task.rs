//! Deferred task queue.
//!
//! Work posted here runs on a later turn of the host event loop, when the
//! host calls [`SharedTaskQueue::process_pending`]. Table views use it to
//! dispatch notifications that must not fire while the caller is still inside
//! the operation that produced them.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::{CoreError, Result};
use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// A FIFO queue of deferred closures.
pub struct TaskQueue {
    tasks: VecDeque<TaskData>,
    /// Maximum number of tasks to run per call to `process_batch`.
    batch_size: usize,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self::with_batch_size(16)
    }

    /// Create a new task queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// Post a task for a later turn.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    pub fn cancel(&mut self, id: TaskId) -> Result<()> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::InvalidTaskId(id))?;
        self.tasks.remove(pos);
        Ok(())
    }

    /// Check whether a specific task is still waiting to run.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Set the batch size used by `process_batch`.
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }

    /// Run up to one batch of tasks. Returns the number of tasks run.
    pub fn process_batch(&mut self) -> usize {
        let batch = self.take_batch(self.batch_size);
        SharedTaskQueue::run(batch)
    }

    fn take_batch(&mut self, limit: usize) -> Vec<TaskData> {
        let count = self.tasks.len().min(limit);
        self.tasks.drain(..count).collect()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe handle to a [`TaskQueue`].
///
/// Tasks are removed from the queue before they run, so a task may post
/// further tasks without deadlocking. Those run on the following turn.
#[derive(Clone, Default)]
pub struct SharedTaskQueue {
    inner: Arc<Mutex<TaskQueue>>,
}

impl SharedTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.lock().post(task)
    }

    pub fn cancel(&self, id: TaskId) -> Result<()> {
        self.inner.lock().cancel(id)
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.inner.lock().is_pending(id)
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lock().has_pending()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    pub fn set_batch_size(&self, size: usize) {
        self.inner.lock().set_batch_size(size);
    }

    /// Run up to one batch of tasks. Returns the number of tasks run.
    pub fn process_batch(&self) -> usize {
        let batch = {
            let mut queue = self.inner.lock();
            let limit = queue.batch_size;
            queue.take_batch(limit)
        };
        Self::run(batch)
    }

    /// Run every task that was pending when the call started.
    ///
    /// This is one turn of the event loop. Returns the number of tasks run.
    pub fn process_pending(&self) -> usize {
        let batch = self.inner.lock().take_batch(usize::MAX);
        Self::run(batch)
    }

    fn run(batch: Vec<TaskData>) -> usize {
        let count = batch.len();
        if count > 0 {
            tracing::trace!(target: targets::TASK, count, "running deferred tasks");
        }
        for task_data in batch {
            (task_data.task)();
        }
        count
    }
}

static_assertions::assert_impl_all!(SharedTaskQueue: Send, Sync);
