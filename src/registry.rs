use crate::{TaskHandle, TaskId};

/// A repeating emission task that has not been cancelled yet.
#[derive(Debug)]
pub struct RunningTask {
    handle: TaskHandle,
    label: String,
}

impl RunningTask {
    pub fn id(&self) -> TaskId {
        self.handle.id()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Running tasks in start order.
///
/// An entry is present exactly as long as its task has not been cancelled
/// through the registry. Labels need not be unique.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<RunningTask>,
}

impl TaskRegistry {
    pub fn new() -> TaskRegistry {
        TaskRegistry::default()
    }

    pub fn register(&mut self, handle: TaskHandle, label: String) {
        self.tasks.push(RunningTask { handle, label });
    }

    /// Cancels the task and forgets it. Returns the removed entry, or `None`
    /// when `id` is not registered.
    pub fn cancel(&mut self, id: TaskId) -> Option<RunningTask> {
        let index = self.tasks.iter().position(|task| task.id() == id)?;
        let task = self.tasks.remove(index);
        task.handle.cancel();
        Some(task)
    }

    /// Cancels every registered task in start order.
    pub fn cancel_all(&mut self) -> Vec<RunningTask> {
        let snapshot: Vec<TaskId> = self.ids().collect();
        snapshot
            .into_iter()
            .filter_map(|id| self.cancel(id))
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&RunningTask> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunningTask> + '_ {
        self.tasks.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.iter().map(RunningTask::id)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.tasks.iter().map(RunningTask::label)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<'a> IntoIterator for &'a TaskRegistry {
    type Item = &'a RunningTask;
    type IntoIter = std::slice::Iter<'a, RunningTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
