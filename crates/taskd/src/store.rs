//! In-memory task store.
//!
//! The store is the only owner of the task collection. A single
//! reader/writer lock guards the whole map: reads run concurrently,
//! mutations are exclusive, and every operation acquires and releases the
//! lock within the call. Callers only ever receive clones, so nothing
//! outside this module can mutate store-owned state.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::task::Task;

/// The in-memory authority for task records, keyed by title.
///
/// Constructed once at startup and shared via `Arc`; there is no ambient
/// singleton.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl TaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new task, failing if its title is already taken.
    ///
    /// On failure the store is left untouched.
    pub async fn add(&self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.title) {
            return Err(StoreError::AlreadyExists { title: task.title });
        }
        tasks.insert(task.title.clone(), task);
        Ok(())
    }

    /// Fetch a copy of the task with the given title.
    pub async fn get(&self, title: &str) -> Result<Task, StoreError> {
        let tasks = self.tasks.read().await;
        tasks.get(title).cloned().ok_or_else(|| StoreError::NotFound {
            title: title.to_string(),
        })
    }

    /// Snapshot of every task at the moment of the call.
    pub async fn list_all(&self) -> HashMap<String, Task> {
        let tasks = self.tasks.read().await;
        tasks.clone()
    }

    /// Snapshot of the tasks that are not yet completed.
    pub async fn list_incomplete(&self) -> HashMap<String, Task> {
        let tasks = self.tasks.read().await;
        tasks
            .iter()
            .filter(|(_, task)| !task.completed)
            .map(|(title, task)| (title.clone(), task.clone()))
            .collect()
    }

    /// Mark a task completed and return the updated record.
    ///
    /// Completing an already-completed task refreshes its completion
    /// timestamp.
    pub async fn complete(&self, title: &str) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(title).ok_or_else(|| StoreError::NotFound {
            title: title.to_string(),
        })?;
        task.complete();
        Ok(task.clone())
    }

    /// Mark a task incomplete and return the updated record.
    pub async fn uncomplete(&self, title: &str) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(title).ok_or_else(|| StoreError::NotFound {
            title: title.to_string(),
        })?;
        task.uncomplete();
        Ok(task.clone())
    }

    /// Remove a task from the store.
    pub async fn delete(&self, title: &str) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.remove(title).is_none() {
            return Err(StoreError::NotFound {
                title: title.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_add_then_get() {
        let store = TaskStore::new();
        store.add(Task::new("buy milk", "2%")).await.unwrap();

        let task = store.get("buy milk").await.unwrap();
        assert_eq!(task.title, "buy milk");
        assert_eq!(task.description, "2%");
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_add_duplicate_leaves_original_untouched() {
        let store = TaskStore::new();
        store.add(Task::new("buy milk", "2%")).await.unwrap();

        let err = store.add(Task::new("buy milk", "whole")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::AlreadyExists {
                title: "buy milk".to_string()
            }
        );

        let task = store.get("buy milk").await.unwrap();
        assert_eq!(task.description, "2%");
    }

    #[tokio::test]
    async fn test_absent_title_operations_fail_without_mutation() {
        let store = TaskStore::new();

        let not_found = StoreError::NotFound {
            title: "missing".to_string(),
        };
        assert_eq!(store.get("missing").await.unwrap_err(), not_found);
        assert_eq!(store.complete("missing").await.unwrap_err(), not_found);
        assert_eq!(store.uncomplete("missing").await.unwrap_err(), not_found);
        assert_eq!(store.delete("missing").await.unwrap_err(), not_found);

        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_complete_uncomplete_round_trip() {
        let store = TaskStore::new();
        store.add(Task::new("buy milk", "2%")).await.unwrap();

        let completed = store.complete("buy milk").await.unwrap();
        assert!(completed.completed);
        assert!(completed.completed_at.is_some());

        let fetched = store.get("buy milk").await.unwrap();
        assert_eq!(fetched, completed);

        let uncompleted = store.uncomplete("buy milk").await.unwrap();
        assert!(!uncompleted.completed);
        assert!(uncompleted.completed_at.is_none());

        let fetched = store.get("buy milk").await.unwrap();
        assert_eq!(fetched, uncompleted);
    }

    #[tokio::test]
    async fn test_recomplete_refreshes_completed_at() {
        let store = TaskStore::new();
        store.add(Task::new("buy milk", "2%")).await.unwrap();

        let first = store.complete("buy milk").await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = store.complete("buy milk").await.unwrap();

        assert!(second.completed_at.unwrap() > first.completed_at.unwrap());
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_delete_removes_task() {
        let store = TaskStore::new();
        store.add(Task::new("buy milk", "2%")).await.unwrap();

        store.delete("buy milk").await.unwrap();
        assert!(matches!(
            store.get("buy milk").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_incomplete_is_subset_of_list_all() {
        let store = TaskStore::new();
        store.add(Task::new("a", "first")).await.unwrap();
        store.add(Task::new("b", "second")).await.unwrap();
        store.add(Task::new("c", "third")).await.unwrap();
        store.complete("b").await.unwrap();

        let all = store.list_all().await;
        let incomplete = store.list_incomplete().await;

        assert_eq!(all.len(), 3);
        assert_eq!(incomplete.len(), 2);
        for (title, task) in &incomplete {
            assert!(!task.completed);
            assert_eq!(all.get(title), Some(task));
        }
        assert!(!incomplete.contains_key("b"));
    }

    #[tokio::test]
    async fn test_snapshots_ignore_later_mutations() {
        let store = TaskStore::new();
        store.add(Task::new("a", "first")).await.unwrap();

        let all = store.list_all().await;
        let incomplete = store.list_incomplete().await;

        store.complete("a").await.unwrap();
        store.add(Task::new("b", "second")).await.unwrap();

        assert_eq!(all.len(), 1);
        assert!(!all["a"].completed);
        assert_eq!(incomplete.len(), 1);
        assert!(!incomplete["a"].completed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_adds_distinct_titles_all_succeed() {
        let store = Arc::new(TaskStore::new());
        let mut handles = Vec::new();

        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add(Task::new(format!("task-{i}"), "work")).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list_all().await.len(), 32);
        for i in 0..32 {
            store.get(&format!("task-{i}")).await.unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_adds_same_title_single_winner() {
        let store = Arc::new(TaskStore::new());
        let mut handles = Vec::new();

        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add(Task::new("contested", format!("writer {i}"))).await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(StoreError::AlreadyExists { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.list_all().await.len(), 1);
    }
}
