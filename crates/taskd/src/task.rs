//! The task entity.
//!
//! A task is a titled unit of work with a description and a completion
//! status. The title doubles as the primary key in the store; it and the
//! description never change after creation. Field validation is the
//! gateway's job, not this type's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, case-sensitive identifier
    pub title: String,
    /// Free-form description, immutable after creation
    pub description: String,
    /// Completion flag
    pub completed: bool,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Present exactly when `completed` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new incomplete task stamped with the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Mark the task completed as of now.
    ///
    /// Re-completing an already-completed task refreshes `completed_at`;
    /// callers relying on the original completion time must not call this
    /// twice.
    pub fn complete(&mut self) {
        self.completed = true;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the task incomplete and clear its completion time.
    pub fn uncomplete(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}
