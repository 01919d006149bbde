//! Student infraction records.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a reported infraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfractionCategory {
    Conduct,
    Academic,
    Attendance,
}

/// A reported infraction. Lifecycle is create-then-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infraction {
    pub id: String,
    pub student_id: String,
    pub category: InfractionCategory,
    pub description: String,
    pub reported_at: DateTime<Utc>,
}

impl Infraction {
    /// Creates an infraction stamped with the current time.
    pub fn new(
        student_id: impl Into<String>,
        category: InfractionCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.into(),
            category,
            description: description.into(),
            reported_at: Utc::now(),
        }
    }
}

/// Repository for infraction records.
#[async_trait]
pub trait InfractionRepository: Send + Sync {
    /// Stores an infraction.
    async fn record(&self, infraction: &Infraction) -> Result<()>;

    /// Lists infractions reported for a student, most recent first.
    async fn list_for(&self, student_id: &str) -> Result<Vec<Infraction>>;
}
