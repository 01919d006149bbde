//! Academic records: diagnostic results, remedial plans, homework, and
//! lesson progress.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Homework score at or above this value unlocks the next lesson.
pub const CONTINUE_THRESHOLD: f32 = 90.0;

/// Completion state of a single remedial session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemedialStatus {
    Pending,
    Completed,
}

/// One tutoring session inside a remedial plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemedialSession {
    pub title: String,
    pub status: RemedialStatus,
}

/// A dynamically constructed remedial curriculum for one subject.
///
/// Produced by the diagnostic generator after a failed test. While one of
/// these is attached to a session, the menu is forced into restricted
/// mode regardless of the assigned plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemedialSubject {
    pub subject: String,
    pub sessions: Vec<RemedialSession>,
}

impl RemedialSubject {
    /// True once every session in the plan has been completed.
    pub fn is_finished(&self) -> bool {
        self.sessions
            .iter()
            .all(|s| s.status == RemedialStatus::Completed)
    }
}

/// A graded diagnostic or exam outcome, with its embedded remedial plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicResult {
    pub id: String,
    pub student_id: String,
    pub subject: String,
    pub score: f32,
    pub taken_at: DateTime<Utc>,
    /// Remedial sessions spawned from this result, with per-session status
    #[serde(default)]
    pub remedial_plan: Vec<RemedialSession>,
}

/// A submitted piece of homework for one lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkSubmission {
    pub id: String,
    pub student_id: String,
    pub lesson_id: String,
    pub score: f32,
    pub submitted_at: DateTime<Utc>,
}

/// Progress state of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Per-lesson progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub student_id: String,
    pub lesson_id: String,
    pub status: LessonStatus,
    pub score: f32,
    pub time_spent_secs: u64,
    /// Whether the student may advance past this lesson
    pub can_continue: bool,
}

impl LessonProgress {
    /// Builds the progress record derived from a homework submission.
    ///
    /// `can_continue` is computed as homework score >= [`CONTINUE_THRESHOLD`].
    pub fn from_homework(submission: &HomeworkSubmission, time_spent_secs: u64) -> Self {
        Self {
            student_id: submission.student_id.clone(),
            lesson_id: submission.lesson_id.clone(),
            status: LessonStatus::Completed,
            score: submission.score,
            time_spent_secs,
            can_continue: submission.score >= CONTINUE_THRESHOLD,
        }
    }
}

/// Everything an admin sees about one inspected student.
///
/// Assembled by a tagged fetch; a stale overview (for a student no
/// longer selected) is dropped instead of applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentOverview {
    pub student_id: String,
    #[serde(default)]
    pub results: Vec<AcademicResult>,
    #[serde(default)]
    pub progress: Vec<LessonProgress>,
    #[serde(default)]
    pub infractions: Vec<crate::infraction::Infraction>,
}

/// Repository for academic state.
#[async_trait]
pub trait AcademicRepository: Send + Sync {
    /// Records a graded result.
    async fn record_result(&self, result: &AcademicResult) -> Result<()>;

    /// Lists all results for a student, most recent first.
    async fn results_for(&self, student_id: &str) -> Result<Vec<AcademicResult>>;

    /// Returns the student's active remedial subject, if one exists.
    ///
    /// A finished remedial plan no longer counts as active.
    async fn remedial_for(&self, student_id: &str) -> Result<Option<RemedialSubject>>;

    /// Persists a remedial subject for a student.
    async fn save_remedial(&self, student_id: &str, remedial: &RemedialSubject) -> Result<()>;

    /// Clears the student's remedial subject.
    async fn clear_remedial(&self, student_id: &str) -> Result<()>;

    /// Stores a homework submission and updates the derived lesson progress.
    async fn save_homework(&self, submission: &HomeworkSubmission) -> Result<()>;

    /// Lists lesson progress records for a student.
    async fn progress_for(&self, student_id: &str) -> Result<Vec<LessonProgress>>;

    /// Inserts or replaces a lesson progress record.
    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<()>;
}
