//! DirStorage-based AcademicRepository implementation.
//!
//! Four collections: graded results, per-student remedial subjects,
//! homework submissions, and derived lesson progress.

use crate::dir_storage::DirStorage;
use crate::paths::{Collection, ScholaPaths};
use anyhow::Result;
use async_trait::async_trait;
use schola_core::academic::{
    AcademicRepository, AcademicResult, HomeworkSubmission, LessonProgress, RemedialSubject,
};
use std::path::Path;

pub struct DirAcademicRepository {
    results: DirStorage,
    remedial: DirStorage,
    homework: DirStorage,
    progress: DirStorage,
}

fn progress_key(student_id: &str, lesson_id: &str) -> String {
    format!("{student_id}--{lesson_id}")
}

impl DirAcademicRepository {
    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let paths = ScholaPaths::new(base_dir);
        Ok(Self {
            results: paths.open_storage(Collection::AcademicResults).await?,
            remedial: paths.open_storage(Collection::Remedial).await?,
            homework: paths.open_storage(Collection::Homework).await?,
            progress: paths.open_storage(Collection::LessonProgress).await?,
        })
    }
}

#[async_trait]
impl AcademicRepository for DirAcademicRepository {
    async fn record_result(&self, result: &AcademicResult) -> Result<()> {
        self.results
            .save("academic_result", &result.id, result)
            .await
            .map_err(Into::into)
    }

    async fn results_for(&self, student_id: &str) -> Result<Vec<AcademicResult>> {
        let all: Vec<(String, AcademicResult)> = self.results.load_all("academic_result").await?;
        let mut results: Vec<AcademicResult> = all
            .into_iter()
            .map(|(_, result)| result)
            .filter(|result| result.student_id == student_id)
            .collect();
        results.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        Ok(results)
    }

    async fn remedial_for(&self, student_id: &str) -> Result<Option<RemedialSubject>> {
        match self
            .remedial
            .load::<RemedialSubject>("remedial", student_id)
            .await
        {
            // A finished plan is kept on disk for the record but no
            // longer restricts the session.
            Ok(remedial) if remedial.is_finished() => Ok(None),
            Ok(remedial) => Ok(Some(remedial)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_remedial(&self, student_id: &str, remedial: &RemedialSubject) -> Result<()> {
        self.remedial
            .save("remedial", student_id, remedial)
            .await
            .map_err(Into::into)
    }

    async fn clear_remedial(&self, student_id: &str) -> Result<()> {
        self.remedial.delete(student_id).await.map_err(Into::into)
    }

    async fn save_homework(&self, submission: &HomeworkSubmission) -> Result<()> {
        self.homework
            .save("homework", &submission.id, submission)
            .await?;

        // Keep the derived progress record in sync, preserving any
        // previously accumulated study time.
        let key = progress_key(&submission.student_id, &submission.lesson_id);
        let time_spent_secs = match self.progress.load::<LessonProgress>("progress", &key).await {
            Ok(existing) => existing.time_spent_secs,
            Err(e) if e.is_not_found() => 0,
            Err(e) => return Err(e.into()),
        };
        self.upsert_progress(&LessonProgress::from_homework(submission, time_spent_secs))
            .await
    }

    async fn progress_for(&self, student_id: &str) -> Result<Vec<LessonProgress>> {
        let all: Vec<(String, LessonProgress)> = self.progress.load_all("progress").await?;
        let mut records: Vec<LessonProgress> = all
            .into_iter()
            .map(|(_, record)| record)
            .filter(|record| record.student_id == student_id)
            .collect();
        records.sort_by(|a, b| a.lesson_id.cmp(&b.lesson_id));
        Ok(records)
    }

    async fn upsert_progress(&self, progress: &LessonProgress) -> Result<()> {
        let key = progress_key(&progress.student_id, &progress.lesson_id);
        self.progress
            .save("progress", &key, progress)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use schola_core::academic::{RemedialSession, RemedialStatus};
    use tempfile::TempDir;

    async fn create_test_repository() -> (DirAcademicRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirAcademicRepository::new(Some(temp_dir.path()))
            .await
            .unwrap();
        (repo, temp_dir)
    }

    fn remedial(status: RemedialStatus) -> RemedialSubject {
        RemedialSubject {
            subject: "Mathematics".to_string(),
            sessions: vec![RemedialSession {
                title: "Fractions".to_string(),
                status,
            }],
        }
    }

    #[tokio::test]
    async fn test_remedial_roundtrip_and_finished_filtering() {
        let (repo, _temp_dir) = create_test_repository().await;
        assert!(repo.remedial_for("u-1").await.unwrap().is_none());

        repo.save_remedial("u-1", &remedial(RemedialStatus::Pending))
            .await
            .unwrap();
        assert!(repo.remedial_for("u-1").await.unwrap().is_some());

        repo.save_remedial("u-1", &remedial(RemedialStatus::Completed))
            .await
            .unwrap();
        assert!(repo.remedial_for("u-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_homework_drives_progress() {
        let (repo, _temp_dir) = create_test_repository().await;
        repo.save_homework(&HomeworkSubmission {
            id: "hw-1".to_string(),
            student_id: "u-1".to_string(),
            lesson_id: "lesson-3".to_string(),
            score: 95.0,
            submitted_at: Utc::now(),
        })
        .await
        .unwrap();

        let progress = repo.progress_for("u-1").await.unwrap();
        assert_eq!(progress.len(), 1);
        assert!(progress[0].can_continue);

        // A worse resubmission revokes the gate but keeps the record.
        repo.save_homework(&HomeworkSubmission {
            id: "hw-2".to_string(),
            student_id: "u-1".to_string(),
            lesson_id: "lesson-3".to_string(),
            score: 40.0,
            submitted_at: Utc::now(),
        })
        .await
        .unwrap();
        let progress = repo.progress_for("u-1").await.unwrap();
        assert_eq!(progress.len(), 1);
        assert!(!progress[0].can_continue);
    }

    #[tokio::test]
    async fn test_results_sorted_most_recent_first() {
        let (repo, _temp_dir) = create_test_repository().await;
        for (id, offset) in [("r-1", 60), ("r-2", 0)] {
            repo.record_result(&AcademicResult {
                id: id.to_string(),
                student_id: "u-1".to_string(),
                subject: "History".to_string(),
                score: 70.0,
                taken_at: Utc::now() - chrono::Duration::seconds(offset),
                remedial_plan: Vec::new(),
            })
            .await
            .unwrap();
        }
        let results = repo.results_for("u-1").await.unwrap();
        assert_eq!(results[0].id, "r-2");
    }
}
