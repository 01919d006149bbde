//! Educational plans: named allow-lists of views assignable to students.

use crate::view::ViewId;
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named allow-list of views.
///
/// Plans are created and edited by admins and referenced (never owned) by
/// a student's session through `Account::plan_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationalPlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub allowed_views: BTreeSet<ViewId>,
}

fn plan(id: &str, name: &str, description: &str, views: &[ViewId]) -> EducationalPlan {
    EducationalPlan {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        allowed_views: views.iter().copied().collect(),
    }
}

/// Plans shipped with the platform. Seeded into the plan store at startup
/// and editable afterwards like any admin-created plan.
pub static PREDEFINED_PLANS: Lazy<Vec<EducationalPlan>> = Lazy::new(|| {
    vec![
        plan(
            "plan-primary",
            "Primary Track",
            "Core screens for primary students",
            &[
                ViewId::Dashboard,
                ViewId::Curriculum,
                ViewId::Repository,
                ViewId::Rewards,
                ViewId::Flashcards,
                ViewId::Progress,
            ],
        ),
        plan(
            "plan-bachillerato",
            "Bachillerato Track",
            "Full toolset for bachillerato students",
            &[
                ViewId::Dashboard,
                ViewId::Schedule,
                ViewId::Curriculum,
                ViewId::Repository,
                ViewId::Consultant,
                ViewId::Career,
                ViewId::Metrics,
                ViewId::Progress,
                ViewId::Rewards,
            ],
        ),
        plan(
            "plan-exam-prep",
            "Exam Preparation",
            "Focused screens for an upcoming diagnostic",
            &[
                ViewId::Curriculum,
                ViewId::Diagnostic,
                ViewId::Flashcards,
                ViewId::Progress,
            ],
        ),
    ]
});

/// Repository for educational plans.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Finds a plan by its id.
    async fn find_by_id(&self, plan_id: &str) -> Result<Option<EducationalPlan>>;

    /// Saves a plan, overwriting any previous version.
    async fn save(&self, plan: &EducationalPlan) -> Result<()>;

    /// Lists all plans.
    async fn list_all(&self) -> Result<Vec<EducationalPlan>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_plans_have_unique_ids() {
        let mut ids: Vec<&str> = PREDEFINED_PLANS.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), PREDEFINED_PLANS.len());
    }

    #[test]
    fn test_predefined_plans_are_non_empty() {
        for plan in PREDEFINED_PLANS.iter() {
            assert!(!plan.allowed_views.is_empty(), "plan {} is empty", plan.id);
        }
    }
}
