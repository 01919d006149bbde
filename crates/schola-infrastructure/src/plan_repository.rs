//! DirStorage-based PlanRepository implementation.

use crate::dir_storage::DirStorage;
use crate::paths::{Collection, ScholaPaths};
use anyhow::Result;
use async_trait::async_trait;
use schola_core::plan::{EducationalPlan, PlanRepository, PREDEFINED_PLANS};
use std::path::Path;

pub struct DirPlanRepository {
    storage: DirStorage,
}

impl DirPlanRepository {
    const ENTITY_NAME: &'static str = "plan";

    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let paths = ScholaPaths::new(base_dir);
        let storage = paths.open_storage(Collection::Plans).await?;
        Ok(Self { storage })
    }

    /// Writes the predefined plans that are not yet present.
    ///
    /// Existing documents win, so admin edits to a predefined plan
    /// survive restarts.
    pub async fn seed_predefined(&self) -> Result<()> {
        for plan in PREDEFINED_PLANS.iter() {
            match self
                .storage
                .load::<EducationalPlan>(Self::ENTITY_NAME, &plan.id)
                .await
            {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    self.storage.save(Self::ENTITY_NAME, &plan.id, plan).await?;
                    tracing::info!("[Plans] Seeded predefined plan {}", plan.id);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PlanRepository for DirPlanRepository {
    async fn find_by_id(&self, plan_id: &str) -> Result<Option<EducationalPlan>> {
        match self.storage.load(Self::ENTITY_NAME, plan_id).await {
            Ok(plan) => Ok(Some(plan)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, plan: &EducationalPlan) -> Result<()> {
        self.storage
            .save(Self::ENTITY_NAME, &plan.id, plan)
            .await
            .map_err(Into::into)
    }

    async fn list_all(&self) -> Result<Vec<EducationalPlan>> {
        let all: Vec<(String, EducationalPlan)> =
            self.storage.load_all(Self::ENTITY_NAME).await?;
        let mut plans: Vec<EducationalPlan> = all.into_iter().map(|(_, plan)| plan).collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plans)
    }
}
