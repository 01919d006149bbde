//! Wiring: repositories, services, and the session gate.

use anyhow::Result;
use schola_application::{ContentService, SessionGate, TutorService};
use schola_core::academic::AcademicRepository;
use schola_infrastructure::{
    DirAcademicRepository, DirEconomyRepository, DirInfractionRepository, DirMessageRepository,
    DirPlanRepository, DirProfileRepository, StoreAuthService,
};
use schola_interaction::{
    ElevenLabsApiClient, GeminiApiClient, OpenAiApiClient, ProviderSecrets,
};
use std::path::Path;
use std::sync::Arc;

/// Everything the HTTP surface needs.
///
/// `gate`, `tutor` and `content` are `None` when the backing store could
/// not be opened at all; the surface then serves a permanent offline
/// indicator instead of crashing.
pub struct AppContext {
    pub gate: Option<Arc<SessionGate>>,
    pub tutor: Option<TutorService>,
    pub content: Option<ContentService>,
    pub speech: Option<ElevenLabsApiClient>,
    pub proxy_client: Option<OpenAiApiClient>,
}

impl AppContext {
    /// True when the backing store is unreachable.
    pub fn offline(&self) -> bool {
        self.gate.is_none()
    }
}

struct Store {
    profiles: Arc<DirProfileRepository>,
    plans: Arc<DirPlanRepository>,
    economy: Arc<DirEconomyRepository>,
    academic: Arc<DirAcademicRepository>,
    messages: Arc<DirMessageRepository>,
    infractions: Arc<DirInfractionRepository>,
}

async fn build_store(data_dir: Option<&Path>) -> Result<Store> {
    let profiles = Arc::new(DirProfileRepository::new(data_dir).await?);
    let plans = Arc::new(DirPlanRepository::new(data_dir).await?);
    plans.seed_predefined().await?;
    Ok(Store {
        profiles,
        plans,
        economy: Arc::new(DirEconomyRepository::new(data_dir).await?),
        academic: Arc::new(DirAcademicRepository::new(data_dir).await?),
        messages: Arc::new(DirMessageRepository::new(data_dir).await?),
        infractions: Arc::new(DirInfractionRepository::new(data_dir).await?),
    })
}

/// Builds the application context.
///
/// Provider keys are read from the environment; a missing key degrades
/// that provider's features to an offline indicator. A store failure
/// degrades the whole app to offline mode.
pub async fn initialize(data_dir: Option<&Path>) -> AppContext {
    let secrets = ProviderSecrets::from_env();
    let proxy_client = OpenAiApiClient::from_secrets(&secrets).ok();
    let gemini = GeminiApiClient::from_secrets(&secrets).ok();
    let speech = ElevenLabsApiClient::from_secrets(&secrets).ok();

    match build_store(data_dir).await {
        Ok(store) => {
            let academic: Arc<dyn AcademicRepository> = store.academic.clone();
            let gate = Arc::new(SessionGate::new(
                Arc::new(StoreAuthService::new(store.profiles.clone())),
                store.profiles,
                store.plans,
                store.economy,
                store.academic,
                store.messages,
                store.infractions,
            ));
            tracing::info!("[Bootstrap] Backing store ready");
            AppContext {
                tutor: Some(TutorService::new(gate.clone(), proxy_client.clone())),
                content: Some(ContentService::new(gemini, academic)),
                gate: Some(gate),
                speech,
                proxy_client,
            }
        }
        Err(e) => {
            tracing::error!("[Bootstrap] Backing store unavailable, running offline: {e}");
            AppContext {
                gate: None,
                tutor: None,
                content: None,
                speech,
                proxy_client,
            }
        }
    }
}
