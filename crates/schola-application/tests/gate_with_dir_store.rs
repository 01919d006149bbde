//! End-to-end gate flows over the file-backed repositories.

use schola_application::SessionGate;
use schola_core::account::{AcademicLevel, Credentials, Profile, Role};
use schola_core::academic::{AcademicRepository, RemedialSession, RemedialStatus, RemedialSubject};
use schola_core::account::ProfileRepository;
use schola_core::session::{Screen, SessionState};
use schola_core::view::ViewId;
use schola_infrastructure::{
    DirAcademicRepository, DirEconomyRepository, DirInfractionRepository, DirMessageRepository,
    DirPlanRepository, DirProfileRepository, StoreAuthService, password_digest,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Deps {
    gate: Arc<SessionGate>,
    profiles: Arc<DirProfileRepository>,
    academic: Arc<DirAcademicRepository>,
    _temp_dir: TempDir,
}

async fn deps() -> Deps {
    let temp_dir = TempDir::new().unwrap();
    let base = Some(temp_dir.path());

    let profiles = Arc::new(DirProfileRepository::new(base).await.unwrap());
    let plans = Arc::new(DirPlanRepository::new(base).await.unwrap());
    plans.seed_predefined().await.unwrap();
    let economy = Arc::new(DirEconomyRepository::new(base).await.unwrap());
    let academic = Arc::new(DirAcademicRepository::new(base).await.unwrap());
    let messages = Arc::new(DirMessageRepository::new(base).await.unwrap());
    let infractions = Arc::new(DirInfractionRepository::new(base).await.unwrap());
    let auth = Arc::new(StoreAuthService::new(profiles.clone()));

    let gate = Arc::new(SessionGate::new(
        auth,
        profiles.clone(),
        plans,
        economy,
        academic.clone(),
        messages,
        infractions,
    ));

    Deps {
        gate,
        profiles,
        academic,
        _temp_dir: temp_dir,
    }
}

fn student_profile(accepted: bool) -> Profile {
    Profile {
        id: "u-1".to_string(),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        role: Role::Student,
        level: AcademicLevel::Primary,
        password_digest: password_digest("secret"),
        guardian_contact: Some("tutor@example.com".to_string()),
        agreement_accepted: accepted,
        plan_id: Some("plan-primary".to_string()),
    }
}

fn student_credentials(password: &str) -> Credentials {
    Credentials {
        email: "ana@example.com".to_string(),
        password: password.to_string(),
        intended_role: Role::Student,
        guardian_contact: "tutor@example.com".to_string(),
    }
}

/// Polls the gate until `check` passes or the deadline expires.
async fn eventually<F>(gate: &Arc<SessionGate>, check: F)
where
    F: Fn(&SessionState) -> bool,
{
    for _ in 0..100 {
        if check(&gate.state().await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached before deadline");
}

#[tokio::test(flavor = "multi_thread")]
async fn login_resolves_assigned_plan_views() {
    let d = deps().await;
    d.profiles.save(&student_profile(true)).await.unwrap();

    assert!(
        d.gate
            .login(&student_credentials("wrong"))
            .await
            .unwrap_err()
            .is_auth()
    );

    let screen = d.gate.login(&student_credentials("secret")).await.unwrap();
    match screen {
        Screen::Active { view, .. } => assert_eq!(view, ViewId::Dashboard),
        other => panic!("expected active screen, got {other:?}"),
    }

    // The entry fetch resolves the assigned plan in the background.
    eventually(&d.gate, |state| match state {
        SessionState::Active(session) => !session.plan_views.is_empty(),
        _ => false,
    })
    .await;

    match d.gate.state().await {
        SessionState::Active(session) => {
            assert!(session.visible_views().contains(&ViewId::Flashcards));
            assert!(!session.visible_views().contains(&ViewId::Schedule));
        }
        other => panic!("expected active state, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn stored_remedial_restricts_the_session() {
    let d = deps().await;
    d.profiles.save(&student_profile(true)).await.unwrap();
    d.academic
        .save_remedial(
            "u-1",
            &RemedialSubject {
                subject: "Mathematics".to_string(),
                sessions: vec![RemedialSession {
                    title: "Fractions".to_string(),
                    status: RemedialStatus::Pending,
                }],
            },
        )
        .await
        .unwrap();

    let screen = d.gate.login(&student_credentials("secret")).await.unwrap();
    match screen {
        Screen::Active { view, menu, .. } => {
            assert_eq!(view, ViewId::Curriculum);
            assert_eq!(menu.len(), 4);
        }
        other => panic!("expected active screen, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn agreement_acceptance_survives_relogin() {
    let d = deps().await;
    d.profiles.save(&student_profile(false)).await.unwrap();

    let screen = d.gate.login(&student_credentials("secret")).await.unwrap();
    assert!(matches!(screen, Screen::Agreement { .. }));

    let screen = d.gate.accept_agreement().await.unwrap();
    assert!(matches!(screen, Screen::Active { .. }));

    d.gate.logout().await;
    let screen = d.gate.login(&student_credentials("secret")).await.unwrap();
    assert!(
        matches!(screen, Screen::Active { .. }),
        "acceptance must persist across sessions"
    );
}
