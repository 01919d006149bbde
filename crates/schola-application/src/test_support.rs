//! In-memory fakes shared by the service tests.

use crate::session_gate::SessionGate;
use async_trait::async_trait;
use schola_core::academic::{
    AcademicRepository, AcademicResult, HomeworkSubmission, LessonProgress, RemedialSession,
    RemedialStatus, RemedialSubject,
};
use schola_core::account::{
    AcademicLevel, Account, AuthService, Credentials, Profile, ProfileRepository, Role,
};
use schola_core::economy::{EconomyBalance, EconomyRepository, StoreItem};
use schola_core::error::{Result, ScholaError};
use schola_core::infraction::{Infraction, InfractionRepository};
use schola_core::message::{AppMessage, MessageRepository};
use schola_core::plan::{EducationalPlan, PlanRepository};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub fn account(id: &str, role: Role, accepted: bool) -> Account {
    Account {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        role,
        level: AcademicLevel::Primary,
        agreement_accepted: accepted,
        guardian_contact: Some("tutor@example.com".to_string()),
        plan_id: None,
    }
}

pub fn credentials(role: Role) -> Credentials {
    Credentials {
        email: "user@example.com".to_string(),
        password: "secret".to_string(),
        intended_role: role,
        guardian_contact: "tutor@example.com".to_string(),
    }
}

pub fn remedial() -> RemedialSubject {
    RemedialSubject {
        subject: "Mathematics".to_string(),
        sessions: vec![RemedialSession {
            title: "Fractions".to_string(),
            status: RemedialStatus::Pending,
        }],
    }
}

#[derive(Default)]
pub struct FakeAuth {
    pub account: Mutex<Option<Account>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<Account> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.account
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ScholaError::auth("invalid credentials"))
    }
}

#[derive(Default)]
pub struct FakeProfiles {
    pub students: Mutex<Vec<Account>>,
    pub accepted: Mutex<HashMap<String, bool>>,
    pub fail_writes: AtomicBool,
}

#[async_trait]
impl ProfileRepository for FakeProfiles {
    async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<Profile>> {
        Ok(None)
    }
    async fn find_by_id(&self, _id: &str) -> anyhow::Result<Option<Profile>> {
        Ok(None)
    }
    async fn save(&self, _profile: &Profile) -> anyhow::Result<()> {
        Ok(())
    }
    async fn list_students(&self) -> anyhow::Result<Vec<Account>> {
        Ok(self.students.lock().unwrap().clone())
    }
    async fn set_agreement_accepted(&self, id: &str, accepted: bool) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("store unreachable");
        }
        self.accepted
            .lock()
            .unwrap()
            .insert(id.to_string(), accepted);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePlans {
    pub plans: Mutex<HashMap<String, EducationalPlan>>,
}

#[async_trait]
impl PlanRepository for FakePlans {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<EducationalPlan>> {
        Ok(self.plans.lock().unwrap().get(id).cloned())
    }
    async fn save(&self, plan: &EducationalPlan) -> anyhow::Result<()> {
        self.plans
            .lock()
            .unwrap()
            .insert(plan.id.clone(), plan.clone());
        Ok(())
    }
    async fn list_all(&self) -> anyhow::Result<Vec<EducationalPlan>> {
        Ok(self.plans.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct FakeEconomy {
    pub coins: Mutex<u64>,
    pub fail_credit: AtomicBool,
}

#[async_trait]
impl EconomyRepository for FakeEconomy {
    async fn balance(&self, _user_id: &str) -> EconomyBalance {
        EconomyBalance {
            coins: *self.coins.lock().unwrap(),
        }
    }
    async fn credit(&self, _user_id: &str, amount: u64) -> anyhow::Result<u64> {
        if self.fail_credit.load(Ordering::SeqCst) {
            anyhow::bail!("economy unreachable");
        }
        let mut coins = self.coins.lock().unwrap();
        *coins += amount;
        Ok(*coins)
    }
    async fn catalog(&self) -> Vec<StoreItem> {
        Vec::new()
    }
}

#[derive(Default)]
pub struct FakeAcademic {
    pub remedial: Mutex<Option<RemedialSubject>>,
    pub saved_remedial: Mutex<HashMap<String, RemedialSubject>>,
}

#[async_trait]
impl AcademicRepository for FakeAcademic {
    async fn record_result(&self, _result: &AcademicResult) -> anyhow::Result<()> {
        Ok(())
    }
    async fn results_for(&self, _student_id: &str) -> anyhow::Result<Vec<AcademicResult>> {
        Ok(Vec::new())
    }
    async fn remedial_for(&self, _student_id: &str) -> anyhow::Result<Option<RemedialSubject>> {
        Ok(self.remedial.lock().unwrap().clone())
    }
    async fn save_remedial(
        &self,
        student_id: &str,
        remedial: &RemedialSubject,
    ) -> anyhow::Result<()> {
        self.saved_remedial
            .lock()
            .unwrap()
            .insert(student_id.to_string(), remedial.clone());
        Ok(())
    }
    async fn clear_remedial(&self, _student_id: &str) -> anyhow::Result<()> {
        Ok(())
    }
    async fn save_homework(&self, _submission: &HomeworkSubmission) -> anyhow::Result<()> {
        Ok(())
    }
    async fn progress_for(&self, _student_id: &str) -> anyhow::Result<Vec<LessonProgress>> {
        Ok(Vec::new())
    }
    async fn upsert_progress(&self, _progress: &LessonProgress) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMessages;

#[async_trait]
impl MessageRepository for FakeMessages {
    async fn send(&self, _message: &AppMessage) -> anyhow::Result<()> {
        Ok(())
    }
    async fn list_for(&self, _receiver_id: &str) -> anyhow::Result<Vec<AppMessage>> {
        Ok(Vec::new())
    }
    async fn mark_read(&self, _message_id: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeInfractions;

#[async_trait]
impl InfractionRepository for FakeInfractions {
    async fn record(&self, _infraction: &Infraction) -> anyhow::Result<()> {
        Ok(())
    }
    async fn list_for(&self, _student_id: &str) -> anyhow::Result<Vec<Infraction>> {
        Ok(Vec::new())
    }
}

/// A gate plus handles to its fakes.
pub struct Harness {
    pub gate: Arc<SessionGate>,
    pub auth: Arc<FakeAuth>,
    pub profiles: Arc<FakeProfiles>,
    pub plans: Arc<FakePlans>,
    pub economy: Arc<FakeEconomy>,
    pub academic: Arc<FakeAcademic>,
}

pub fn harness() -> Harness {
    let auth = Arc::new(FakeAuth::default());
    let profiles = Arc::new(FakeProfiles::default());
    let plans = Arc::new(FakePlans::default());
    let economy = Arc::new(FakeEconomy::default());
    let academic = Arc::new(FakeAcademic::default());
    let gate = Arc::new(SessionGate::new(
        auth.clone(),
        profiles.clone(),
        plans.clone(),
        economy.clone(),
        academic.clone(),
        Arc::new(FakeMessages),
        Arc::new(FakeInfractions),
    ));
    Harness {
        gate,
        auth,
        profiles,
        plans,
        economy,
        academic,
    }
}

/// A gate with nobody signed in.
pub fn empty_gate() -> Arc<SessionGate> {
    harness().gate
}

/// A gate with a student already signed in.
pub async fn active_student_gate() -> Arc<SessionGate> {
    let h = harness();
    *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, true));
    h.gate.login(&credentials(Role::Student)).await.unwrap();
    h.gate
}
