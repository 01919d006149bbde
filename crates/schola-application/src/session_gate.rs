//! The session gate: the single writer over the application's session
//! state.
//!
//! The gate owns the `LoggedOut / AgreementPending / Active` state
//! machine, decides which screen to mount, and constrains navigation to
//! the menu policy's visible set. Every mutation goes through a gate
//! method; the rest of the application receives read-only snapshots and
//! screen values.
//!
//! Entry into the active state triggers fire-and-forget fetches (economy,
//! catalog, plan views and inbox for students; the roster for admins).
//! The screen renders immediately with defaults and is updated when the
//! data arrives; responses are applied only while their fetch ticket is
//! still current, so a user switch mid-flight cannot leak data across
//! sessions.

use crate::fetch_guard::{FetchGuard, FetchTicket};
use schola_core::academic::{AcademicRepository, RemedialSubject, StudentOverview};
use schola_core::account::{Account, AuthService, Credentials, ProfileRepository, Role};
use schola_core::economy::EconomyRepository;
use schola_core::error::{Result, ScholaError};
use schola_core::infraction::InfractionRepository;
use schola_core::message::MessageRepository;
use schola_core::plan::PlanRepository;
use schola_core::session::{ActiveSession, Screen, SessionState, SimulatedPersona};
use schola_core::view::ViewId;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Off-topic strikes after which the tutor chat locks.
pub const TUTOR_STRIKE_LIMIT: u8 = 3;

/// The top-level application controller.
pub struct SessionGate {
    state: RwLock<SessionState>,
    auth: Arc<dyn AuthService>,
    profiles: Arc<dyn ProfileRepository>,
    plans: Arc<dyn PlanRepository>,
    economy: Arc<dyn EconomyRepository>,
    academic: Arc<dyn AcademicRepository>,
    messages: Arc<dyn MessageRepository>,
    infractions: Arc<dyn InfractionRepository>,
    /// Tags the entry fetches with the signed-in user
    session_guard: FetchGuard,
    /// Tags per-student detail fetches with the inspected student
    student_guard: FetchGuard,
}

impl SessionGate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth: Arc<dyn AuthService>,
        profiles: Arc<dyn ProfileRepository>,
        plans: Arc<dyn PlanRepository>,
        economy: Arc<dyn EconomyRepository>,
        academic: Arc<dyn AcademicRepository>,
        messages: Arc<dyn MessageRepository>,
        infractions: Arc<dyn InfractionRepository>,
    ) -> Self {
        Self {
            state: RwLock::new(SessionState::LoggedOut),
            auth,
            profiles,
            plans,
            economy,
            academic,
            messages,
            infractions,
            session_guard: FetchGuard::new(),
            student_guard: FetchGuard::new(),
        }
    }

    /// The screen to mount for the current state.
    pub async fn screen(&self) -> Screen {
        self.state.read().await.screen()
    }

    /// A read-only snapshot of the session state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Attempts a credential exchange and advances the state machine.
    ///
    /// The commit is all-or-nothing: on any failure the state stays
    /// `LoggedOut` with no field populated, and the error carries the
    /// user-visible message. On success:
    ///
    /// - an admin lands on the active state directly (the agreement is
    ///   never shown to admins),
    /// - a student who has accepted the agreement lands on the active
    ///   state, on the curriculum screen when a remedial subject was
    ///   detected and the dashboard otherwise,
    /// - a student who has not accepted lands on the consent screen.
    pub async fn login(self: &Arc<Self>, credentials: &Credentials) -> Result<Screen> {
        credentials.validate()?;

        let mut account = self.auth.authenticate(credentials).await?;

        let remedial = if account.role == Role::Student {
            self.detect_remedial(&account.id).await
        } else {
            None
        };

        if account.role == Role::Admin {
            // Admins never see the consent screen.
            account.agreement_accepted = true;
        }

        if account.role == Role::Student && !account.agreement_accepted {
            let mut state = self.state.write().await;
            *state = SessionState::AgreementPending { account };
            return Ok(state.screen());
        }

        Ok(self.enter_active(account, remedial).await)
    }

    /// Accepts the platform agreement and activates the session.
    ///
    /// Persists the acceptance first; if that write fails the state
    /// remains `AgreementPending` and the error is surfaced.
    pub async fn accept_agreement(self: &Arc<Self>) -> Result<Screen> {
        let mut account = match &*self.state.read().await {
            SessionState::AgreementPending { account } => account.clone(),
            _ => {
                return Err(ScholaError::validation(
                    "agreement",
                    "no agreement is pending",
                ));
            }
        };

        self.profiles
            .set_agreement_accepted(&account.id, true)
            .await
            .map_err(|e| ScholaError::adapter_unavailable("profiles", e.to_string()))?;

        account.agreement_accepted = true;
        let remedial = self.detect_remedial(&account.id).await;
        Ok(self.enter_active(account, remedial).await)
    }

    /// Declines the agreement: back to the login form, session cleared.
    pub async fn decline_agreement(&self) -> Screen {
        let mut state = self.state.write().await;
        if matches!(&*state, SessionState::AgreementPending { .. }) {
            *state = SessionState::LoggedOut;
            self.session_guard.clear();
            self.student_guard.clear();
        }
        state.screen()
    }

    /// Selects a view.
    ///
    /// Returns `false` without changing anything when the view is not in
    /// the visible set, or when no active session exists. Never an
    /// error: a rejected navigation is a no-op.
    pub async fn select_view(&self, view: ViewId) -> bool {
        let mut state = self.state.write().await;
        match &mut *state {
            SessionState::Active(session) if session.visible_views().contains(&view) => {
                session.current_view = view;
                true
            }
            _ => false,
        }
    }

    /// Signs out (or exits the simulation) and wipes every
    /// session-derived cache.
    pub async fn logout(&self) -> Screen {
        let mut state = self.state.write().await;
        if let SessionState::Active(session) = &*state {
            if session.is_simulation() {
                tracing::info!("[SessionGate] Exiting simulation {}", session.account.id);
            } else {
                tracing::info!("[SessionGate] Signing out {}", session.account.id);
            }
        }
        // Dropping the previous state drops coins, inbox, uploads, the
        // selected student and the remedial subject with it; the process
        // keeps a single session value, so nothing may survive here.
        *state = SessionState::LoggedOut;
        self.session_guard.clear();
        self.student_guard.clear();
        state.screen()
    }

    /// Enters an active session impersonating a persona preset.
    ///
    /// Used by the internal testing panel; skips the credential exchange
    /// and the agreement, and relabels sign-out to "exit simulation".
    pub async fn simulate_persona(&self, persona: SimulatedPersona) -> Screen {
        let session = ActiveSession::simulated(persona);
        self.session_guard.retarget(&session.account.id);
        let mut state = self.state.write().await;
        *state = SessionState::Active(session);
        state.screen()
    }

    /// Awards coins to the signed-in user.
    ///
    /// On repository failure the cached balance is left untouched and
    /// the error is returned for a user-visible notice; there is no
    /// speculative increment and no automatic retry.
    pub async fn award_coins(&self, amount: u64) -> Result<u64> {
        let user_id = match &*self.state.read().await {
            SessionState::Active(session) => session.account.id.clone(),
            _ => {
                return Err(ScholaError::validation("session", "no active session"));
            }
        };

        let new_balance = self
            .economy
            .credit(&user_id, amount)
            .await
            .map_err(|e| ScholaError::adapter_unavailable("economy", e.to_string()))?;

        let mut state = self.state.write().await;
        if let SessionState::Active(session) = &mut *state {
            if session.account.id == user_id {
                session.coins = new_balance;
            }
        }
        Ok(new_balance)
    }

    /// Remembers an uploaded file name for the session.
    pub async fn record_upload(&self, file_name: impl Into<String>) -> bool {
        let mut state = self.state.write().await;
        match &mut *state {
            SessionState::Active(session) => {
                session.uploaded_files.push(file_name.into());
                true
            }
            _ => false,
        }
    }

    /// Attaches a remedial subject to the active student session.
    ///
    /// Forces restricted mode and moves the session to the curriculum
    /// screen, where the remedial sessions are worked through.
    pub async fn attach_remedial(&self, remedial: RemedialSubject) -> bool {
        let mut state = self.state.write().await;
        match &mut *state {
            SessionState::Active(session) if session.account.role == Role::Student => {
                session.remedial = Some(remedial);
                session.current_view = ViewId::Curriculum;
                true
            }
            _ => false,
        }
    }

    /// Registers an off-topic strike from the tutor chat.
    ///
    /// Returns the strike count and whether the session is now locked.
    pub async fn register_off_topic_strike(&self) -> (u8, bool) {
        let mut state = self.state.write().await;
        match &mut *state {
            SessionState::Active(session) => {
                session.tutor_strikes = session.tutor_strikes.saturating_add(1);
                if session.tutor_strikes >= TUTOR_STRIKE_LIMIT {
                    session.tutor_locked = true;
                }
                (session.tutor_strikes, session.tutor_locked)
            }
            _ => (0, false),
        }
    }

    /// Whether the tutor chat is locked for this session.
    pub async fn tutor_locked(&self) -> bool {
        match &*self.state.read().await {
            SessionState::Active(session) => session.tutor_locked,
            _ => false,
        }
    }

    /// Selects the student an admin is inspecting. Last selection wins:
    /// any fetch still in flight for the previous student goes stale.
    pub async fn select_student(self: &Arc<Self>, student_id: Option<String>) -> bool {
        {
            let mut state = self.state.write().await;
            match &mut *state {
                SessionState::Active(session) if session.account.role == Role::Admin => {
                    session.selected_student_id = student_id.clone();
                    session.student_overview = None;
                }
                _ => return false,
            }
        }

        match student_id {
            Some(id) => {
                let ticket = self.student_guard.retarget(&id);
                let gate = Arc::clone(self);
                tokio::spawn(async move {
                    gate.run_student_overview_fetch(id, ticket).await;
                });
            }
            None => self.student_guard.clear(),
        }
        true
    }

    async fn detect_remedial(&self, student_id: &str) -> Option<RemedialSubject> {
        match self.academic.remedial_for(student_id).await {
            Ok(remedial) => remedial,
            Err(e) => {
                tracing::warn!(
                    "[SessionGate] Remedial lookup failed for {student_id}, continuing without: {e}"
                );
                None
            }
        }
    }

    /// Commits the active state and kicks off the entry fetches.
    async fn enter_active(self: &Arc<Self>, account: Account, remedial: Option<RemedialSubject>) -> Screen {
        let session = ActiveSession::new(account.clone(), remedial);
        let ticket = self.session_guard.retarget(&account.id);

        let screen = {
            let mut state = self.state.write().await;
            *state = SessionState::Active(session);
            state.screen()
        };

        // Fire-and-forget: the screen above renders immediately with
        // defaults and is updated when the data arrives.
        let gate = Arc::clone(self);
        tokio::spawn(async move {
            gate.run_session_fetch(account, ticket).await;
        });

        screen
    }

    /// Fetches the session-entry data and applies it if still current.
    async fn run_session_fetch(self: Arc<Self>, account: Account, ticket: FetchTicket) {
        match account.role {
            Role::Student => {
                let balance = self.economy.balance(&account.id).await;
                let catalog = self.economy.catalog().await;
                let plan_views = self.resolve_plan_views(&account).await;
                let inbox = self.messages.list_for(&account.id).await.unwrap_or_else(|e| {
                    tracing::warn!("[SessionGate] Inbox fetch failed, serving empty: {e}");
                    Vec::new()
                });

                let mut state = self.state.write().await;
                if !self.session_guard.accepts(&ticket) {
                    tracing::info!("[SessionGate] Dropping stale entry fetch for {}", account.id);
                    return;
                }
                if let SessionState::Active(session) = &mut *state {
                    session.coins = balance.coins;
                    session.catalog = catalog;
                    session.plan_views = plan_views;
                    session.inbox = inbox;
                }
            }
            Role::Admin => {
                let roster = self.profiles.list_students().await.unwrap_or_else(|e| {
                    tracing::warn!("[SessionGate] Roster fetch failed, serving empty: {e}");
                    Vec::new()
                });

                let mut state = self.state.write().await;
                if !self.session_guard.accepts(&ticket) {
                    tracing::info!("[SessionGate] Dropping stale roster fetch for {}", account.id);
                    return;
                }
                if let SessionState::Active(session) = &mut *state {
                    session.roster = roster;
                }
            }
        }
    }

    async fn resolve_plan_views(&self, account: &Account) -> BTreeSet<ViewId> {
        let Some(plan_id) = &account.plan_id else {
            return BTreeSet::new();
        };
        match self.plans.find_by_id(plan_id).await {
            Ok(Some(plan)) => plan.allowed_views,
            Ok(None) => {
                tracing::warn!("[SessionGate] Assigned plan {plan_id} does not exist");
                BTreeSet::new()
            }
            Err(e) => {
                tracing::warn!("[SessionGate] Plan fetch failed, using defaults: {e}");
                BTreeSet::new()
            }
        }
    }

    /// Fetches the detail data for an inspected student and applies it
    /// if that student is still selected.
    async fn run_student_overview_fetch(self: Arc<Self>, student_id: String, ticket: FetchTicket) {
        let results = self.academic.results_for(&student_id).await.unwrap_or_default();
        let progress = self.academic.progress_for(&student_id).await.unwrap_or_default();
        let infractions = self
            .infractions
            .list_for(&student_id)
            .await
            .unwrap_or_default();

        let overview = StudentOverview {
            student_id: student_id.clone(),
            results,
            progress,
            infractions,
        };

        let mut state = self.state.write().await;
        if !self.student_guard.accepts(&ticket) {
            tracing::info!("[SessionGate] Dropping stale overview for {student_id}");
            return;
        }
        if let SessionState::Active(session) = &mut *state {
            if session.selected_student_id.as_deref() == Some(student_id.as_str()) {
                session.student_overview = Some(overview);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{account, credentials, harness, remedial};
    use schola_core::account::AcademicLevel;
    use schola_core::view::menu::{DEFAULT_VIEWS, RESTRICTED_VIEWS};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_student_login_lands_on_dashboard_with_default_menu() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, true));

        let screen = h.gate.login(&credentials(Role::Student)).await.unwrap();
        match screen {
            Screen::Active { view, menu, .. } => {
                assert_eq!(view, ViewId::Dashboard);
                assert_eq!(
                    menu.into_iter().collect::<BTreeSet<_>>(),
                    DEFAULT_VIEWS.into_iter().collect::<BTreeSet<_>>()
                );
            }
            other => panic!("expected active screen, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_student_with_remedial_lands_restricted_on_curriculum() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, true));
        *h.academic.remedial.lock().unwrap() = Some(remedial());

        let screen = h.gate.login(&credentials(Role::Student)).await.unwrap();
        match screen {
            Screen::Active { view, menu, .. } => {
                assert_eq!(view, ViewId::Curriculum);
                assert_eq!(
                    menu.into_iter().collect::<BTreeSet<_>>(),
                    RESTRICTED_VIEWS.into_iter().collect::<BTreeSet<_>>()
                );
            }
            other => panic!("expected active screen, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_admin_login_skips_agreement_and_sees_teacher_report() {
        let h = harness();
        // The stored flag is false; the gate must force it for admins.
        *h.auth.account.lock().unwrap() = Some(account("a-1", Role::Admin, false));

        let screen = h.gate.login(&credentials(Role::Admin)).await.unwrap();
        match screen {
            Screen::Active { view, menu, .. } => {
                assert_eq!(view, ViewId::Progress);
                assert!(menu.contains(&ViewId::TeacherReport));
            }
            other => panic!("expected active screen, got {other:?}"),
        }

        match h.gate.state().await {
            SessionState::Active(session) => assert!(session.account.agreement_accepted),
            other => panic!("expected active state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_login_keeps_logged_out() {
        let h = harness();
        let err = h.gate.login(&credentials(Role::Student)).await.unwrap_err();
        assert!(err.is_auth());
        assert!(h.gate.state().await.is_logged_out());
        assert_eq!(h.gate.screen().await, Screen::Login);
    }

    #[tokio::test]
    async fn test_missing_guardian_contact_blocks_before_network() {
        let h = harness();
        let mut creds = credentials(Role::Student);
        creds.guardian_contact = String::new();

        let err = h.gate.login(&creds).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_agreement_pending_only_renders_consent() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, false));

        let screen = h.gate.login(&credentials(Role::Student)).await.unwrap();
        assert!(matches!(screen, Screen::Agreement { .. }));

        // Forced navigation must be a no-op while consent is pending.
        for view in [ViewId::Dashboard, ViewId::Settings, ViewId::TeacherReport] {
            assert!(!h.gate.select_view(view).await);
        }
        assert!(matches!(h.gate.screen().await, Screen::Agreement { .. }));
    }

    #[tokio::test]
    async fn test_accepting_agreement_activates_and_persists() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, false));
        h.gate.login(&credentials(Role::Student)).await.unwrap();

        let screen = h.gate.accept_agreement().await.unwrap();
        assert!(matches!(screen, Screen::Active { .. }));
        assert_eq!(h.profiles.accepted.lock().unwrap().get("u-1"), Some(&true));
    }

    #[tokio::test]
    async fn test_accept_agreement_write_failure_stays_pending() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, false));
        h.gate.login(&credentials(Role::Student)).await.unwrap();
        h.profiles.fail_writes.store(true, Ordering::SeqCst);

        let err = h.gate.accept_agreement().await.unwrap_err();
        assert!(err.is_adapter_unavailable());
        assert!(matches!(h.gate.screen().await, Screen::Agreement { .. }));
    }

    #[tokio::test]
    async fn test_declining_agreement_clears_session() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, false));
        h.gate.login(&credentials(Role::Student)).await.unwrap();

        assert_eq!(h.gate.decline_agreement().await, Screen::Login);
        assert!(h.gate.state().await.is_logged_out());
    }

    #[tokio::test]
    async fn test_select_view_outside_menu_is_noop() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, true));
        h.gate.login(&credentials(Role::Student)).await.unwrap();

        // TeacherReport is never visible to a student.
        assert!(!h.gate.select_view(ViewId::TeacherReport).await);
        assert!(h.gate.select_view(ViewId::Progress).await);
        match h.gate.screen().await {
            Screen::Active { view, .. } => assert_eq!(view, ViewId::Progress),
            other => panic!("expected active screen, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_logout_wipes_every_session_cache() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, true));
        h.gate.login(&credentials(Role::Student)).await.unwrap();

        h.gate.award_coins(25).await.unwrap();
        h.gate.record_upload("essay.pdf").await;
        h.gate.attach_remedial(remedial()).await;

        assert_eq!(h.gate.logout().await, Screen::Login);

        // A different user signing in must start from a pristine session.
        *h.auth.account.lock().unwrap() = Some(account("u-2", Role::Student, true));
        h.gate.login(&credentials(Role::Student)).await.unwrap();
        match h.gate.state().await {
            SessionState::Active(session) => {
                assert_eq!(session.account.id, "u-2");
                assert_eq!(session.coins, 0);
                assert!(session.uploaded_files.is_empty());
                assert!(session.remedial.is_none());
                assert!(session.selected_student_id.is_none());
                assert_eq!(session.tutor_strikes, 0);
            }
            other => panic!("expected active state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_award_coins_failure_leaves_balance_unchanged() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, true));
        h.gate.login(&credentials(Role::Student)).await.unwrap();
        h.gate.award_coins(10).await.unwrap();

        h.economy.fail_credit.store(true, Ordering::SeqCst);
        let err = h.gate.award_coins(50).await.unwrap_err();
        assert!(err.is_adapter_unavailable());

        match h.gate.state().await {
            SessionState::Active(session) => assert_eq!(session.coins, 10),
            other => panic!("expected active state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_simulate_kids_persona() {
        let h = harness();
        let screen = h.gate.simulate_persona(SimulatedPersona::kids()).await;
        match screen {
            Screen::Active {
                sign_out_label,
                simulation,
                ..
            } => {
                assert!(simulation);
                assert_eq!(sign_out_label, "Exit simulation");
            }
            other => panic!("expected active screen, got {other:?}"),
        }

        match h.gate.state().await {
            SessionState::Active(session) => {
                assert!(session.is_simulation());
                assert_eq!(session.account.role, Role::Student);
                assert_eq!(session.account.level, AcademicLevel::Primary);
            }
            other => panic!("expected active state, got {other:?}"),
        }

        assert_eq!(h.gate.logout().await, Screen::Login);
    }

    #[tokio::test]
    async fn test_stale_entry_fetch_is_dropped_after_logout() {
        let h = harness();
        let user = account("u-1", Role::Student, true);
        let ticket = h.gate.session_guard.retarget(&user.id);
        h.gate.logout().await;

        h.gate.clone().run_session_fetch(user, ticket).await;
        assert!(h.gate.state().await.is_logged_out());
    }

    #[tokio::test]
    async fn test_stale_student_overview_is_dropped_after_reselection() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("a-1", Role::Admin, true));
        h.gate.login(&credentials(Role::Admin)).await.unwrap();

        // The fetch for s-1 is issued, then the admin switches to s-2
        // before it resolves.
        let stale_ticket = h.gate.student_guard.retarget("s-1");
        h.gate.select_student(Some("s-2".to_string())).await;

        h.gate
            .clone()
            .run_student_overview_fetch("s-1".to_string(), stale_ticket)
            .await;

        match h.gate.state().await {
            SessionState::Active(session) => {
                assert_eq!(session.selected_student_id.as_deref(), Some("s-2"));
                let overview = session.student_overview;
                assert!(
                    overview.is_none() || overview.unwrap().student_id == "s-2",
                    "stale overview for s-1 must not be applied"
                );
            }
            other => panic!("expected active state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_three_strikes_lock_the_tutor() {
        let h = harness();
        *h.auth.account.lock().unwrap() = Some(account("u-1", Role::Student, true));
        h.gate.login(&credentials(Role::Student)).await.unwrap();

        assert_eq!(h.gate.register_off_topic_strike().await, (1, false));
        assert_eq!(h.gate.register_off_topic_strike().await, (2, false));
        assert_eq!(h.gate.register_off_topic_strike().await, (3, true));
        assert!(h.gate.tutor_locked().await);
    }

    #[tokio::test]
    async fn test_plan_views_resolved_from_assigned_plan() {
        let h = harness();
        let plan = schola_core::plan::PREDEFINED_PLANS[0].clone();
        h.plans
            .plans
            .lock()
            .unwrap()
            .insert(plan.id.clone(), plan.clone());

        let mut user = account("u-1", Role::Student, true);
        user.plan_id = Some(plan.id.clone());
        *h.auth.account.lock().unwrap() = Some(user.clone());

        h.gate.login(&credentials(Role::Student)).await.unwrap();
        // Run the entry fetch to completion deterministically.
        let ticket = h.gate.session_guard.retarget(&user.id);
        h.gate.clone().run_session_fetch(user, ticket).await;

        match h.gate.state().await {
            SessionState::Active(session) => {
                assert_eq!(session.plan_views, plan.allowed_views);
                assert_eq!(
                    session.visible_views(),
                    plan.allowed_views
                );
            }
            other => panic!("expected active state, got {other:?}"),
        }
    }
}
