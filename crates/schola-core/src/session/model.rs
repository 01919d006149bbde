//! Session domain model.
//!
//! The session is modeled as an explicit tagged union so invalid
//! combinations (a simulated persona while logged out, session caches
//! without a signed-in account) are unrepresentable. There is exactly
//! one logical writer: the session gate in the application layer. Every
//! other component receives read-only snapshots.

use crate::academic::{RemedialSubject, StudentOverview};
use crate::account::{AcademicLevel, Account, Role};
use crate::economy::StoreItem;
use crate::message::AppMessage;
use crate::view::{ViewId, menu};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sign-out affordance label while simulating a persona.
pub const EXIT_SIMULATION_LABEL: &str = "Exit simulation";
/// Sign-out affordance label for a real session.
pub const SIGN_OUT_LABEL: &str = "Sign out";

/// A persona preset used by the internal testing panel.
///
/// Simulation enters an active session without a credential exchange and
/// relabels sign-out to "exit simulation" so testers cannot mistake it
/// for a real account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedPersona {
    pub label: String,
    pub role: Role,
    pub level: AcademicLevel,
}

impl SimulatedPersona {
    /// Primary-level student persona.
    pub fn kids() -> Self {
        Self {
            label: "KIDS".to_string(),
            role: Role::Student,
            level: AcademicLevel::Primary,
        }
    }

    /// Bachillerato-level student persona.
    pub fn teen() -> Self {
        Self {
            label: "TEEN".to_string(),
            role: Role::Student,
            level: AcademicLevel::Bachillerato,
        }
    }

    /// Admin persona.
    pub fn staff() -> Self {
        Self {
            label: "STAFF".to_string(),
            role: Role::Admin,
            level: AcademicLevel::Bachillerato,
        }
    }

    /// The account shape a simulated session runs under.
    pub fn to_account(&self) -> Account {
        Account {
            id: format!("simulated-{}", self.label.to_lowercase()),
            name: format!("Simulated {}", self.label),
            email: format!("{}@simulation.local", self.label.to_lowercase()),
            role: self.role,
            level: self.level,
            agreement_accepted: true,
            guardian_contact: None,
            plan_id: None,
        }
    }
}

/// The live state of an authenticated session.
///
/// Holds the session-local caches populated by the entry fetches. All of
/// them are wiped on logout so nothing leaks across user switches — the
/// process keeps a single session value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub account: Account,
    pub current_view: ViewId,
    /// Set while the internal testing panel is impersonating a persona
    pub simulation: Option<SimulatedPersona>,
    /// Attached remedial curriculum; forces restricted mode while present
    pub remedial: Option<RemedialSubject>,
    /// Allowed views of the assigned plan, resolved at login
    #[serde(default)]
    pub plan_views: BTreeSet<ViewId>,
    /// Cached coin balance
    #[serde(default)]
    pub coins: u64,
    /// Cached store catalog
    #[serde(default)]
    pub catalog: Vec<StoreItem>,
    /// Cached inbox
    #[serde(default)]
    pub inbox: Vec<AppMessage>,
    /// Names of files uploaded during this session
    #[serde(default)]
    pub uploaded_files: Vec<String>,
    /// Admin screens: the student roster, filled by the entry fetch
    #[serde(default)]
    pub roster: Vec<Account>,
    /// Admin screens: the currently inspected student (last selection wins)
    #[serde(default)]
    pub selected_student_id: Option<String>,
    /// Admin screens: detail data for the inspected student
    #[serde(default)]
    pub student_overview: Option<StudentOverview>,
    /// Off-topic strikes accumulated by the tutor chat
    #[serde(default)]
    pub tutor_strikes: u8,
    /// Set once the strike limit is reached; further tutor submissions
    /// are rejected locally
    #[serde(default)]
    pub tutor_locked: bool,
}

impl ActiveSession {
    /// Creates a fresh active session with empty caches.
    pub fn new(account: Account, remedial: Option<RemedialSubject>) -> Self {
        let current_view = initial_view(account.role, remedial.is_some());
        Self {
            account,
            current_view,
            simulation: None,
            remedial,
            plan_views: BTreeSet::new(),
            coins: 0,
            catalog: Vec::new(),
            inbox: Vec::new(),
            uploaded_files: Vec::new(),
            roster: Vec::new(),
            selected_student_id: None,
            student_overview: None,
            tutor_strikes: 0,
            tutor_locked: false,
        }
    }

    /// Creates an active session for a simulated persona.
    pub fn simulated(persona: SimulatedPersona) -> Self {
        let account = persona.to_account();
        Self {
            simulation: Some(persona),
            ..Self::new(account, None)
        }
    }

    /// True while a remedial subject is attached.
    pub fn is_restricted(&self) -> bool {
        self.remedial.is_some()
    }

    /// True while the internal testing panel is impersonating a persona.
    pub fn is_simulation(&self) -> bool {
        self.simulation.is_some()
    }

    /// The menu visible to this session, per the menu policy.
    pub fn visible_views(&self) -> BTreeSet<ViewId> {
        menu::visible_views(self.account.role, &self.plan_views, self.is_restricted())
    }

    /// Label for the sign-out affordance.
    pub fn sign_out_label(&self) -> &'static str {
        if self.is_simulation() {
            EXIT_SIMULATION_LABEL
        } else {
            SIGN_OUT_LABEL
        }
    }
}

/// Picks the screen a session lands on right after sign-in.
pub fn initial_view(role: Role, has_remedial: bool) -> ViewId {
    match role {
        Role::Admin => ViewId::Progress,
        Role::Student if has_remedial => ViewId::Curriculum,
        Role::Student => ViewId::Dashboard,
    }
}

/// The session state machine.
///
/// Transitions are owned by the session gate:
///
/// ```text
/// LoggedOut --login(student, !accepted)--> AgreementPending
/// LoggedOut --login(student, accepted)---> Active
/// LoggedOut --login(admin)---------------> Active   (agreement skipped)
/// LoggedOut --simulate_persona-----------> Active   (simulation set)
/// AgreementPending --accept--------------> Active
/// AgreementPending --decline-------------> LoggedOut
/// Active --logout------------------------> LoggedOut (caches wiped)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionState {
    /// Nobody signed in; the login form renders.
    LoggedOut,
    /// A student authenticated but has not accepted the agreement.
    /// Only the consent screen may render.
    AgreementPending { account: Account },
    /// A signed-in (or simulated) session.
    Active(ActiveSession),
}

impl SessionState {
    /// True when nobody is signed in.
    pub fn is_logged_out(&self) -> bool {
        matches!(self, Self::LoggedOut)
    }

    /// The screen to mount for this state.
    pub fn screen(&self) -> Screen {
        match self {
            Self::LoggedOut => Screen::Login,
            Self::AgreementPending { account } => Screen::Agreement {
                student_name: account.name.clone(),
            },
            Self::Active(session) => Screen::Active {
                view: session.current_view,
                menu: session.visible_views().into_iter().collect(),
                sign_out_label: session.sign_out_label().to_string(),
                simulation: session.is_simulation(),
            },
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::LoggedOut
    }
}

/// The render decision derived from the session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Screen {
    /// The login form.
    Login,
    /// The consent form (students only).
    Agreement { student_name: String },
    /// The sidebar plus the currently selected view.
    Active {
        view: ViewId,
        menu: Vec<ViewId>,
        sign_out_label: String,
        simulation: bool,
    },
}
