//! The view registry: the closed set of screens the application can mount.

pub mod menu;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identifier for a top-level application screen.
///
/// This enumeration is closed and immutable for the process lifetime.
/// Navigation, menu computation, and plan assignment all speak in terms
/// of these identifiers; a plan referencing a view is a reference into
/// this registry, never a copy of screen data.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum ViewId {
    Dashboard,
    Curriculum,
    Repository,
    Consultant,
    Metrics,
    Progress,
    Diagnostic,
    Career,
    Rewards,
    Flashcards,
    Social,
    Settings,
    Pricing,
    Payments,
    Schedule,
    Whiteboard,
    TeacherReport,
}

impl ViewId {
    /// Human-readable label for sidebar rendering.
    pub fn label(&self) -> &'static str {
        match self {
            ViewId::Dashboard => "Dashboard",
            ViewId::Curriculum => "Curriculum",
            ViewId::Repository => "Resource Repository",
            ViewId::Consultant => "AI Consultant",
            ViewId::Metrics => "Metrics",
            ViewId::Progress => "Progress",
            ViewId::Diagnostic => "Diagnostic Test",
            ViewId::Career => "Career Guidance",
            ViewId::Rewards => "Rewards",
            ViewId::Flashcards => "Flashcards",
            ViewId::Social => "Social",
            ViewId::Settings => "Settings",
            ViewId::Pricing => "Pricing",
            ViewId::Payments => "Payments",
            ViewId::Schedule => "Schedule",
            ViewId::Whiteboard => "Whiteboard",
            ViewId::TeacherReport => "Teacher Report",
        }
    }
}
