//! Menu policy: which views a signed-in user may navigate to.
//!
//! The policy is a pure function of role, assigned plan, and the
//! restricted-mode flag. Same inputs always produce the same visible set.

use super::ViewId;
use crate::account::Role;
use std::collections::BTreeSet;

/// Views every student sees when no plan is assigned.
pub const DEFAULT_VIEWS: [ViewId; 7] = [
    ViewId::Dashboard,
    ViewId::Schedule,
    ViewId::Curriculum,
    ViewId::Repository,
    ViewId::Consultant,
    ViewId::Progress,
    ViewId::Rewards,
];

/// The fixed minimal subset shown while a remedial subject is attached.
///
/// A student under remediation must not be distracted by unrelated tools,
/// so the assigned plan is ignored entirely while this mode is active.
pub const RESTRICTED_VIEWS: [ViewId; 4] = [
    ViewId::Curriculum,
    ViewId::Repository,
    ViewId::Rewards,
    ViewId::Progress,
];

/// Computes the set of views visible to a user.
///
/// - `restricted` wins over everything: the result is exactly
///   [`RESTRICTED_VIEWS`] regardless of the assigned plan.
/// - Otherwise a student with a non-empty plan sees exactly that set.
/// - Otherwise the documented default set applies.
/// - An admin always additionally sees [`ViewId::TeacherReport`]; a
///   student never does, restricted or not.
///
/// Deterministic and side-effect free.
pub fn visible_views(
    role: Role,
    plan_views: &BTreeSet<ViewId>,
    restricted: bool,
) -> BTreeSet<ViewId> {
    let mut views: BTreeSet<ViewId> = if restricted {
        RESTRICTED_VIEWS.into_iter().collect()
    } else if role == Role::Student && !plan_views.is_empty() {
        plan_views.clone()
    } else {
        DEFAULT_VIEWS.into_iter().collect()
    };

    if role == Role::Admin {
        views.insert(ViewId::TeacherReport);
    } else {
        views.remove(&ViewId::TeacherReport);
    }

    views
}
