//! Account domain models.
//!
//! Contains the stored profile, the session-facing account subset, and
//! the login credentials with their client-side validation.

use crate::error::{Result, ScholaError};
use serde::{Deserialize, Serialize};

/// The role a user signs in under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    Admin,
}

/// Academic stage of a student account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcademicLevel {
    Primary,
    Bachillerato,
}

/// The session-facing view of a signed-in user.
///
/// Produced by [`crate::account::AuthService::authenticate`] and owned by
/// the session state. Never carries the credential digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier (UUID format)
    pub id: String,
    /// Display name
    pub name: String,
    /// Sign-in email
    pub email: String,
    pub role: Role,
    pub level: AcademicLevel,
    /// Whether the platform agreement has been accepted
    #[serde(default)]
    pub agreement_accepted: bool,
    /// Guardian contact captured at registration (students only)
    #[serde(default)]
    pub guardian_contact: Option<String>,
    /// Assigned educational plan, referenced by id (foreign-key style)
    #[serde(default)]
    pub plan_id: Option<String>,
}

/// The stored profile record backing an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub level: AcademicLevel,
    /// Hex-encoded SHA-256 digest of the password
    pub password_digest: String,
    #[serde(default)]
    pub guardian_contact: Option<String>,
    /// Whether the platform agreement has been accepted
    #[serde(default)]
    pub agreement_accepted: bool,
    #[serde(default)]
    pub plan_id: Option<String>,
}

impl Profile {
    /// Projects the stored profile into its session-facing subset.
    pub fn to_account(&self) -> Account {
        Account {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            level: self.level,
            agreement_accepted: self.agreement_accepted,
            guardian_contact: self.guardian_contact.clone(),
            plan_id: self.plan_id.clone(),
        }
    }
}

/// Login form input: email/password plus the role selector.
///
/// The student flow additionally requires a non-empty guardian contact
/// string before submission is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub intended_role: Role,
    #[serde(default)]
    pub guardian_contact: String,
}

impl Credentials {
    /// Validates required fields before any network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ScholaError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(ScholaError::validation("email", "email is required"));
        }
        if self.password.is_empty() {
            return Err(ScholaError::validation("password", "password is required"));
        }
        if self.intended_role == Role::Student && self.guardian_contact.trim().is_empty() {
            return Err(ScholaError::validation(
                "guardian_contact",
                "guardian contact is required for student sign-in",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(role: Role, guardian: &str) -> Credentials {
        Credentials {
            email: "alumno@example.com".to_string(),
            password: "secret".to_string(),
            intended_role: role,
            guardian_contact: guardian.to_string(),
        }
    }

    #[test]
    fn test_student_requires_guardian_contact() {
        let err = credentials(Role::Student, "  ").validate().unwrap_err();
        assert!(err.is_validation());

        assert!(credentials(Role::Student, "madre@example.com")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_admin_does_not_require_guardian_contact() {
        assert!(credentials(Role::Admin, "").validate().is_ok());
    }

    #[test]
    fn test_empty_email_rejected() {
        let mut creds = credentials(Role::Admin, "");
        creds.email = "".to_string();
        assert!(creds.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_account_projection_drops_digest() {
        let profile = Profile {
            id: "u-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::Student,
            level: AcademicLevel::Primary,
            password_digest: "deadbeef".to_string(),
            guardian_contact: Some("tutor@example.com".to_string()),
            agreement_accepted: false,
            plan_id: Some("plan-primary".to_string()),
        };
        let account = profile.to_account();
        assert_eq!(account.id, "u-1");
        assert_eq!(account.plan_id.as_deref(), Some("plan-primary"));
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("deadbeef"));
    }
}
