//! DirStorage-based ProfileRepository implementation.

use crate::dir_storage::DirStorage;
use crate::paths::{Collection, ScholaPaths};
use anyhow::Result;
use async_trait::async_trait;
use schola_core::account::{Account, Profile, ProfileRepository, Role};
use std::path::Path;

/// File-backed profile repository.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── profiles/
///     ├── profile-uuid-1.toml
///     └── profile-uuid-2.toml
/// ```
pub struct DirProfileRepository {
    storage: DirStorage,
}

impl DirProfileRepository {
    const ENTITY_NAME: &'static str = "profile";

    /// Creates a repository rooted at the given base directory, or the
    /// platform default when `None`.
    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let paths = ScholaPaths::new(base_dir);
        let storage = paths.open_storage(Collection::Profiles).await?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl ProfileRepository for DirProfileRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let all: Vec<(String, Profile)> = self.storage.load_all(Self::ENTITY_NAME).await?;
        Ok(all
            .into_iter()
            .map(|(_, profile)| profile)
            .find(|profile| profile.email.eq_ignore_ascii_case(email)))
    }

    async fn find_by_id(&self, profile_id: &str) -> Result<Option<Profile>> {
        match self.storage.load(Self::ENTITY_NAME, profile_id).await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, profile: &Profile) -> Result<()> {
        self.storage
            .save(Self::ENTITY_NAME, &profile.id, profile)
            .await
            .map_err(Into::into)
    }

    async fn list_students(&self) -> Result<Vec<Account>> {
        let all: Vec<(String, Profile)> = self.storage.load_all(Self::ENTITY_NAME).await?;
        let mut students: Vec<Account> = all
            .into_iter()
            .map(|(_, profile)| profile)
            .filter(|profile| profile.role == Role::Student)
            .map(|profile| profile.to_account())
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(students)
    }

    async fn set_agreement_accepted(&self, profile_id: &str, accepted: bool) -> Result<()> {
        let mut profile: Profile = self.storage.load(Self::ENTITY_NAME, profile_id).await?;
        profile.agreement_accepted = accepted;
        self.save(&profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schola_core::account::AcademicLevel;
    use tempfile::TempDir;

    async fn create_test_repository() -> (DirProfileRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirProfileRepository::new(Some(temp_dir.path())).await.unwrap();
        (repo, temp_dir)
    }

    fn create_test_profile(id: &str, email: &str, role: Role) -> Profile {
        Profile {
            id: id.to_string(),
            name: format!("User {id}"),
            email: email.to_string(),
            role,
            level: AcademicLevel::Primary,
            password_digest: "digest".to_string(),
            guardian_contact: None,
            agreement_accepted: false,
            plan_id: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_email_case_insensitive() {
        let (repo, _temp_dir) = create_test_repository().await;
        let profile = create_test_profile("u-1", "Ana@Example.com", Role::Student);
        repo.save(&profile).await.unwrap();

        let found = repo.find_by_email("ana@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, "u-1");
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_students_excludes_admins() {
        let (repo, _temp_dir) = create_test_repository().await;
        repo.save(&create_test_profile("u-1", "a@example.com", Role::Student))
            .await
            .unwrap();
        repo.save(&create_test_profile("u-2", "b@example.com", Role::Admin))
            .await
            .unwrap();

        let students = repo.list_students().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "u-1");
    }

    #[tokio::test]
    async fn test_set_agreement_accepted_persists() {
        let (repo, _temp_dir) = create_test_repository().await;
        repo.save(&create_test_profile("u-1", "a@example.com", Role::Student))
            .await
            .unwrap();

        repo.set_agreement_accepted("u-1", true).await.unwrap();
        let profile = repo.find_by_id("u-1").await.unwrap().unwrap();
        assert!(profile.agreement_accepted);
    }
}
