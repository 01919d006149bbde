//! Account domain: profiles, credentials, authentication.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{AcademicLevel, Account, Credentials, Profile, Role};
pub use repository::ProfileRepository;
pub use service::AuthService;
