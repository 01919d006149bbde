pub mod academic_repository;
pub mod auth_service;
pub mod dir_storage;
pub mod economy_repository;
pub mod infraction_repository;
pub mod message_repository;
pub mod paths;
pub mod plan_repository;
pub mod profile_repository;

pub use academic_repository::DirAcademicRepository;
pub use auth_service::{StoreAuthService, password_digest};
pub use dir_storage::DirStorage;
pub use economy_repository::DirEconomyRepository;
pub use infraction_repository::DirInfractionRepository;
pub use message_repository::DirMessageRepository;
pub use paths::{Collection, ScholaPaths};
pub use plan_repository::DirPlanRepository;
pub use profile_repository::DirProfileRepository;
