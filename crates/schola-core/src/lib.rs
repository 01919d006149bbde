pub mod academic;
pub mod account;
pub mod content;
pub mod economy;
pub mod error;
pub mod infraction;
pub mod message;
pub mod plan;
pub mod session;
pub mod view;

// Re-export common error type
pub use error::{Result, ScholaError};
