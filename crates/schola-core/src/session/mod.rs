//! Session domain: the state machine over the signed-in user.

pub mod model;

pub use model::{ActiveSession, Screen, SessionState, SimulatedPersona};
