//! Application layer - orchestrates domain operations across ports.
//!
//! The session controller is the only use case: it owns a session's
//! transcript and drives each turn through the classifier and generator.

mod session_controller;

pub use session_controller::{
    SessionController, SessionFactory, SessionSettings, TurnOutcome, RECOVERY_NOTICE,
};
