//! Game data as observed from the service.
//!
//! The service owns the rules; these types only mirror what it reports.

pub mod entities;

pub use entities::{Card, GameSession, Phase, PlayerId, PlayerSummary};
