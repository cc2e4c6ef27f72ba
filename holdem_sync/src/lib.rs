//! # Holdem Sync
//!
//! Client-side synchronization layer for a networked Texas Hold'em service.
//!
//! The crate has two independent halves which the caller composes:
//!
//! - [`api`]: the request pipeline. A [`reqwest`] client with a fixed base URL
//!   and timeout that attaches a bearer token on every call and funnels every
//!   failure through a single reporting hook.
//! - [`store`]: the session store. Holds at most one active game, per-player
//!   hidden cards, a connection flag and a bounded event log, and exposes
//!   derived read-only views.
//!
//! Neither half calls the other. A typical caller fetches with the pipeline
//! and pushes the result into the store:
//!
//! ```no_run
//! use holdem_sync::{ApiClient, GameStore, api::NoToken};
//!
//! # async fn run() -> Result<(), holdem_sync::ApiError> {
//! let api = ApiClient::new("http://localhost:8000/api", NoToken)?;
//! let mut store = GameStore::new();
//!
//! let game = api.get_game("ab12cd34").await?;
//! store.set_game(Some(game));
//! println!("{} pot={}", store.phase(), store.pot());
//! # Ok(())
//! # }
//! ```

/// HTTP request pipeline.
pub mod api;
pub use api::{ApiClient, ApiError, ApiResult};

/// Wire entities shared by the pipeline and the store.
pub mod game;
pub use game::{Card, GameSession, Phase, PlayerId, PlayerSummary};

/// Local session store and derived views.
pub mod store;
pub use store::{GameStore, UpdateTicket};
