//! Local mirror of the active game session.
//!
//! [`GameStore`] is the single source of truth for what game is currently
//! displayed. It never talks to the network and never validates game rules;
//! callers push whatever the service reported and read back derived views.

pub mod log;

pub use log::{EventLog, MAX_LOG_ENTRIES};

use crate::game::{Card, GameSession, Phase, PlayerId, PlayerSummary};
use std::collections::HashMap;
use tokio::sync::watch;

/// Stamp taken before issuing a request whose result will be merged.
///
/// See [`GameStore::ticket`] and [`GameStore::apply_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTicket {
    seq: u64,
    game_id: Option<String>,
}

impl UpdateTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }
}

/// Holds at most one active session plus its client-side companions.
#[derive(Debug)]
pub struct GameStore {
    current: Option<GameSession>,
    /// Private hole cards per player, not part of the public session view
    hidden_cards: HashMap<PlayerId, Vec<Card>>,
    connected: bool,
    logs: EventLog,
    /// Bumped on every mutation
    revision: watch::Sender<u64>,
    tickets_issued: u64,
    last_applied: u64,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            current: None,
            hidden_cards: HashMap::new(),
            connected: false,
            logs: EventLog::new(),
            revision,
            tickets_issued: 0,
            last_applied: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Replace the held session wholesale. `None` means no session.
    pub fn set_game(&mut self, game: Option<GameSession>) {
        self.current = game;
        self.touch();
    }

    /// Shallow-merge a partial update into the held session.
    ///
    /// Without a held session this is a no-op; a partial never creates one.
    pub fn update_game_state(&mut self, patch: GameSession) {
        match self.current.as_mut() {
            Some(current) => {
                current.merge(patch);
                self.touch();
            }
            None => ::log::debug!("Ignoring partial update: no active session"),
        }
    }

    /// Insert or overwrite one player's hidden cards.
    pub fn set_player_cards(&mut self, player_id: PlayerId, cards: Vec<Card>) {
        self.hidden_cards.insert(player_id, cards);
        self.touch();
    }

    /// Append a timestamped message to the front of the event log.
    pub fn add_log(&mut self, message: &str) {
        self.logs.push(message);
        self.touch();
    }

    /// Drop the session, hidden cards and log together.
    ///
    /// Connection status is left alone.
    pub fn clear_game(&mut self) {
        self.current = None;
        self.hidden_cards.clear();
        self.logs.clear();
        self.touch();
    }

    pub fn set_connected(&mut self, status: bool) {
        self.connected = status;
        self.touch();
    }

    // ---------------------------------------------------------------------
    // Stale-update guard
    // ---------------------------------------------------------------------

    /// Take a ticket for a request about to be issued.
    ///
    /// The ticket records the current session id and an increasing sequence
    /// number.
    pub fn ticket(&mut self) -> UpdateTicket {
        self.tickets_issued += 1;
        UpdateTicket {
            seq: self.tickets_issued,
            game_id: self.session_id().map(str::to_string),
        }
    }

    /// Merge `patch` only if the ticket is still current.
    ///
    /// Returns `false` and leaves the state untouched when the held session
    /// changed since the ticket was taken, or when a result from a
    /// later-issued ticket has already been applied.
    pub fn apply_update(&mut self, ticket: &UpdateTicket, patch: GameSession) -> bool {
        if self.current.is_none() || ticket.game_id() != self.session_id() {
            ::log::debug!(
                "Dropping update #{}: session changed since it was issued",
                ticket.seq
            );
            return false;
        }

        if ticket.seq < self.last_applied {
            ::log::debug!(
                "Dropping update #{}: #{} already applied",
                ticket.seq,
                self.last_applied
            );
            return false;
        }

        self.last_applied = ticket.seq;
        self.update_game_state(patch);
        true
    }

    // ---------------------------------------------------------------------
    // Raw reads
    // ---------------------------------------------------------------------

    pub fn current_game(&self) -> Option<&GameSession> {
        self.current.as_ref()
    }

    pub fn player_cards(&self, player_id: PlayerId) -> Option<&[Card]> {
        self.hidden_cards.get(&player_id).map(Vec::as_slice)
    }

    pub fn hidden_cards(&self) -> &HashMap<PlayerId, Vec<Card>> {
        &self.hidden_cards
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn logs(&self) -> &EventLog {
        &self.logs
    }

    /// Number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch the revision counter to be woken on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ---------------------------------------------------------------------
    // Derived views
    // ---------------------------------------------------------------------

    pub fn session_id(&self) -> Option<&str> {
        self.current.as_ref()?.game_id.as_deref()
    }

    /// Current phase, `waiting` when nothing is loaded.
    pub fn phase(&self) -> Phase {
        self.current
            .as_ref()
            .and_then(|game| game.state.clone())
            .unwrap_or_default()
    }

    pub fn pot(&self) -> f64 {
        self.current
            .as_ref()
            .and_then(|game| game.pot)
            .unwrap_or(0.0)
    }

    pub fn community_cards(&self) -> &[Card] {
        self.current
            .as_ref()
            .and_then(|game| game.community_cards.as_deref())
            .unwrap_or(&[])
    }

    pub fn players(&self) -> &[PlayerSummary] {
        self.current
            .as_ref()
            .and_then(|game| game.players.as_deref())
            .unwrap_or(&[])
    }

    fn touch(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
