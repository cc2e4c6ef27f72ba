//! Wire entities reported by the game service.
//!
//! These types are deliberately lenient: every field the service might omit
//! is optional, and fields this crate does not interpret are kept in an
//! `extra` map so they survive merges and re-serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Player identifier as assigned by the service.
pub type PlayerId = i64;

/// Stage of a session's lifecycle, as reported by the service.
///
/// Unknown values are preserved verbatim in [`Phase::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Phase {
    #[default]
    Waiting,
    Started,
    Dealt,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
    Finished,
    Other(String),
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "waiting",
            Self::Started => "started",
            Self::Dealt => "dealt",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::Complete => "complete",
            Self::Finished => "finished",
            Self::Other(value) => value,
        }
    }

    /// Check if the hand is over (no further streets or actions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Finished)
    }
}

impl From<&str> for Phase {
    fn from(value: &str) -> Self {
        match value {
            "waiting" => Self::Waiting,
            "started" => Self::Started,
            "dealt" => Self::Dealt,
            "preflop" => Self::Preflop,
            "flop" => Self::Flop,
            "turn" => Self::Turn,
            "river" => Self::River,
            "showdown" => Self::Showdown,
            "complete" => Self::Complete,
            "finished" => Self::Finished,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Phase {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Phase> for String {
    fn from(value: Phase) -> Self {
        match value {
            Phase::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single playing card.
///
/// `suit` is 0-3 (spade, heart, diamond, club) and `rank` is 0-12 (2 through
/// ace). `display` is the service's own rendering, e.g. `"A♠"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub suit: u8,
    pub rank: u8,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn new(suit: u8, rank: u8) -> Self {
        Self {
            suit,
            rank,
            display: String::new(),
            extra: Map::new(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.display.is_empty() {
            return write!(f, "{}", self.display);
        }
        let rank = match self.rank {
            0..=8 => return write!(f, "{}{}", self.rank + 2, suit_symbol(self.suit)),
            9 => "J",
            10 => "Q",
            11 => "K",
            12 => "A",
            _ => "?",
        };
        write!(f, "{}{}", rank, suit_symbol(self.suit))
    }
}

fn suit_symbol(suit: u8) -> &'static str {
    match suit {
        0 => "♠",
        1 => "♥",
        2 => "♦",
        3 => "♣",
        _ => "*",
    }
}

/// Per-seat summary of a player inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bet: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_in: Option<bool>,
    /// Only revealed by the service at showdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hole_cards: Option<Vec<Card>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerSummary {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            position: None,
            chips: None,
            current_bet: None,
            is_active: None,
            is_all_in: None,
            hole_cards: None,
            extra: Map::new(),
        }
    }
}

/// A game session, or a partial update to one.
///
/// Every known field is optional so the same record can carry a full
/// snapshot or a fragment to merge. See [`GameSession::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pot: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_cards: Option<Vec<Card>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerSummary>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameSession {
    /// Create a session snapshot carrying only an id.
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: Some(game_id.into()),
            ..Self::default()
        }
    }

    pub fn with_phase(mut self, phase: impl Into<Phase>) -> Self {
        self.state = Some(phase.into());
        self
    }

    pub fn with_pot(mut self, pot: f64) -> Self {
        self.pot = Some(pot);
        self
    }

    pub fn with_community_cards(mut self, cards: Vec<Card>) -> Self {
        self.community_cards = Some(cards);
        self
    }

    pub fn with_players(mut self, players: Vec<PlayerSummary>) -> Self {
        self.players = Some(players);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Shallow-merge `patch` into this session.
    ///
    /// Fields present in the patch overwrite; fields absent from it are left
    /// untouched. Extra fields merge key by key.
    pub fn merge(&mut self, patch: GameSession) {
        let GameSession {
            game_id,
            state,
            pot,
            community_cards,
            players,
            extra,
        } = patch;

        if game_id.is_some() {
            self.game_id = game_id;
        }
        if state.is_some() {
            self.state = state;
        }
        if pot.is_some() {
            self.pot = pot;
        }
        if community_cards.is_some() {
            self.community_cards = community_cards;
        }
        if players.is_some() {
            self.players = players;
        }
        self.extra.extend(extra);
    }

    /// Check if the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
