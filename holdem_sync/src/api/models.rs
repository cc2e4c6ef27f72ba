//! Request and response bodies for the game service.

use crate::game::{Card, GameSession, Phase, PlayerId, PlayerSummary};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Games
// ============================================================================

/// Body of `POST /games`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateGameRequest {
    /// Seats to fill, 2-10
    pub num_players: u8,
    pub small_blind: f64,
    pub big_blind: f64,
}

impl CreateGameRequest {
    /// A table with the service's default 1/2 blinds.
    pub fn new(num_players: u8) -> Self {
        Self {
            num_players,
            small_blind: 1.0,
            big_blind: 2.0,
        }
    }

    pub fn with_blinds(mut self, small_blind: f64, big_blind: f64) -> Self {
        self.small_blind = small_blind;
        self.big_blind = big_blind;
        self
    }
}

/// Response of `POST /games`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameCreated {
    pub game_id: String,
    pub num_players: u32,
    pub small_blind: f64,
    pub big_blind: f64,
    pub status: Phase,
    #[serde(default)]
    pub pot: f64,
}

impl GameCreated {
    /// Minimal session snapshot for the newly created game.
    pub fn to_session(&self) -> GameSession {
        GameSession::new(self.game_id.clone())
            .with_phase(self.status.clone())
            .with_pot(self.pot)
    }
}

/// Response of `POST /games/{id}/start`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameStarted {
    #[serde(default)]
    pub message: String,
    pub state: Phase,
    #[serde(default)]
    pub pot: f64,
}

impl GameStarted {
    pub fn to_patch(&self) -> GameSession {
        GameSession::default()
            .with_phase(self.state.clone())
            .with_pot(self.pot)
    }
}

/// Response of `POST /games/{id}/deal`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DealResult {
    /// Hole cards in seat order
    pub hole_cards: Vec<Vec<Card>>,
    pub deck_remaining: u32,
}

impl DealResult {
    /// Pair each seat's hole cards with the player sitting there.
    pub fn hands_for<'a>(
        &'a self,
        players: &'a [PlayerSummary],
    ) -> impl Iterator<Item = (PlayerId, &'a [Card])> + 'a {
        players
            .iter()
            .zip(&self.hole_cards)
            .map(|(player, cards)| (player.player_id, cards.as_slice()))
    }
}

/// Community card streets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Street {
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn as_str(&self) -> &'static str {
        match self {
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response of `POST /games/{id}/flop|turn|river`
///
/// The flop arrives as `cards`, turn and river as a single `card`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreetCards {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub card: Option<Card>,
    pub street: String,
}

impl StreetCards {
    /// Cards revealed by this street.
    pub fn revealed(&self) -> Vec<Card> {
        self.cards.iter().chain(self.card.as_ref()).cloned().collect()
    }

    /// Patch extending `board` with the revealed cards and moving the phase
    /// to this street.
    pub fn extend_board(&self, board: &[Card]) -> GameSession {
        let mut cards = board.to_vec();
        cards.extend(self.revealed());
        GameSession::default()
            .with_phase(self.street.as_str())
            .with_community_cards(cards)
    }
}

/// Player moves accepted by `POST /games/{id}/action`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Call,
    Raise,
    Check,
    AllIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Fold => write!(f, "fold"),
            ActionKind::Call => write!(f, "call"),
            ActionKind::Raise => write!(f, "raise"),
            ActionKind::Check => write!(f, "check"),
            ActionKind::AllIn => write!(f, "all_in"),
        }
    }
}

/// Body of `POST /games/{id}/action`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerActionRequest {
    pub player_id: PlayerId,
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl PlayerActionRequest {
    pub fn new(player_id: PlayerId, action: ActionKind) -> Self {
        Self {
            player_id,
            action,
            amount: None,
        }
    }

    pub fn raise(player_id: PlayerId, amount: f64) -> Self {
        Self {
            player_id,
            action: ActionKind::Raise,
            amount: Some(amount),
        }
    }
}

/// Response of `POST /games/{id}/action`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionResult {
    pub player_id: PlayerId,
    pub action: ActionKind,
    #[serde(default)]
    pub amount: f64,
    /// Full session state after the action
    pub game_state: GameSession,
}

/// Filters for `GET /games/list`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ============================================================================
// Players
// ============================================================================

/// Body of `POST /players/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Body of `POST /players/login`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /players/login`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// A registered player account
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub chips: f64,
    #[serde(default)]
    pub level: i32,
    /// ISO-8601 timestamp, absent from list entries
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Player {
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }
}

/// Response of `GET /players/{id}/stats`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerStats {
    pub total_games: u32,
    pub total_hands: u32,
    pub wins: u32,
    /// Voluntarily put money in pot, percent
    pub vpip: f64,
    /// Preflop raise, percent
    pub pfr: f64,
    /// Aggression factor
    pub af: f64,
    /// Hands won over hands played, percent
    pub win_rate: f64,
    pub total_profit: f64,
}

/// Filters for `GET /players`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Response of `GET /players`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerList {
    pub players: Vec<Player>,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_request_serialization() {
        let body = serde_json::to_value(PlayerActionRequest::new(3, ActionKind::AllIn)).unwrap();
        assert_eq!(body, json!({"player_id": 3, "action": "all_in"}));

        let body = serde_json::to_value(PlayerActionRequest::raise(1, 40.0)).unwrap();
        assert_eq!(body, json!({"player_id": 1, "action": "raise", "amount": 40.0}));
    }

    #[test]
    fn test_create_game_defaults() {
        let body = serde_json::to_value(CreateGameRequest::new(4)).unwrap();
        assert_eq!(
            body,
            json!({"num_players": 4, "small_blind": 1.0, "big_blind": 2.0})
        );
    }

    #[test]
    fn test_game_created_to_session() {
        let created: GameCreated = serde_json::from_value(json!({
            "game_id": "ab12cd34", "num_players": 4, "small_blind": 1.0,
            "big_blind": 2.0, "status": "waiting", "pot": 0
        }))
        .unwrap();

        let session = created.to_session();
        assert_eq!(session.game_id.as_deref(), Some("ab12cd34"));
        assert_eq!(session.state, Some(Phase::Waiting));
        assert_eq!(session.pot, Some(0.0));
    }

    #[test]
    fn test_street_cards_flop_and_turn() {
        let flop: StreetCards = serde_json::from_value(json!({
            "cards": [{"suit": 0, "rank": 1}, {"suit": 1, "rank": 2}, {"suit": 2, "rank": 3}],
            "street": "flop"
        }))
        .unwrap();
        let patch = flop.extend_board(&[]);
        assert_eq!(patch.state, Some(Phase::Flop));
        assert_eq!(patch.community_cards.as_ref().map(Vec::len), Some(3));

        let turn: StreetCards = serde_json::from_value(json!({
            "card": {"suit": 3, "rank": 4}, "street": "turn"
        }))
        .unwrap();
        let board = patch.community_cards.unwrap();
        let patch = turn.extend_board(&board);
        assert_eq!(patch.state, Some(Phase::Turn));
        let cards = patch.community_cards.unwrap();
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[3], Card::new(3, 4));
    }

    #[test]
    fn test_deal_result_pairs_seats() {
        let deal: DealResult = serde_json::from_value(json!({
            "hole_cards": [
                [{"suit": 0, "rank": 12}, {"suit": 1, "rank": 12}],
                [{"suit": 2, "rank": 0}, {"suit": 3, "rank": 1}]
            ],
            "deck_remaining": 48
        }))
        .unwrap();

        let players = vec![PlayerSummary::new(7), PlayerSummary::new(9)];
        let hands: Vec<_> = deal.hands_for(&players).collect();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].0, 7);
        assert_eq!(hands[1].1[0], Card::new(2, 0));
    }

    #[test]
    fn test_player_display_name() {
        let player: Player =
            serde_json::from_value(json!({"id": 1, "username": "alice", "chips": 1000.0, "level": 1}))
                .unwrap();
        assert_eq!(player.display_name(), "alice");
        assert_eq!(player.created_at, None);
    }

    #[test]
    fn test_access_token_default_type() {
        let token: AccessToken = serde_json::from_value(json!({"access_token": "t0k"})).unwrap();
        assert_eq!(token.token_type, "bearer");
    }
}
