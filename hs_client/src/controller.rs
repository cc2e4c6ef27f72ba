//! Glue between user commands, the request pipeline and the session store.
//!
//! The controller is the only place the two halves of `holdem_sync` meet: it
//! calls the service, then pushes what came back into the store.

use crate::commands::{Command, HELP};
use crate::config::ClientConfig;
use crate::render;
use anyhow::{Context, Result};
use holdem_sync::api::{
    ApiClient, ApiResult, CreateGameRequest, FileToken, GameQuery, LoginRequest, PlayerQuery,
    RegisterRequest,
};
use holdem_sync::{GameSession, GameStore, UpdateTicket};
use serde_json::Value;

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Print the text and keep reading input
    Continue(String),
    Quit,
}

/// Owns the pipeline and the store for one terminal session.
pub struct Controller {
    api: ApiClient,
    store: GameStore,
    tokens: FileToken,
    default_players: u8,
    auto_speed: f64,
}

impl Controller {
    /// Build a controller whose bearer token lives in `config.token_file`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let tokens = FileToken::new(config.token_file.clone());
        let api = ApiClient::new(config.api_base.clone(), tokens.clone())
            .context("Failed to create API client")?;

        Ok(Self {
            api,
            store: GameStore::new(),
            tokens,
            default_players: config.default_players,
            auto_speed: config.auto_speed,
        })
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Run one command to completion.
    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        let text = match command {
            Command::NewGame { players } => {
                let players = players.unwrap_or(self.default_players);
                let request = CreateGameRequest::new(players);
                let created = track(&mut self.store, self.api.create_game(&request).await)
                    .context("Failed to create game")?;

                self.store.clear_game();
                self.store.set_game(Some(created.to_session()));
                self.store
                    .add_log(&format!("Created game {} with {} players", created.game_id, players));
                self.refresh(&created.game_id).await?;
                render::render_table(&self.store)
            }
            Command::Load(game_id) => {
                self.load(&game_id).await?;
                self.store.add_log(&format!("Loaded game {}", game_id));
                render::render_table(&self.store)
            }
            Command::Start => {
                let game_id = self.active_game_id()?;
                let ticket = self.store.ticket();
                let started = track(&mut self.store, self.api.start_game(&game_id).await)
                    .context("Failed to start game")?;
                self.store.apply_update(&ticket, started.to_patch());
                self.store.add_log(&format!("Hand started ({})", started.state));
                render::render_table(&self.store)
            }
            Command::Deal { smart } => {
                let game_id = self.active_game_id()?;
                let dealt = track(&mut self.store, self.api.deal_cards(&game_id, smart).await)
                    .context("Failed to deal cards")?;

                let hands: Vec<_> = dealt
                    .hands_for(self.store.players())
                    .map(|(id, cards)| (id, cards.to_vec()))
                    .collect();
                for (player_id, cards) in hands {
                    self.store.set_player_cards(player_id, cards);
                }
                self.store.add_log(&format!(
                    "Dealt hole cards{} ({} left in deck)",
                    if smart { " with smart dealer" } else { "" },
                    dealt.deck_remaining
                ));
                self.refresh(&game_id).await?;
                render::render_table(&self.store)
            }
            Command::Advance(street) => {
                let game_id = self.active_game_id()?;
                let ticket = self.store.ticket();
                let revealed = track(&mut self.store, self.api.advance(&game_id, street).await)
                    .with_context(|| format!("Failed to deal {}", street))?;

                let patch = revealed.extend_board(self.store.community_cards());
                self.store.apply_update(&ticket, patch);
                self.store.add_log(&format!(
                    "Dealt {}: {}",
                    street,
                    render::format_cards(&revealed.revealed())
                ));
                render::render_table(&self.store)
            }
            Command::Act(request) => {
                let game_id = self.active_game_id()?;
                let ticket = self.store.ticket();
                let result = track(&mut self.store, self.api.player_action(&game_id, &request).await)
                    .context("Failed to submit action")?;

                let summary = match request.amount {
                    Some(_) => format!("Player {} {} {}", result.player_id, result.action, result.amount),
                    None => format!("Player {} {}", result.player_id, result.action),
                };
                self.store.apply_update(&ticket, result.game_state);
                self.store.add_log(&summary);
                render::render_table(&self.store)
            }
            Command::AutoPlay { speed } => {
                let game_id = self.active_game_id()?;
                let speed = speed.unwrap_or(self.auto_speed);
                let ticket = self.store.ticket();
                let record = track(&mut self.store, self.api.auto_play(&game_id, speed).await)
                    .context("Auto-play failed")?;

                let game_log = &record["game_log"];
                let actions = game_log["actions"].as_array().map_or(0, Vec::len);
                self.store
                    .add_log(&format!("Auto-played hand at {}x ({} actions)", speed, actions));
                if let Some(winners) = describe_winners(&game_log["winners"]) {
                    self.store.add_log(&winners);
                }
                self.merge_embedded(&game_id, &ticket, &record["final_state"])
                    .await?;
                render::render_table(&self.store)
            }
            Command::Step => {
                let game_id = self.active_game_id()?;
                let ticket = self.store.ticket();
                let step = track(&mut self.store, self.api.single_ai_action(&game_id).await)
                    .context("AI step failed")?;

                self.store.add_log(&describe_step(&step));
                self.merge_embedded(&game_id, &ticket, &step["game_state"])
                    .await?;
                render::render_table(&self.store)
            }
            Command::Refresh => {
                let game_id = self.active_game_id()?;
                self.refresh(&game_id).await?;
                render::render_table(&self.store)
            }
            Command::Show => render::render_table(&self.store),
            Command::Log => render::render_log(&self.store),
            Command::Clear => {
                self.store.clear_game();
                "Cleared active game".to_string()
            }
            Command::Login { username, password } => {
                let request = LoginRequest {
                    username: username.clone(),
                    password,
                };
                let token = track(&mut self.store, self.api.login(&request).await)
                    .context("Login failed")?;
                self.tokens
                    .store(&token.access_token)
                    .with_context(|| {
                        format!("Failed to persist token to {}", self.tokens.path().display())
                    })?;
                self.store.add_log(&format!("Logged in as {}", username));
                format!("Logged in as {}", username)
            }
            Command::Logout => {
                self.tokens.remove().context("Failed to remove token")?;
                self.store.add_log("Logged out");
                "Logged out".to_string()
            }
            Command::Register {
                username,
                password,
                nickname,
            } => {
                let request = RegisterRequest {
                    username,
                    password,
                    nickname,
                };
                let player = track(&mut self.store, self.api.register(&request).await)
                    .context("Registration failed")?;
                format!(
                    "Registered {} (id {}, {} chips)",
                    player.display_name(),
                    player.id,
                    player.chips
                )
            }
            Command::Player(player_id) => {
                let player = track(&mut self.store, self.api.get_player(player_id).await)?;
                format!(
                    "#{} {} - level {} - ${}",
                    player.id,
                    player.display_name(),
                    player.level,
                    player.chips
                )
            }
            Command::Stats(player_id) => {
                let stats = track(&mut self.store, self.api.get_player_stats(player_id).await)?;
                format!(
                    "games {} / hands {} / wins {}\nVPIP {:.1}%  PFR {:.1}%  AF {:.2}\nwin rate {:.1}%  profit ${}",
                    stats.total_games,
                    stats.total_hands,
                    stats.wins,
                    stats.vpip,
                    stats.pfr,
                    stats.af,
                    stats.win_rate,
                    stats.total_profit
                )
            }
            Command::Profile(player_id) => {
                pretty(&track(&mut self.store, self.api.get_player_profile(player_id).await)?)
            }
            Command::Players { skip, limit } => {
                let query = PlayerQuery { skip, limit };
                let list = track(&mut self.store, self.api.list_players(&query).await)?;
                let mut lines: Vec<String> = list
                    .players
                    .iter()
                    .map(|p| format!("  #{} {} - ${}", p.id, p.display_name(), p.chips))
                    .collect();
                lines.insert(0, format!("{} players:", list.total));
                lines.join("\n")
            }
            Command::Games { status } => {
                let query = GameQuery {
                    status,
                    ..GameQuery::default()
                };
                pretty(&track(&mut self.store, self.api.list_games(&query).await)?)
            }
            Command::GameStats => pretty(&track(&mut self.store, self.api.get_game_stats().await)?),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Continue(text))
    }

    /// Fetch a game and make it the held session.
    ///
    /// The previous session, its hidden cards and the log are only dropped
    /// once the fetch succeeded.
    async fn load(&mut self, game_id: &str) -> Result<()> {
        let game = track(&mut self.store, self.api.get_game(game_id).await)
            .with_context(|| format!("Failed to load game {}", game_id))?;
        self.store.clear_game();
        self.store.set_game(Some(game));
        Ok(())
    }

    /// Re-fetch the held game and merge it, dropping the result if stale.
    async fn refresh(&mut self, game_id: &str) -> Result<()> {
        let ticket = self.store.ticket();
        let game: GameSession = track(&mut self.store, self.api.get_game(game_id).await)
            .context("Failed to refresh game")?;
        if !self.store.apply_update(&ticket, game) {
            tracing::debug!(game_id = game_id, "Discarded stale refresh");
        }
        Ok(())
    }

    /// Merge a game state embedded in a simulation response, falling back
    /// to a refresh when the response carries none.
    async fn merge_embedded(
        &mut self,
        game_id: &str,
        ticket: &UpdateTicket,
        state: &Value,
    ) -> Result<()> {
        match serde_json::from_value::<GameSession>(state.clone()) {
            Ok(game) if !state.is_null() => {
                if !self.store.apply_update(ticket, game) {
                    tracing::debug!(game_id = game_id, "Discarded stale simulation state");
                }
                Ok(())
            }
            _ => self.refresh(game_id).await,
        }
    }

    fn active_game_id(&self) -> Result<String> {
        self.store
            .session_id()
            .map(str::to_string)
            .context("No active game; use 'new' or 'load <game_id>' first")
    }
}

/// Mirror the transport outcome of a request into the connection flag.
fn track<T>(store: &mut GameStore, result: ApiResult<T>) -> ApiResult<T> {
    match &result {
        Ok(_) => store.set_connected(true),
        Err(e) if e.is_transport() => store.set_connected(false),
        // The service answered, so it is reachable
        Err(_) => store.set_connected(true),
    }
    result
}

fn describe_step(step: &Value) -> String {
    match (step.get("player_id"), step.get("action")) {
        (Some(player), Some(Value::String(action))) => {
            match step.get("amount").and_then(Value::as_f64) {
                Some(amount) if amount > 0.0 => {
                    format!("AI player {} {} {}", player, action, amount)
                }
                _ => format!("AI player {} {}", player, action),
            }
        }
        _ => format!("AI step: {}", step),
    }
}

/// One log line naming the winners of an auto-played hand.
fn describe_winners(winners: &Value) -> Option<String> {
    let winners = winners.as_array().filter(|w| !w.is_empty())?;
    let names: Vec<String> = winners
        .iter()
        .map(|winner| {
            let player = winner
                .get("player_id")
                .map_or_else(|| winner.to_string(), Value::to_string);
            match (
                winner.get("hand_description").and_then(Value::as_str),
                winner.get("winnings").and_then(Value::as_f64),
            ) {
                (Some(hand), Some(won)) => format!("player {} ({}, ${})", player, hand, won),
                (Some(hand), None) => format!("player {} ({})", player, hand),
                (None, Some(won)) => format!("player {} (${})", player, won),
                (None, None) => format!("player {}", player),
            }
        })
        .collect();
    Some(format!("Winners: {}", names.join(", ")))
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_step() {
        assert_eq!(
            describe_step(&json!({"player_id": 2, "action": "raise", "amount": 8.0})),
            "AI player 2 raise 8"
        );
        assert_eq!(
            describe_step(&json!({"player_id": 2, "action": "check", "amount": 0})),
            "AI player 2 check"
        );
        assert!(describe_step(&json!({"message": "done"})).starts_with("AI step: "));
    }

    #[test]
    fn test_describe_winners() {
        assert_eq!(describe_winners(&json!([])), None);
        assert_eq!(describe_winners(&Value::Null), None);
        assert_eq!(
            describe_winners(&json!([
                {"player_id": 2, "hand_description": "Two Pair", "winnings": 40.0},
                {"player_id": 3}
            ])),
            Some("Winners: player 2 (Two Pair, $40), player 3".to_string())
        );
    }

    #[test]
    fn test_pretty() {
        assert_eq!(pretty(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }
}
