//! HTTP request pipeline for the game service.
//!
//! Every call goes through one path: attach the bearer token if the
//! [`TokenSource`] has one, send, decode the JSON body on success, and on
//! failure report once through the [`ErrorReporter`] before returning the
//! error unchanged.

pub mod credentials;
pub mod errors;
pub mod models;

pub use credentials::{FileToken, NoToken, SharedToken, StaticToken, TokenSource};
pub use errors::{ApiError, ApiResult, ErrorReporter, LogReporter};
pub use models::*;

use crate::game::{GameSession, PlayerId};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API client for communicating with the game service
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    reporter: Arc<dyn ErrorReporter>,
}

impl ApiClient {
    /// Create a client that reports failures through the `log` facade.
    pub fn new(base_url: impl Into<String>, tokens: impl TokenSource + 'static) -> ApiResult<Self> {
        Self::with_reporter(base_url, tokens, LogReporter)
    }

    /// Create a client with a custom failure reporter.
    pub fn with_reporter(
        base_url: impl Into<String>,
        tokens: impl TokenSource + 'static,
        reporter: impl ErrorReporter + 'static,
    ) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            base_url,
            client,
            tokens: Arc::new(tokens),
            reporter: Arc::new(reporter),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------------
    // Games
    // ------------------------------------------------------------------------

    /// Create a new game
    pub async fn create_game(&self, request: &CreateGameRequest) -> ApiResult<GameCreated> {
        self.execute(Method::POST, "/games", |req| req.json(request))
            .await
    }

    /// Fetch the full state of a game
    pub async fn get_game(&self, game_id: &str) -> ApiResult<GameSession> {
        self.execute(Method::GET, &format!("/games/{game_id}"), |req| req)
            .await
    }

    /// Start a hand
    pub async fn start_game(&self, game_id: &str) -> ApiResult<GameStarted> {
        self.execute(Method::POST, &format!("/games/{game_id}/start"), |req| req)
            .await
    }

    /// Deal hole cards, optionally with the service's smart dealer
    pub async fn deal_cards(&self, game_id: &str, smart: bool) -> ApiResult<DealResult> {
        self.execute(Method::POST, &format!("/games/{game_id}/deal"), |req| {
            req.query(&[("smart", smart)])
        })
        .await
    }

    /// Reveal the community cards of a street
    pub async fn advance(&self, game_id: &str, street: Street) -> ApiResult<StreetCards> {
        self.execute(Method::POST, &format!("/games/{game_id}/{street}"), |req| req)
            .await
    }

    pub async fn deal_flop(&self, game_id: &str) -> ApiResult<StreetCards> {
        self.advance(game_id, Street::Flop).await
    }

    pub async fn deal_turn(&self, game_id: &str) -> ApiResult<StreetCards> {
        self.advance(game_id, Street::Turn).await
    }

    pub async fn deal_river(&self, game_id: &str) -> ApiResult<StreetCards> {
        self.advance(game_id, Street::River).await
    }

    /// Submit a player action
    pub async fn player_action(
        &self,
        game_id: &str,
        action: &PlayerActionRequest,
    ) -> ApiResult<ActionResult> {
        self.execute(Method::POST, &format!("/games/{game_id}/action"), |req| {
            req.json(action)
        })
        .await
    }

    /// Aggregate statistics across games
    pub async fn get_game_stats(&self) -> ApiResult<Value> {
        self.execute(Method::GET, "/games/stats", |req| req).await
    }

    /// List recorded games
    pub async fn list_games(&self, query: &GameQuery) -> ApiResult<Value> {
        self.execute(Method::GET, "/games/list", |req| req.query(query))
            .await
    }

    // ------------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------------

    /// Register a new account
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Player> {
        self.execute(Method::POST, "/players/register", |req| req.json(request))
            .await
    }

    /// Login with username and password
    ///
    /// The returned token is not stored; persisting it is up to the caller.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AccessToken> {
        self.execute(Method::POST, "/players/login", |req| req.json(request))
            .await
    }

    pub async fn get_player(&self, player_id: PlayerId) -> ApiResult<Player> {
        self.execute(Method::GET, &format!("/players/{player_id}"), |req| req)
            .await
    }

    pub async fn get_player_stats(&self, player_id: PlayerId) -> ApiResult<PlayerStats> {
        self.execute(Method::GET, &format!("/players/{player_id}/stats"), |req| req)
            .await
    }

    /// AI-generated profile of a player's style
    pub async fn get_player_profile(&self, player_id: PlayerId) -> ApiResult<Value> {
        self.execute(Method::GET, &format!("/players/{player_id}/profile"), |req| req)
            .await
    }

    pub async fn list_players(&self, query: &PlayerQuery) -> ApiResult<PlayerList> {
        self.execute(Method::GET, "/players", |req| req.query(query))
            .await
    }

    // ------------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------------

    /// Let the service play a whole hand with AI players
    ///
    /// `speed` is a multiplier on the service's pacing (2.0 is twice as fast).
    pub async fn auto_play(&self, game_id: &str, speed: f64) -> ApiResult<Value> {
        self.execute(
            Method::POST,
            &format!("/simulation/{game_id}/auto-play"),
            |req| req.query(&[("speed", speed)]),
        )
        .await
    }

    /// Let the current player take a single AI decision
    pub async fn single_ai_action(&self, game_id: &str) -> ApiResult<Value> {
        self.execute(
            Method::POST,
            &format!("/simulation/{game_id}/single-action"),
            |req| req,
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    /// Build a request with the bearer token attached when one is available.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T, F>(&self, method: Method, path: &str, build: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        log::debug!("{} {}", method, path);

        let request = build(self.request(method.clone(), path));
        let result = dispatch(request).await;

        if let Err(e) = &result {
            self.reporter.report(&method, path, e);
        }

        result
    }
}

async fn dispatch<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
    let response = request.send().await.map_err(ApiError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
        return Err(ApiError::service(status, body));
    }

    response.json::<T>().await.map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/api/", NoToken).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_new_rejects_malformed_url() {
        let result = ApiClient::new("not-a-valid-url", NoToken);
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_request_attaches_bearer_token() {
        let client = ApiClient::new(DEFAULT_BASE_URL, StaticToken("abc".to_string())).unwrap();
        let request = client.request(Method::GET, "/games/g1").build().unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:8000/api/games/g1");
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
    }

    #[test]
    fn test_request_without_token_has_no_header() {
        let client = ApiClient::new(DEFAULT_BASE_URL, NoToken).unwrap();
        let request = client.request(Method::GET, "/games/stats").build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_request_reads_token_each_time() {
        let tokens = SharedToken::new();
        let client = ApiClient::new(DEFAULT_BASE_URL, tokens.clone()).unwrap();

        let before = client.request(Method::GET, "/players/1").build().unwrap();
        assert!(before.headers().get(reqwest::header::AUTHORIZATION).is_none());

        tokens.set("fresh");
        let after = client.request(Method::GET, "/players/1").build().unwrap();
        assert_eq!(
            after.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer fresh"
        );
    }
}
