//! REST API client for the sportsbook

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument};

use super::messages::*;
use crate::common::errors::{ClientError, Result};
use crate::common::traits::{BetPlacementApi, GameListSource, PageRequest};
use crate::common::types::{BetLeg, Bucket, Game, GameStatus, PlacementReceipt};

/// Sort direction for game list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// REST API client for the sportsbook
#[derive(Debug, Clone)]
pub struct SportsbookRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the REST API
    base_url: String,
    /// Bearer token from the auth service
    auth_token: Option<String>,
}

impl SportsbookRestClient {
    /// Create a new REST client (unauthenticated)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        })
    }

    /// Attach the session token for authenticated requests
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn expect_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::InvalidResponse(format!(
            "Server returned status {}: {}",
            status, body
        )))
    }

    // ========================================================================
    // Game Lists
    // ========================================================================

    /// Get a page of games filtered by status, ordered by match date
    #[instrument(skip(self))]
    pub async fn get_games(
        &self,
        status: GameStatus,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<Game>> {
        let url = format!("{}/games", self.base_url);
        debug!("Fetching {} games from: {}", status, url);

        let request = self.client.get(&url).query(&[
            ("status", status.to_string()),
            ("sort", "matchDate".to_string()),
            ("order", order.as_str().to_string()),
            ("page", page.page.to_string()),
            ("limit", page.limit.to_string()),
        ]);
        let response = self.authorize(request).send().await?;
        let response = Self::expect_success(response).await?;

        let games: GamesResponse = response.json().await?;
        Ok(games.into_games())
    }

    /// Upcoming games, soonest first
    pub async fn get_upcoming_games(&self, page: PageRequest) -> Result<Vec<Game>> {
        self.get_games(GameStatus::Upcoming, SortOrder::Asc, page).await
    }

    /// Finished games, most recent first
    pub async fn get_finished_games(&self, page: PageRequest) -> Result<Vec<Game>> {
        self.get_games(GameStatus::Finished, SortOrder::Desc, page).await
    }

    /// Games currently in play
    #[instrument(skip(self))]
    pub async fn get_live_feed(&self) -> Result<Vec<Game>> {
        let url = format!("{}/games/live-feed", self.base_url);
        debug!("Fetching live feed from: {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::expect_success(response).await?;

        let games: GamesResponse = response.json().await?;
        Ok(games.into_games())
    }

    // ========================================================================
    // Bet Placement (Authentication Required)
    // ========================================================================

    /// POST a placement body and map rejections to `BetRejected`
    async fn post_bet<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<PlacementReceipt> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!("Bet placement rejected with {}: {}", status, text);
            return Err(ClientError::BetRejected {
                status: status.as_u16(),
                message: ApiErrorBody::parse(&text).into_message(),
            });
        }

        let placement: BetPlacementResponse = response.json().await?;
        Ok(placement.into_receipt())
    }

    /// Place one multi bet over all legs
    #[instrument(skip(self, legs), fields(legs = legs.len()))]
    pub async fn place_multi(&self, stake: Decimal, legs: Vec<BetLeg>) -> Result<PlacementReceipt> {
        let body = MultiBetRequest {
            stake,
            selections: legs,
        };
        self.post_bet("/bets/multi", &body).await
    }

    /// Place one single per leg with the same stake
    #[instrument(skip(self, legs), fields(legs = legs.len()))]
    pub async fn place_singles(
        &self,
        stake_per_bet: Decimal,
        legs: Vec<BetLeg>,
    ) -> Result<PlacementReceipt> {
        let body = SinglesBetRequest {
            stake_per_bet,
            selections: legs,
        };
        self.post_bet("/bets/singles", &body).await
    }
}

#[async_trait]
impl GameListSource for SportsbookRestClient {
    async fn fetch_bucket(&self, bucket: Bucket, page: PageRequest) -> Result<Vec<Game>> {
        match bucket {
            Bucket::Upcoming => self.get_upcoming_games(page).await,
            Bucket::Live => self.get_live_feed().await,
            Bucket::Finished => self.get_finished_games(page).await,
        }
    }
}

#[async_trait]
impl BetPlacementApi for SportsbookRestClient {
    async fn place_multi_bet(&self, stake: Decimal, legs: Vec<BetLeg>) -> Result<PlacementReceipt> {
        self.place_multi(stake, legs).await
    }

    async fn place_single_bets(
        &self,
        stake_per_bet: Decimal,
        legs: Vec<BetLeg>,
    ) -> Result<PlacementReceipt> {
        self.place_singles(stake_per_bet, legs).await
    }
}
