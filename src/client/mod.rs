//! HTTP client for the flashcard API.
//!
//! Every call returns [`ClientResult`]: transport problems, server-reported
//! failures and malformed responses all surface as one [`ClientError`] type
//! carrying a message that can be shown to the user as is.

pub mod study;

use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::api::envelope::ApiResponse;
use crate::api::health::HealthResponse;
use crate::models::{Deck, Flashcard};

pub use study::{StudySession, StudyStats};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const NETWORK_ERROR_MESSAGE: &str =
    "Network error - please check your connection and ensure the server is running";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request was sent but no response came back (refused, timed out, ...)
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl ClientError {
    /// Human-readable message for the presentation layer
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Builds a server error from a failure envelope, folding field messages
    /// into the message: `"Validation failed: Question is required, ..."`.
    fn from_envelope(status: StatusCode, envelope: Option<ApiResponse<serde_json::Value>>) -> Self {
        let (message, errors) = match envelope {
            Some(envelope) => (envelope.message, envelope.errors.unwrap_or_default()),
            None => (None, Vec::new()),
        };
        let message = message.unwrap_or_else(|| "An error occurred".to_string());

        let message = if errors.is_empty() {
            message
        } else {
            let details: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            format!("{}: {}", message, details.join(", "))
        };

        ClientError::Server { status, message }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            ClientError::Network(err)
        } else {
            ClientError::Unexpected(err.to_string())
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Body for creating or updating a deck
#[derive(Debug, Clone, Serialize)]
pub struct DeckInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for creating a flashcard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    pub question: String,
    pub answer: String,
    pub deck_id: Uuid,
}

/// Body for updating a flashcard
#[derive(Debug, Clone, Serialize)]
pub struct FlashcardInput {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone)]
pub struct FlashcardClient {
    client: reqwest::Client,
    base_url: String,
}

impl FlashcardClient {
    /// Creates a client for an API rooted at `base_url` (e.g. `http://host:5000/api`)
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        tracing::debug!(%method, %path, "API request");

        let response = request.send().await.map_err(|e| {
            tracing::error!(%method, %path, error = %e, "API request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let envelope = serde_json::from_slice(&body).ok();
            let err = ClientError::from_envelope(status, envelope);
            tracing::warn!(%method, %path, status = status.as_u16(), error = %err, "API error response");
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Unexpected(e.to_string()))
    }

    async fn data<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        self.send::<T>(method, path, request)
            .await?
            .data
            .ok_or_else(|| ClientError::Unexpected("response carried no data".to_string()))
    }

    async fn no_data(&self, method: &str, path: &str, request: RequestBuilder) -> ClientResult<()> {
        self.send::<serde_json::Value>(method, path, request).await?;
        Ok(())
    }

    // Decks

    pub async fn list_decks(&self) -> ClientResult<Vec<Deck>> {
        let path = "/decks";
        self.data("GET", path, self.client.get(self.url(path))).await
    }

    pub async fn get_deck(&self, id: Uuid) -> ClientResult<Deck> {
        let path = format!("/decks/{}", id);
        self.data("GET", &path, self.client.get(self.url(&path))).await
    }

    pub async fn create_deck(&self, input: &DeckInput) -> ClientResult<Deck> {
        let path = "/decks";
        self.data("POST", path, self.client.post(self.url(path)).json(input))
            .await
    }

    pub async fn update_deck(&self, id: Uuid, input: &DeckInput) -> ClientResult<Deck> {
        let path = format!("/decks/{}", id);
        self.data("PUT", &path, self.client.put(self.url(&path)).json(input))
            .await
    }

    pub async fn delete_deck(&self, id: Uuid) -> ClientResult<()> {
        let path = format!("/decks/{}", id);
        self.no_data("DELETE", &path, self.client.delete(self.url(&path)))
            .await
    }

    // Flashcards

    pub async fn list_flashcards_by_deck(&self, deck_id: Uuid) -> ClientResult<Vec<Flashcard>> {
        let path = format!("/flashcards/deck/{}", deck_id);
        self.data("GET", &path, self.client.get(self.url(&path))).await
    }

    pub async fn get_flashcard(&self, id: Uuid) -> ClientResult<Flashcard> {
        let path = format!("/flashcards/{}", id);
        self.data("GET", &path, self.client.get(self.url(&path))).await
    }

    pub async fn create_flashcard(&self, input: &NewFlashcard) -> ClientResult<Flashcard> {
        let path = "/flashcards";
        self.data("POST", path, self.client.post(self.url(path)).json(input))
            .await
    }

    pub async fn update_flashcard(
        &self,
        id: Uuid,
        input: &FlashcardInput,
    ) -> ClientResult<Flashcard> {
        let path = format!("/flashcards/{}", id);
        self.data("PUT", &path, self.client.put(self.url(&path)).json(input))
            .await
    }

    pub async fn delete_flashcard(&self, id: Uuid) -> ClientResult<()> {
        let path = format!("/flashcards/{}", id);
        self.no_data("DELETE", &path, self.client.delete(self.url(&path)))
            .await
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let path = "/health";
        self.data("GET", path, self.client.get(self.url(path))).await
    }

    /// Loads a deck's cards into a fresh study session
    pub async fn start_study(&self, deck_id: Uuid) -> ClientResult<StudySession> {
        let cards = self.list_flashcards_by_deck(deck_id).await?;
        Ok(StudySession::new(cards))
    }
}
