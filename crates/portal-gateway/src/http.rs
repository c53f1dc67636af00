//! HTTP client for the character service.
//!
//! Wraps the JSON API with a blocking [`reqwest`] client. Calls run on the
//! runtime's task threads, so blocking here never stalls input handling.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list | `GET /api/characters` |
//! | move | `POST /api/characters/{id}/move` with `{"target_dimension": ..}` |
//! | insult | `GET /api/insults/random` |
//! | steal | `POST /api/rick-prime/steal` |
//! | image | `GET <absolute url>` |

use std::time::Duration;

use portal_model::{Character, DimensionId, DimensionalStone, EntityId};
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{GatewayError, error_message};
use crate::{Gateway, Insult, StealOutcome};

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Steal responses come either as a pair or as the bare stolen character.
#[derive(Deserialize)]
#[serde(untagged)]
enum StealBody {
    Pair {
        character: Character,
        stone: DimensionalStone,
    },
    Bare(Character),
}

impl From<StealBody> for StealOutcome {
    fn from(body: StealBody) -> Self {
        match body {
            StealBody::Pair { character, stone } => Self { character, stone },
            StealBody::Bare(character) => Self {
                stone: DimensionalStone::left_by(&character),
                character,
            },
        }
    }
}

/// HTTP client for one character service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    /// Build a client for `config.base_url`.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(client, &config.base_url)
    }

    /// Reuse an existing [`Client`] (connection pool, custom TLS).
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, GatewayError> {
        let base =
            Url::parse(base_url).map_err(|e| GatewayError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended as encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ---- private helpers ----

    /// Pass 2xx responses through; turn anything else into [`GatewayError::Api`].
    fn ensure_success(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(GatewayError::Api {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }

    fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response)?;
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl Gateway for HttpGateway {
    fn list_characters(&self) -> Result<Vec<Character>, GatewayError> {
        let url = self.endpoint(&["api", "characters"])?;
        debug!(%url, "listing characters");
        let characters: Vec<Character> = Self::parse_response(self.client.get(url).send()?)?;
        debug!(count = characters.len(), "characters listed");
        Ok(characters)
    }

    fn move_character(
        &self,
        id: &EntityId,
        target: &DimensionId,
    ) -> Result<Character, GatewayError> {
        let url = self.endpoint(&["api", "characters", id.as_str(), "move"])?;
        debug!(%id, %target, "moving character");
        let body = serde_json::json!({ "target_dimension": target });
        let response = self.client.post(url).json(&body).send()?;
        Self::parse_response(response).map_err(|e| match e {
            GatewayError::Api { status: 404, .. } => GatewayError::NotFound(id.clone()),
            other => other,
        })
    }

    fn fetch_random_insult(&self) -> Result<Insult, GatewayError> {
        let url = self.endpoint(&["api", "insults", "random"])?;
        Self::parse_response(self.client.get(url).send()?)
    }

    fn steal_random_character(&self) -> Result<StealOutcome, GatewayError> {
        let url = self.endpoint(&["api", "rick-prime", "steal"])?;
        let response = self.client.post(url).send()?;
        let body: StealBody = Self::parse_response(response).map_err(|e| match e {
            GatewayError::Api { status: 404, .. } => GatewayError::NothingToSteal,
            other => other,
        })?;
        let outcome = StealOutcome::from(body);
        debug!(id = %outcome.character.id, dimension = %outcome.stone.dimension, "character stolen");
        Ok(outcome)
    }

    fn fetch_image(&self, url: &str) -> Result<usize, GatewayError> {
        let parsed = Url::parse(url).map_err(|e| GatewayError::InvalidUrl(format!("{url}: {e}")))?;
        let response = Self::ensure_success(self.client.get(parsed).send()?)?;
        let bytes = response.bytes()?;
        if bytes.is_empty() {
            warn!(%url, "portrait body was empty");
        }
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::with_client(Client::new(), base).expect("valid base")
    }

    #[test]
    fn endpoints_join_under_base_path() {
        let gw = gateway("http://localhost:8000");
        assert_eq!(
            gw.endpoint(&["api", "characters"]).expect("url").as_str(),
            "http://localhost:8000/api/characters"
        );
        let nested = gateway("https://example.test/portal/");
        assert_eq!(
            nested
                .endpoint(&["api", "rick-prime", "steal"])
                .expect("url")
                .as_str(),
            "https://example.test/portal/api/rick-prime/steal"
        );
    }

    #[test]
    fn ids_are_path_encoded() {
        let gw = gateway("http://localhost:8000");
        let url = gw
            .endpoint(&["api", "characters", "a/b c", "move"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/characters/a%2Fb%20c/move"
        );
    }

    #[test]
    fn rejects_unusable_base() {
        assert!(matches!(
            HttpGateway::with_client(Client::new(), "not a url"),
            Err(GatewayError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpGateway::with_client(Client::new(), "mailto:rick@citadel"),
            Err(GatewayError::InvalidUrl(_))
        ));
    }

    #[test]
    fn bare_steal_body_synthesizes_stone() {
        let json = r#"{
            "id": "42", "name": "Squanchy", "species": "Cat-Person", "status": "unknown",
            "origin_dimension": "C-137", "current_dimension": "C-131",
            "image_url": null, "captured_at": "2024-01-01T00:00:00"
        }"#;
        let body: StealBody = serde_json::from_str(json).expect("decode");
        let outcome = StealOutcome::from(body);
        assert_eq!(outcome.stone.id.as_str(), "42");
        assert_eq!(outcome.stone.dimension.as_str(), "C-131");
    }

    #[test]
    fn paired_steal_body_is_kept() {
        let json = r#"{
            "character": {
                "id": "42", "name": "Squanchy", "species": "Cat-Person", "status": "unknown",
                "origin_dimension": "C-137", "current_dimension": "C-131",
                "captured_at": "2024-01-01T00:00:00"
            },
            "stone": {"id": "s-1", "dimension": "C-131", "previous_character_id": "42"}
        }"#;
        let body: StealBody = serde_json::from_str(json).expect("decode");
        let outcome = StealOutcome::from(body);
        assert_eq!(outcome.stone.id.as_str(), "s-1");
        assert_eq!(outcome.character.name, "Squanchy");
    }

    #[test]
    fn unreachable_service_is_a_request_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = Client::builder()
            .timeout(Duration::from_millis(500))
            .no_proxy()
            .build()
            .expect("client");
        let gw = HttpGateway::with_client(client, "http://127.0.0.1:9").expect("valid base");
        let err = gw.list_characters().expect_err("nothing listens there");
        assert!(matches!(err, GatewayError::Request(_)), "got {err:?}");
    }
}
