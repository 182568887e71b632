use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::error::IngestError;

const REQUEST_TIMEOUT_SECS: u64 = 20;
const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Combined-document endpoint; `{id}` is the external game id.
pub const DEFAULT_BASE_URL: &str =
    "https://www.handball.net/a/sportdata/1/games/handball4all.westfalen.{id}/combined?";

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client, reqwest::Error> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
    })
}

/// Source of raw game documents. The orchestrator only depends on this
/// seam, so tests can feed canned documents without a network.
pub trait GameFetcher {
    fn fetch_raw(&self, game_id: &str) -> Result<String, IngestError>;
}

#[derive(Debug, Clone)]
pub struct HttpGameFetcher {
    base_url: String,
}

impl HttpGameFetcher {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn game_url(&self, game_id: &str) -> String {
        self.base_url.replace("{id}", game_id)
    }
}

impl Default for HttpGameFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GameFetcher for HttpGameFetcher {
    fn fetch_raw(&self, game_id: &str) -> Result<String, IngestError> {
        let client = http_client().map_err(|err| IngestError::fetch(game_id, err))?;
        let resp = client
            .get(self.game_url(game_id))
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .map_err(|err| IngestError::fetch(game_id, err))?
            .error_for_status()
            .map_err(|err| IngestError::fetch(game_id, err))?;
        resp.text().map_err(|err| IngestError::fetch(game_id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::HttpGameFetcher;

    #[test]
    fn game_url_substitutes_id() {
        let fetcher = HttpGameFetcher::new();
        assert_eq!(
            fetcher.game_url("7504381"),
            "https://www.handball.net/a/sportdata/1/games/handball4all.westfalen.7504381/combined?"
        );
    }
}
