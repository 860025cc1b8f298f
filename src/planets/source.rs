use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{Error, Result};

const PLANETS_QUERY: &str =
    "query { allPlanets { planets { name population terrains climates } } }";

const FETCH_FAILED: &str = "Failed to fetch data from SWAPI";

#[derive(Debug, Default, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<PlanetsData>,
}

#[derive(Debug, Default, Deserialize)]
struct PlanetsData {
    #[serde(default, rename = "allPlanets")]
    all_planets: Option<PlanetConnection>,
}

/// Elements stay raw so one malformed record cannot fail the whole body.
#[derive(Debug, Default, Deserialize)]
struct PlanetConnection {
    #[serde(default)]
    planets: Option<Vec<Value>>,
}

/// Client for the SWAPI GraphQL endpoint.
#[derive(Clone)]
pub struct SwapiClient {
    client: Client,
    url: String,
}

impl SwapiClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches every planet the source knows about. Missing keys in the
    /// response yield an empty list; transport failures and non-200
    /// statuses are errors.
    pub async fn fetch_planets(&self) -> Result<Vec<Value>> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "query": PLANETS_QUERY }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Planet source unreachable at {}: {e}", self.url);
                Error::Upstream(FETCH_FAILED.to_string())
            })?;

        if response.status() != StatusCode::OK {
            tracing::warn!(
                "Planet source at {} returned status {}",
                self.url,
                response.status()
            );
            return Err(Error::Upstream(FETCH_FAILED.to_string()));
        }

        let body: GraphQlResponse = response.json().await.map_err(|e| {
            tracing::warn!("Planet source returned an unreadable body: {e}");
            Error::Upstream(FETCH_FAILED.to_string())
        })?;

        Ok(body
            .data
            .and_then(|d| d.all_planets)
            .and_then(|c| c.planets)
            .unwrap_or_default())
    }
}
