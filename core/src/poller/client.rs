use async_trait::async_trait;
use reqwest::Client;

use crate::prelude::{BackendError, BackendResult, CoordinateSource};
use crate::table::{endpoint_url, Coordinate, COORDINATES_ROUTE};

/// HTTP client for the coordinate endpoint.
#[derive(Debug, Clone)]
pub struct CoordinateClient {
    http: Client,
    endpoint: String,
}

impl CoordinateClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint_url(base_url, COORDINATES_ROUTE),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One GET against the coordinate endpoint. Network errors, non-2xx
    /// statuses, and undecodable bodies all surface as `BackendError`.
    pub async fn fetch_coordinate(&self) -> BackendResult<Coordinate> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|err| BackendError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| BackendError::Network(err.to_string()))?;
        Coordinate::from_json_slice(&body)
    }
}

#[async_trait]
impl CoordinateSource for CoordinateClient {
    async fn fetch(&self) -> BackendResult<Coordinate> {
        self.fetch_coordinate().await
    }
}
