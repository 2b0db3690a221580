//! REST query client for the listing queries

use crate::session::Session;
use omni_core::{OmniError, Result};
use serde::Deserialize;
use tracing::debug;

const API_VERSION: &str = "v60.0";

/// One row of a listing query
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRow {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "UniqueName")]
    pub unique_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    records: Vec<QueryRow>,
    #[serde(rename = "nextRecordsUrl")]
    next_records_url: Option<String>,
}

/// Thin client over the org's REST query endpoint
pub struct RestClient {
    session: Session,
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            http: reqwest::Client::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run a SOQL query, following pagination until all rows are collected
    pub async fn query(&self, soql: &str) -> Result<Vec<QueryRow>> {
        debug!("Query: {}", soql);

        let url = format!(
            "{}/services/data/{}/query",
            self.session.instance_url, API_VERSION
        );
        let mut response: QueryResponse = self
            .get_json(self.http.get(&url).query(&[("q", soql)]))
            .await?;
        let mut rows = std::mem::take(&mut response.records);

        while let Some(next) = response.next_records_url.take() {
            let url = format!("{}{}", self.session.instance_url, next);
            response = self.get_json(self.http.get(&url)).await?;
            rows.append(&mut response.records);
        }

        debug!("Query returned {} rows", rows.len());
        Ok(rows)
    }

    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<QueryResponse> {
        let response = request
            .bearer_auth(&self.session.access_token)
            .send()
            .await
            .map_err(|e| OmniError::Query(format!("Failed to send query: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            return Err(OmniError::Query(format!(
                "Query endpoint returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OmniError::Query(format!("Failed to decode query response: {}", e)))
    }
}
