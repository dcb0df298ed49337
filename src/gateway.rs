//! HTTP boundary to the clustering backend.
//!
//! Every call is a blocking one-shot request; the orchestrator runs them
//! off the UI thread. Transport and decoding failures are folded into
//! [`GatewayError`] so nothing from `ureq` or `serde_json` leaks upward.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{
    AlgorithmId, ClusterId, ClusterProfile, ClusterSet, CustomerAttributes,
    FeatureCatalog, FeatureStats, FeatureSummary, Point, PredictionResult,
    VisualizationPayload,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// Connection failure, timeout, or a non-2xx status.
    #[error("network error: {0}")]
    Network(String),
    /// Body absent, not JSON, or not the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Well-formed visualization response without any points.
    #[error("no visualization data received")]
    EmptyResult,
    /// Prediction input rejected by the backend.
    #[error("rejected by backend: {0}")]
    Validation(String),
}

/// Contract consumed from the clustering service.
pub trait Gateway: Send + Sync {
    fn feature_summary(&self) -> Result<FeatureSummary, GatewayError>;

    fn clusters(
        &self,
        algorithm: AlgorithmId,
    ) -> Result<ClusterSet, GatewayError>;

    fn visualization(
        &self,
        algorithm: AlgorithmId,
    ) -> Result<VisualizationPayload, GatewayError>;

    fn predict(
        &self,
        input: &CustomerAttributes,
        algorithm: AlgorithmId,
    ) -> Result<PredictionResult, GatewayError>;
}

// ------------------------------------------------------------------
// Wire structures
// ------------------------------------------------------------------

#[derive(Deserialize)]
struct ClustersResponse {
    #[serde(default)]
    algorithm: Option<AlgorithmId>,
    clusters: BTreeMap<ClusterId, ClusterProfile>,
}

#[derive(Deserialize)]
struct VisualizationResponse {
    points: Vec<Point>,
    #[serde(default)]
    explained_variance: Option<[f64; 2]>,
}

#[derive(Serialize)]
struct VisualizationRequest {
    algorithm: AlgorithmId,
}

/// The backend reads `Age` with a capital letter.
#[derive(Serialize)]
struct PredictRequest {
    #[serde(rename = "Age")]
    age: f64,
    income: f64,
    spending: f64,
    gender: u8,
    algorithm: AlgorithmId,
}

impl PredictRequest {
    fn new(input: &CustomerAttributes, algorithm: AlgorithmId) -> Self {
        Self {
            age: input.age,
            income: input.income,
            spending: input.spending_score,
            gender: u8::from(input.is_male),
            algorithm,
        }
    }
}

#[derive(Deserialize)]
struct PredictResponse {
    predicted_cluster: ClusterId,
    cluster_profile: Option<ClusterProfile>,
    #[serde(default)]
    algorithm: Option<AlgorithmId>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

// ------------------------------------------------------------------
// Decoding
// ------------------------------------------------------------------

fn parse<'a, T: Deserialize<'a>>(
    body: &'a str,
    what: &str,
) -> Result<T, GatewayError> {
    serde_json::from_str(body)
        .map_err(|e| GatewayError::Decode(format!("{what}: {e}")))
}

pub fn decode_feature_summary(
    catalog_body: &str,
    summary_body: &str,
) -> Result<FeatureSummary, GatewayError> {
    let catalog: FeatureCatalog = parse(catalog_body, "feature catalog")?;
    let stats: BTreeMap<String, FeatureStats> =
        parse(summary_body, "data summary")?;
    Ok(FeatureSummary { catalog, stats })
}

pub fn decode_clusters(body: &str) -> Result<ClusterSet, GatewayError> {
    let response: ClustersResponse = parse(body, "cluster set")?;
    Ok(ClusterSet::new(response.algorithm, response.clusters))
}

/// An empty point list is reported as [`GatewayError::EmptyResult`].
pub fn decode_visualization(
    body: &str,
) -> Result<VisualizationPayload, GatewayError> {
    let response: VisualizationResponse = parse(body, "visualization")?;
    if response.points.is_empty() {
        return Err(GatewayError::EmptyResult);
    }
    Ok(VisualizationPayload {
        points: response.points,
        explained_variance: response.explained_variance,
    })
}

pub fn decode_prediction(
    body: &str,
    requested: AlgorithmId,
) -> Result<PredictionResult, GatewayError> {
    let response: PredictResponse = parse(body, "prediction")?;
    let cluster_profile = response.cluster_profile.ok_or_else(|| {
        GatewayError::Decode(format!(
            "prediction for cluster {} has no profile",
            response.predicted_cluster
        ))
    })?;
    Ok(PredictionResult {
        predicted_cluster: response.predicted_cluster,
        cluster_profile,
        algorithm: response.algorithm.unwrap_or(requested),
    })
}

/// Message carried in a failed response: the `error` field if present,
/// otherwise the raw body.
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(msg) }) => msg,
        _ if body.trim().is_empty() => format!("HTTP {status}"),
        _ => body.trim().to_string(),
    }
}

// ------------------------------------------------------------------
// HTTP transport
// ------------------------------------------------------------------

enum HttpFailure {
    Status { code: u16, body: String },
    Transport(String),
}

impl HttpFailure {
    fn into_network(self) -> GatewayError {
        match self {
            HttpFailure::Status { code, body } => GatewayError::Network(
                format!("HTTP {code}: {}", error_message(code, &body)),
            ),
            HttpFailure::Transport(msg) => GatewayError::Network(msg),
        }
    }

    fn into_validation(self) -> GatewayError {
        match self {
            HttpFailure::Status { code, body } => {
                GatewayError::Validation(error_message(code, &body))
            }
            HttpFailure::Transport(msg) => GatewayError::Network(msg),
        }
    }
}

fn read_response(
    result: Result<ureq::Response, ureq::Error>,
    url: &str,
) -> Result<String, HttpFailure> {
    match result {
        Ok(response) => {
            let status = response.status();
            debug!(url = %url, status, "response received");
            let body = response.into_string().map_err(|e| {
                HttpFailure::Transport(format!(
                    "failed to read response body: {e}"
                ))
            })?;
            // ureq only reports 4xx/5xx as errors; an unfollowed 3xx or
            // a 1xx lands here.
            if !(200..300).contains(&status) {
                warn!(url = %url, status, "non-success status");
                return Err(HttpFailure::Status { code: status, body });
            }
            Ok(body)
        }
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            warn!(url = %url, status = code, "request failed");
            Err(HttpFailure::Status { code, body })
        }
        Err(e) => {
            warn!(url = %url, error = %e, "transport failure");
            Err(HttpFailure::Transport(e.to_string()))
        }
    }
}

/// [`Gateway`] backed by the Flask JSON API.
pub struct HttpGateway {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, HttpFailure> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(key, value);
        }
        read_response(request.call(), &url)
    }

    fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, HttpFailure> {
        let url = self.url(path);
        let json = serde_json::to_string(body).map_err(|e| {
            HttpFailure::Transport(format!("failed to encode request: {e}"))
        })?;
        debug!(url = %url, "POST");
        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&json);
        read_response(result, &url)
    }
}

impl Gateway for HttpGateway {
    fn feature_summary(&self) -> Result<FeatureSummary, GatewayError> {
        let catalog =
            self.get("features", &[]).map_err(HttpFailure::into_network)?;
        let summary = self
            .get("data-summary", &[])
            .map_err(HttpFailure::into_network)?;
        decode_feature_summary(&catalog, &summary)
    }

    fn clusters(
        &self,
        algorithm: AlgorithmId,
    ) -> Result<ClusterSet, GatewayError> {
        let body = self
            .get("clusters", &[("algorithm", algorithm.as_str())])
            .map_err(HttpFailure::into_network)?;
        decode_clusters(&body)
    }

    fn visualization(
        &self,
        algorithm: AlgorithmId,
    ) -> Result<VisualizationPayload, GatewayError> {
        let body = self
            .post("visualize", &VisualizationRequest { algorithm })
            .map_err(HttpFailure::into_network)?;
        decode_visualization(&body)
    }

    fn predict(
        &self,
        input: &CustomerAttributes,
        algorithm: AlgorithmId,
    ) -> Result<PredictionResult, GatewayError> {
        let body = self
            .post("predict", &PredictRequest::new(input, algorithm))
            .map_err(HttpFailure::into_validation)?;
        decode_prediction(&body, algorithm)
    }
}
