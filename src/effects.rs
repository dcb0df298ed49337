use std::panic::{self, AssertUnwindSafe};
use tracing::error;

use crate::gateway::{Gateway, GatewayError};
use crate::model::{
    AlgorithmId, ClusterSet, CustomerAttributes, FeatureSummary,
    PredictionResult, VisualizationPayload,
};

/// Identifies the selection a selection-dependent fetch was issued for.
/// The generation grows on every observed selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub algorithm: AlgorithmId,
    pub generation: u64,
}

/// Deferred gateway calls that must run outside the main reducer
#[derive(Debug, Clone)]
pub enum Effect {
    /// Load feature catalog and data summary
    FetchFeatureSummary,
    /// Load per-cluster statistics for the ticket's algorithm
    FetchClusters { ticket: Ticket },
    /// Load the 2-D projection for the ticket's algorithm
    FetchVisualization { ticket: Ticket },
    /// Predict the cluster of a hypothetical customer
    Predict {
        input: CustomerAttributes,
        algorithm: AlgorithmId,
    },
}

impl Effect {
    /// The completion this effect resolves to when it fails with `error`.
    pub fn failed(&self, error: GatewayError) -> Completion {
        match self {
            Effect::FetchFeatureSummary => {
                Completion::FeatureSummary(Err(error))
            }
            Effect::FetchClusters { ticket } => Completion::Clusters {
                ticket: *ticket,
                result: Err(error),
            },
            Effect::FetchVisualization { ticket } => Completion::Visualization {
                ticket: *ticket,
                result: Err(error),
            },
            Effect::Predict { algorithm, .. } => Completion::Prediction {
                algorithm: *algorithm,
                result: Err(error),
            },
        }
    }
}

/// Outcome of one effect, handed back to the UI thread.
#[derive(Debug)]
pub enum Completion {
    FeatureSummary(Result<FeatureSummary, GatewayError>),
    Clusters {
        ticket: Ticket,
        result: Result<ClusterSet, GatewayError>,
    },
    Visualization {
        ticket: Ticket,
        result: Result<VisualizationPayload, GatewayError>,
    },
    Prediction {
        algorithm: AlgorithmId,
        result: Result<PredictionResult, GatewayError>,
    },
}

/// Execute a single effect against the gateway. Blocks until the call
/// resolves.
pub fn run(gateway: &dyn Gateway, effect: Effect) -> Completion {
    match effect {
        Effect::FetchFeatureSummary => {
            Completion::FeatureSummary(gateway.feature_summary())
        }
        Effect::FetchClusters { ticket } => Completion::Clusters {
            ticket,
            result: gateway.clusters(ticket.algorithm),
        },
        Effect::FetchVisualization { ticket } => Completion::Visualization {
            ticket,
            result: gateway.visualization(ticket.algorithm),
        },
        Effect::Predict { input, algorithm } => Completion::Prediction {
            algorithm,
            result: gateway.predict(&input, algorithm),
        },
    }
}

/// Like [`run`], but a panicking gateway still yields a completion, as a
/// network failure of the same effect.
pub fn run_guarded(gateway: &dyn Gateway, effect: Effect) -> Completion {
    let fallback = effect.clone();
    match panic::catch_unwind(AssertUnwindSafe(|| run(gateway, effect))) {
        Ok(completion) => completion,
        Err(_) => {
            error!(effect = ?fallback, "gateway call panicked");
            fallback.failed(GatewayError::Network(
                "request aborted unexpectedly".into(),
            ))
        }
    }
}
