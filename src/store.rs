use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

use crate::form::CustomerForm;
use crate::model::{
    AlgorithmId, ClusterSet, FeatureSummary, PredictionResult,
    VisualizationPayload,
};
use crate::versioned::Versioned;

/// Class of remote operation an error (or success) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    FeatureSummary,
    Clusters,
    Visualization,
    Prediction,
}

impl OperationKind {
    /// Prefix of the user-facing message for a failure of this kind.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            OperationKind::FeatureSummary => "Failed to load features",
            OperationKind::Clusters => "Failed to load clusters",
            OperationKind::Visualization => "Failed to load visualization",
            OperationKind::Prediction => "Prediction error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorState {
    pub kind: OperationKind,
    pub message: String,
}

/// Single source of truth for everything the dashboard displays.
///
/// Derived entities are replaced wholesale by `commit_*`; a failure never
/// wipes them, so stale-but-valid data stays on screen.
pub struct Store {
    algorithm: AlgorithmId,
    feature_summary: Versioned<Option<FeatureSummary>>,
    clusters: Versioned<Option<ClusterSet>>,
    visualization: Versioned<Option<VisualizationPayload>>,
    prediction: Versioned<Option<PredictionResult>>,
    error: Option<ErrorState>,
    pub form: CustomerForm,
    algorithm_listeners: Vec<Sender<AlgorithmId>>,
}

impl Store {
    pub fn new(algorithm: AlgorithmId) -> Self {
        Self {
            algorithm,
            feature_summary: Versioned::new(None),
            clusters: Versioned::new(None),
            visualization: Versioned::new(None),
            prediction: Versioned::new(None),
            error: None,
            form: CustomerForm::default(),
            algorithm_listeners: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Replace the selection and notify subscribers. Selecting the
    /// current algorithm again is a no-op. Returns whether it changed.
    pub fn set_algorithm(&mut self, algorithm: AlgorithmId) -> bool {
        if self.algorithm == algorithm {
            return false;
        }
        debug!(from = %self.algorithm, to = %algorithm, "algorithm selected");
        self.algorithm = algorithm;
        self.algorithm_listeners
            .retain(|listener| listener.send(algorithm).is_ok());
        true
    }

    /// Register for selection changes. Dropping the receiver unsubscribes.
    pub fn subscribe_algorithm(&mut self) -> Receiver<AlgorithmId> {
        let (tx, rx) = mpsc::channel();
        self.algorithm_listeners.push(tx);
        rx
    }

    // ------------------------------------------------------------------
    // Commits
    // ------------------------------------------------------------------

    pub fn commit_feature_summary(&mut self, summary: FeatureSummary) {
        self.feature_summary.set(Some(summary));
        self.clear_error_of(OperationKind::FeatureSummary);
    }

    pub fn commit_clusters(&mut self, clusters: ClusterSet) {
        self.clusters.set(Some(clusters));
        self.clear_error_of(OperationKind::Clusters);
    }

    pub fn commit_visualization(&mut self, payload: VisualizationPayload) {
        self.visualization.set(Some(payload));
        self.clear_error_of(OperationKind::Visualization);
    }

    pub fn commit_prediction(&mut self, prediction: PredictionResult) {
        self.prediction.set(Some(prediction));
        self.clear_error_of(OperationKind::Prediction);
    }

    /// Record a failure. Every other slot is left untouched.
    pub fn commit_error(
        &mut self,
        kind: OperationKind,
        message: impl Into<String>,
    ) {
        let message = message.into();
        warn!(?kind, %message, "operation failed");
        self.error = Some(ErrorState { kind, message });
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn clear_error_of(&mut self, kind: OperationKind) {
        if self.error.as_ref().is_some_and(|e| e.kind == kind) {
            self.error = None;
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn feature_summary(&self) -> Option<&FeatureSummary> {
        self.feature_summary.get().as_ref()
    }

    pub fn clusters(&self) -> Option<&ClusterSet> {
        self.clusters.get().as_ref()
    }

    pub fn visualization(&self) -> Option<&VisualizationPayload> {
        self.visualization.get().as_ref()
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.get().as_ref()
    }

    pub fn error(&self) -> Option<&ErrorState> {
        self.error.as_ref()
    }

    pub fn clusters_version(&self) -> u64 {
        self.clusters.version()
    }

    pub fn visualization_version(&self) -> u64 {
        self.visualization.version()
    }

    pub fn prediction_version(&self) -> u64 {
        self.prediction.version()
    }
}
