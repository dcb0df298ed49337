use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ------------------------------------------------------------------
// Algorithm selection
// ------------------------------------------------------------------

/// Clustering model served by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmId {
    #[default]
    Agglomerative,
    Divisive,
    Dbscan,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 3] = [
        AlgorithmId::Agglomerative,
        AlgorithmId::Divisive,
        AlgorithmId::Dbscan,
    ];

    /// Identifier used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::Agglomerative => "agglomerative",
            AlgorithmId::Divisive => "divisive",
            AlgorithmId::Dbscan => "dbscan",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AlgorithmId::Agglomerative => "Agglomerative Clustering",
            AlgorithmId::Divisive => "Divisive Clustering",
            AlgorithmId::Dbscan => "DBSCAN",
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown algorithm '{0}' (expected agglomerative, divisive or dbscan)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for AlgorithmId {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmId::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

// ------------------------------------------------------------------
// Clusters
// ------------------------------------------------------------------

/// Cluster label. DBSCAN marks noise points with `-1`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
)]
#[serde(transparent)]
pub struct ClusterId(pub i32);

impl ClusterId {
    pub const NOISE: ClusterId = ClusterId(-1);

    pub fn is_noise(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregate statistics of one cluster under the selected algorithm.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClusterProfile {
    pub size: u64,
    pub percentage: f64,
    #[serde(default)]
    pub features: BTreeMap<String, f64>,
}

impl ClusterProfile {
    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }
}

/// All non-noise clusters of one algorithm, ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSet {
    pub algorithm: Option<AlgorithmId>,
    clusters: BTreeMap<ClusterId, ClusterProfile>,
}

impl ClusterSet {
    pub fn new(
        algorithm: Option<AlgorithmId>,
        clusters: BTreeMap<ClusterId, ClusterProfile>,
    ) -> Self {
        Self {
            algorithm,
            clusters,
        }
    }

    pub fn get(&self, id: ClusterId) -> Option<&ClusterProfile> {
        self.clusters.get(&id)
    }

    pub fn contains(&self, id: ClusterId) -> bool {
        self.clusters.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.keys().copied()
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (ClusterId, &ClusterProfile)> + '_ {
        self.clusters.iter().map(|(id, p)| (*id, p))
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of customers assigned to a cluster (noise excluded).
    pub fn total_size(&self) -> u64 {
        self.clusters.values().map(|p| p.size).sum()
    }

    pub fn percentage_sum(&self) -> f64 {
        self.clusters.values().map(|p| p.percentage).sum()
    }
}

// ------------------------------------------------------------------
// Feature metadata
// ------------------------------------------------------------------

/// Output of `/api/features`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureCatalog {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub n_features: usize,
    #[serde(default)]
    pub n_samples: usize,
    #[serde(default)]
    pub algorithms: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FeatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    #[serde(default)]
    pub std: f64,
}

impl FeatureStats {
    /// Value an input widget starts from.
    pub fn default_value(&self) -> f64 {
        self.mean
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSummary {
    pub catalog: FeatureCatalog,
    pub stats: BTreeMap<String, FeatureStats>,
}

impl FeatureSummary {
    pub fn get(&self, feature: &str) -> Option<&FeatureStats> {
        self.stats.get(feature)
    }

    pub fn sample_count(&self) -> usize {
        self.catalog.n_samples
    }
}

// ------------------------------------------------------------------
// Projection
// ------------------------------------------------------------------

/// One customer projected onto the first two principal components.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub cluster: ClusterId,
}

impl Point {
    pub fn new(x: f64, y: f64, cluster: i32) -> Self {
        Self {
            x,
            y,
            cluster: ClusterId(cluster),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualizationPayload {
    pub points: Vec<Point>,
    /// Variance ratio explained by each of the two components, in [0, 1].
    pub explained_variance: Option<[f64; 2]>,
}

// ------------------------------------------------------------------
// Prediction
// ------------------------------------------------------------------

/// Attributes of a hypothetical customer submitted for prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerAttributes {
    pub age: f64,
    pub income: f64,
    pub spending_score: f64,
    pub is_male: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub predicted_cluster: ClusterId,
    pub cluster_profile: ClusterProfile,
    /// Algorithm the prediction was made under.
    pub algorithm: AlgorithmId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_parses_case_insensitively() {
        assert_eq!(
            "DBSCAN".parse::<AlgorithmId>().unwrap(),
            AlgorithmId::Dbscan
        );
        assert_eq!(
            " divisive ".parse::<AlgorithmId>().unwrap(),
            AlgorithmId::Divisive
        );
        assert!("kmeans".parse::<AlgorithmId>().is_err());
    }

    #[test]
    fn test_algorithm_wire_names_round_trip_through_display() {
        for algorithm in AlgorithmId::ALL {
            let text = algorithm.to_string();
            assert_eq!(text.parse::<AlgorithmId>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_cluster_set_totals() {
        let mut clusters = BTreeMap::new();
        clusters.insert(
            ClusterId(0),
            ClusterProfile {
                size: 120,
                percentage: 60.0,
                features: BTreeMap::new(),
            },
        );
        clusters.insert(
            ClusterId(1),
            ClusterProfile {
                size: 80,
                percentage: 40.0,
                features: BTreeMap::new(),
            },
        );
        let set = ClusterSet::new(Some(AlgorithmId::Agglomerative), clusters);

        assert_eq!(set.total_size(), 200);
        assert!((set.percentage_sum() - 100.0).abs() < 1e-9);
        assert_eq!(
            set.ids().collect::<Vec<_>>(),
            vec![ClusterId(0), ClusterId(1)]
        );
        assert!(!set.contains(ClusterId::NOISE));
    }
}
