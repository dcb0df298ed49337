use crate::interpretation::{FEATURE_AGE, FEATURE_INCOME, FEATURE_SPENDING};
use crate::model::{ClusterId, ClusterProfile, ClusterSet, FeatureStats};

/// One line of the cluster comparison table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub cluster: ClusterId,
    pub size: u64,
    pub percentage: f64,
    pub avg_age: Option<f64>,
    pub avg_income: Option<f64>,
    pub avg_spending: Option<f64>,
}

impl SummaryRow {
    fn new(cluster: ClusterId, profile: &ClusterProfile) -> Self {
        Self {
            cluster,
            size: profile.size,
            percentage: profile.percentage,
            avg_age: profile.feature(FEATURE_AGE),
            avg_income: profile.feature(FEATURE_INCOME),
            avg_spending: profile.feature(FEATURE_SPENDING),
        }
    }
}

/// Rows in ascending cluster id order.
pub fn summary_rows(clusters: &ClusterSet) -> Vec<SummaryRow> {
    clusters
        .iter()
        .map(|(id, profile)| SummaryRow::new(id, profile))
        .collect()
}

/// Two decimals, or "N/A" for a missing feature.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Footer under the table. Noise points belong to no cluster, so the
/// share can stay below 100%.
pub fn coverage_caption(clusters: &ClusterSet) -> String {
    format!(
        "{} customers in {} clusters, {:.1}% of the dataset",
        clusters.total_size(),
        clusters.len(),
        clusters.percentage_sum()
    )
}

/// Dataset range shown under an input slider.
pub fn feature_hint(stats: &FeatureStats) -> String {
    format!(
        "dataset: {:.0} to {:.0}, mean {:.1}, sd {:.1}",
        stats.min,
        stats.max,
        stats.default_value(),
        stats.std
    )
}
