use eframe::egui::Vec2;

use crate::projection::{Drawing, render};
use crate::store::Store;
use crate::summary::{SummaryRow, summary_rows};
use crate::versioned::Memoized;

pub struct Cache {
    /// Keyed on the payload and prediction versions, so the randomly
    /// placed prediction marker only moves when either of them changes.
    pub projection: Memoized<Store, (u64, u64), Option<Drawing>>,
    pub summary_rows: Memoized<Store, u64, Vec<SummaryRow>>,
}

impl Cache {
    pub fn new(canvas: Vec2) -> Self {
        let projection = Memoized::new(
            |s: &Store| (s.visualization_version(), s.prediction_version()),
            move |s: &Store| {
                s.visualization().map(|payload| {
                    render(canvas, payload, s.prediction(), &mut rand::rng())
                })
            },
        );

        let summary_rows = Memoized::new(
            |s: &Store| s.clusters_version(),
            |s: &Store| s.clusters().map(summary_rows).unwrap_or_default(),
        );

        Self {
            projection,
            summary_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AlgorithmId, ClusterId, ClusterProfile, Point, PredictionResult,
        VisualizationPayload,
    };
    use eframe::egui::vec2;

    fn payload() -> VisualizationPayload {
        VisualizationPayload {
            points: vec![Point::new(0.0, 0.0, 0), Point::new(3.0, 2.0, 1)],
            explained_variance: None,
        }
    }

    fn prediction(cluster: i32) -> PredictionResult {
        PredictionResult {
            predicted_cluster: ClusterId(cluster),
            cluster_profile: ClusterProfile {
                size: 1,
                percentage: 1.0,
                features: Default::default(),
            },
            algorithm: AlgorithmId::Agglomerative,
        }
    }

    #[test]
    fn test_projection_absent_until_payload() {
        let store = Store::new(AlgorithmId::Agglomerative);
        let mut cache = Cache::new(vec2(500.0, 400.0));
        assert!(cache.projection.get(&store).is_none());
    }

    #[test]
    fn test_marker_stable_until_prediction_changes() {
        let mut store = Store::new(AlgorithmId::Agglomerative);
        let mut cache = Cache::new(vec2(500.0, 400.0));
        store.commit_visualization(payload());
        store.commit_prediction(prediction(1));

        let first = cache.projection.get(&store).clone().unwrap();
        let again = cache.projection.get(&store).clone().unwrap();
        assert_eq!(first.marker, again.marker);
        let version = cache.projection.version();

        store.commit_prediction(prediction(0));
        let drawing = cache.projection.get(&store).clone().unwrap();
        assert!(drawing.marker.is_some());
        assert_eq!(cache.projection.version(), version + 1);
    }

    #[test]
    fn test_summary_rows_follow_clusters() {
        let store = Store::new(AlgorithmId::Agglomerative);
        let mut cache = Cache::new(vec2(500.0, 400.0));
        assert!(cache.summary_rows.get(&store).is_empty());
    }
}
