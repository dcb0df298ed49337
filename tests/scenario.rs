//! Drives the dashboard state headlessly against an in-memory backend.
//! Every gateway call is held by a `DeferredSpawner` until the test
//! releases it, so completion order is fully scripted.

use cluster_dashboard::actions::Action;
use cluster_dashboard::gateway::{Gateway, GatewayError, decode_visualization};
use cluster_dashboard::interpretation::{
    FEATURE_AGE, FEATURE_INCOME, FEATURE_SPENDING,
};
use cluster_dashboard::model::{
    AlgorithmId, ClusterId, ClusterProfile, ClusterSet, CustomerAttributes,
    FeatureCatalog, FeatureStats, FeatureSummary, Point, PredictionResult,
    VisualizationPayload,
};
use cluster_dashboard::spawn::DeferredSpawner;
use cluster_dashboard::state::State;
use cluster_dashboard::store::OperationKind;
use eframe::egui::vec2;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct MemoryBackend {
    fail_predict: AtomicBool,
    fail_visualization: AtomicBool,
}

fn profile(
    size: u64,
    percentage: f64,
    age: f64,
    income: f64,
    spending: f64,
) -> ClusterProfile {
    ClusterProfile {
        size,
        percentage,
        features: BTreeMap::from([
            (FEATURE_AGE.to_string(), age),
            (FEATURE_INCOME.to_string(), income),
            (FEATURE_SPENDING.to_string(), spending),
        ]),
    }
}

fn cluster_table(
    algorithm: AlgorithmId,
) -> BTreeMap<ClusterId, ClusterProfile> {
    match algorithm {
        AlgorithmId::Dbscan => BTreeMap::from([
            (ClusterId(0), profile(112, 56.0, 40.1, 55.2, 49.3)),
            (ClusterId(1), profile(53, 26.5, 32.7, 86.5, 82.1)),
            (ClusterId(2), profile(21, 10.5, 25.3, 25.7, 79.4)),
        ]),
        _ => BTreeMap::from([
            (ClusterId(0), profile(39, 19.5, 32.7, 86.5, 82.1)),
            (ClusterId(1), profile(81, 40.5, 42.7, 55.3, 49.5)),
            (ClusterId(2), profile(22, 11.0, 25.3, 25.7, 79.4)),
            (ClusterId(3), profile(35, 17.5, 41.1, 88.2, 17.1)),
            (ClusterId(4), profile(23, 11.5, 45.2, 26.3, 20.9)),
        ]),
    }
}

/// x coordinate that identifies which algorithm a payload came from.
fn algorithm_x(algorithm: AlgorithmId) -> f64 {
    match algorithm {
        AlgorithmId::Agglomerative => 1.0,
        AlgorithmId::Divisive => 2.0,
        AlgorithmId::Dbscan => 3.0,
    }
}

impl Gateway for MemoryBackend {
    fn feature_summary(&self) -> Result<FeatureSummary, GatewayError> {
        let stats = |min: f64, max: f64, mean: f64| FeatureStats {
            min,
            max,
            mean,
            std: 1.0,
        };
        Ok(FeatureSummary {
            catalog: FeatureCatalog {
                features: vec![
                    FEATURE_AGE.to_string(),
                    FEATURE_INCOME.to_string(),
                    FEATURE_SPENDING.to_string(),
                ],
                n_features: 3,
                n_samples: 200,
                algorithms: AlgorithmId::ALL
                    .iter()
                    .map(|a| a.to_string())
                    .collect(),
            },
            stats: BTreeMap::from([
                (FEATURE_AGE.to_string(), stats(18.0, 70.0, 38.85)),
                (FEATURE_INCOME.to_string(), stats(15.0, 137.0, 60.56)),
                (FEATURE_SPENDING.to_string(), stats(1.0, 100.0, 50.2)),
            ]),
        })
    }

    fn clusters(
        &self,
        algorithm: AlgorithmId,
    ) -> Result<ClusterSet, GatewayError> {
        Ok(ClusterSet::new(Some(algorithm), cluster_table(algorithm)))
    }

    fn visualization(
        &self,
        algorithm: AlgorithmId,
    ) -> Result<VisualizationPayload, GatewayError> {
        if self.fail_visualization.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("HTTP 500: boom".into()));
        }
        let x = algorithm_x(algorithm);
        Ok(VisualizationPayload {
            points: vec![Point::new(x, 0.0, 0), Point::new(x, 1.0, 1)],
            explained_variance: Some([0.45, 0.3]),
        })
    }

    fn predict(
        &self,
        input: &CustomerAttributes,
        algorithm: AlgorithmId,
    ) -> Result<PredictionResult, GatewayError> {
        if self.fail_predict.load(Ordering::SeqCst) {
            return Err(GatewayError::Validation("Missing field: Age".into()));
        }
        let distance = |p: &ClusterProfile| {
            let d = |name: &str, v: f64| {
                (p.feature(name).unwrap_or(0.0) - v).powi(2)
            };
            d(FEATURE_AGE, input.age)
                + d(FEATURE_INCOME, input.income)
                + d(FEATURE_SPENDING, input.spending_score)
        };
        let (id, profile) = cluster_table(algorithm)
            .into_iter()
            .min_by(|a, b| distance(&a.1).total_cmp(&distance(&b.1)))
            .ok_or(GatewayError::EmptyResult)?;
        Ok(PredictionResult {
            predicted_cluster: id,
            cluster_profile: profile,
            algorithm,
        })
    }
}

fn setup() -> (State, DeferredSpawner, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::default());
    let spawner = DeferredSpawner::new();
    let state = State::new(
        AlgorithmId::Agglomerative,
        backend.clone(),
        Box::new(spawner.clone()),
        vec2(500.0, 400.0),
    );
    (state, spawner, backend)
}

fn select(state: &mut State, algorithm: AlgorithmId) {
    state.dispatch(Action::SelectAlgorithm { algorithm });
    state.step();
}

fn shown_algorithm_x(state: &State) -> Option<f64> {
    state.store.visualization().map(|p| p.points[0].x)
}

#[test]
fn test_mount_loads_everything() {
    let (mut state, spawner, _) = setup();
    state.mount();
    assert_eq!(spawner.pending(), 3);

    spawner.run_all();
    state.step();

    assert_eq!(state.store.feature_summary().unwrap().sample_count(), 200);
    assert_eq!(state.store.clusters().unwrap().len(), 5);
    assert_eq!(shown_algorithm_x(&state), Some(1.0));
    assert!(state.store.error().is_none());
    assert!(state.cache.projection.get(&state.store).is_some());
}

#[test]
fn test_rapid_switch_keeps_second_selection_in_order() {
    let (mut state, spawner, _) = setup();
    state.mount();
    spawner.run_all();
    state.step();

    select(&mut state, AlgorithmId::Divisive);
    select(&mut state, AlgorithmId::Dbscan);
    assert_eq!(spawner.pending(), 4);

    spawner.run_all();
    state.step();

    assert_eq!(shown_algorithm_x(&state), Some(3.0));
    let clusters = state.store.clusters().unwrap();
    assert_eq!(clusters.algorithm, Some(AlgorithmId::Dbscan));
}

#[test]
fn test_rapid_switch_keeps_second_selection_reversed() {
    let (mut state, spawner, _) = setup();
    state.mount();
    spawner.run_all();
    state.step();

    select(&mut state, AlgorithmId::Divisive);
    select(&mut state, AlgorithmId::Dbscan);

    spawner.run_all_newest_first();
    state.step();

    assert_eq!(shown_algorithm_x(&state), Some(3.0));
    assert_eq!(state.store.clusters().unwrap().len(), 3);
}

#[test]
fn test_switches_within_one_turn_fetch_once() {
    let (mut state, spawner, _) = setup();
    state.mount();
    spawner.run_all();
    state.step();

    state.dispatch(Action::SelectAlgorithm {
        algorithm: AlgorithmId::Divisive,
    });
    state.dispatch(Action::SelectAlgorithm {
        algorithm: AlgorithmId::Dbscan,
    });
    state.step();

    assert_eq!(spawner.pending(), 2);
    spawner.run_all();
    state.step();
    assert_eq!(shown_algorithm_x(&state), Some(3.0));
}

#[test]
fn test_prediction_failure_leaves_data_alone() {
    let (mut state, spawner, backend) = setup();
    state.mount();
    spawner.run_all();
    state.step();
    let clusters = state.store.clusters().cloned();
    let payload = state.store.visualization().cloned();

    backend.fail_predict.store(true, Ordering::SeqCst);
    state.dispatch(Action::SubmitPrediction);
    state.step();
    spawner.run_all();
    state.step();

    let error = state.store.error().unwrap();
    assert_eq!(error.kind, OperationKind::Prediction);
    assert!(error.message.starts_with("Prediction error:"));
    assert!(error.message.contains("Missing field: Age"));
    assert!(state.store.prediction().is_none());
    assert_eq!(state.store.clusters().cloned(), clusters);
    assert_eq!(state.store.visualization().cloned(), payload);
}

#[test]
fn test_visualization_failure_keeps_previous_payload() {
    let (mut state, spawner, backend) = setup();
    state.mount();
    spawner.run_all();
    state.step();

    backend.fail_visualization.store(true, Ordering::SeqCst);
    select(&mut state, AlgorithmId::Divisive);
    spawner.run_all();
    state.step();

    let error = state.store.error().unwrap();
    assert_eq!(error.kind, OperationKind::Visualization);
    let clusters = state.store.clusters().unwrap();
    assert_eq!(clusters.algorithm, Some(AlgorithmId::Divisive));
    assert_eq!(shown_algorithm_x(&state), Some(1.0));

    state.dispatch(Action::DismissError);
    state.step();
    assert!(state.store.error().is_none());
}

#[test]
fn test_second_submit_ignored_while_in_flight() {
    let (mut state, spawner, _) = setup();
    state.mount();
    spawner.run_all();
    state.step();

    state.dispatch(Action::SubmitPrediction);
    state.step();
    state.dispatch(Action::SubmitPrediction);
    state.step();
    assert_eq!(spawner.pending(), 1);

    spawner.run_all();
    state.step();
    assert!(state.store.prediction().is_some());

    state.dispatch(Action::SubmitPrediction);
    state.step();
    assert_eq!(spawner.pending(), 1);
}

#[test]
fn test_empty_points_are_rejected_at_the_boundary() {
    let body = r#"{ "points": [], "explained_variance": [0.5, 0.2] }"#;
    assert_eq!(decode_visualization(body), Err(GatewayError::EmptyResult));
}

#[test]
fn test_dbscan_prediction_end_to_end() {
    let (mut state, spawner, _) = setup();
    state.mount();
    spawner.run_all();
    state.step();

    let summary = state.store.feature_summary().unwrap();
    let age = summary.get(FEATURE_AGE).unwrap();
    assert_eq!((age.min, age.max), (18.0, 70.0));
    let income = summary.get(FEATURE_INCOME).unwrap();
    assert_eq!((income.min, income.max), (15.0, 137.0));
    let spending = summary.get(FEATURE_SPENDING).unwrap();
    assert_eq!((spending.min, spending.max), (1.0, 100.0));

    select(&mut state, AlgorithmId::Dbscan);
    state.dispatch(Action::SetAge { age: 35.0 });
    state.dispatch(Action::SetIncome { income: 50.0 });
    state.dispatch(Action::SetSpending { spending: 50.0 });
    state.dispatch(Action::SetMale { is_male: true });
    state.dispatch(Action::SubmitPrediction);
    state.step();

    // Prediction resolves before the cluster fetch.
    spawner.run_all_newest_first();
    state.step();

    let prediction = state.store.prediction().unwrap();
    let clusters = state.store.clusters().unwrap();
    assert_eq!(prediction.algorithm, AlgorithmId::Dbscan);
    assert_eq!(clusters.algorithm, Some(AlgorithmId::Dbscan));
    let entry = clusters.get(prediction.predicted_cluster).unwrap();
    let predicted_share = prediction.cluster_profile.percentage;
    assert!((entry.percentage - predicted_share).abs() < 0.05);

    let drawing = state.cache.projection.get(&state.store).clone().unwrap();
    assert!(drawing.marker.is_some());
}
