//! Translates mount, selection changes and prediction requests into
//! gateway calls, and folds their results back into the [`Store`].
//!
//! Gateway calls run through a [`Spawner`]; results come back over a
//! channel and are only applied inside [`Orchestrator::poll`], which runs
//! on the UI thread. All store writes therefore happen on one thread.
//!
//! Fetches that depend on the selected algorithm carry a [`Ticket`].
//! A result whose ticket is no longer the latest one is dropped, so a
//! slow response for an old selection never overwrites fresh state.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::effects::{self, Completion, Effect, Ticket};
use crate::gateway::{Gateway, GatewayError};
use crate::model::AlgorithmId;
use crate::spawn::Spawner;
use crate::store::{OperationKind, Store};

pub struct Orchestrator {
    gateway: Arc<dyn Gateway>,
    spawner: Box<dyn Spawner>,
    selections: Receiver<AlgorithmId>,
    completions_tx: Sender<Completion>,
    completions: Receiver<Completion>,
    latest: Ticket,
    prediction_in_flight: bool,
    mounted: bool,
}

impl Orchestrator {
    /// Subscribe to the store's selection changes.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        spawner: Box<dyn Spawner>,
        store: &mut Store,
    ) -> Self {
        let (completions_tx, completions) = mpsc::channel();
        Self {
            gateway,
            spawner,
            selections: store.subscribe_algorithm(),
            completions_tx,
            completions,
            latest: Ticket {
                algorithm: store.algorithm(),
                generation: 0,
            },
            prediction_in_flight: false,
            mounted: false,
        }
    }

    /// Initial load: feature summary plus clusters and projection of the
    /// current selection. Only the first call has any effect.
    pub fn mount(&mut self, store: &Store) {
        if self.mounted {
            debug!("already mounted");
            return;
        }
        self.mounted = true;
        self.latest.algorithm = store.algorithm();
        info!(algorithm = %self.latest.algorithm, "mounting dashboard");
        let ticket = self.latest;
        self.schedule(Effect::FetchFeatureSummary);
        self.schedule(Effect::FetchClusters { ticket });
        self.schedule(Effect::FetchVisualization { ticket });
    }

    pub fn latest_ticket(&self) -> Ticket {
        self.latest
    }

    pub fn prediction_in_flight(&self) -> bool {
        self.prediction_in_flight
    }

    /// Hand an effect to the spawner. A prediction is refused while
    /// another one is unresolved; returns whether the effect was issued.
    pub fn schedule(&mut self, effect: Effect) -> bool {
        if let Effect::Predict { .. } = effect {
            if self.prediction_in_flight {
                warn!("prediction already in flight, ignoring submission");
                return false;
            }
            self.prediction_in_flight = true;
        }
        debug!(?effect, "scheduling");
        let gateway = Arc::clone(&self.gateway);
        let tx = self.completions_tx.clone();
        self.spawner.spawn(Box::new(move || {
            let completion = effects::run_guarded(gateway.as_ref(), effect);
            if tx.send(completion).is_err() {
                debug!("completion dropped, orchestrator is gone");
            }
        }));
        true
    }

    /// React to selection changes, then commit every resolved call.
    /// Returns the number of completions taken off the channel.
    pub fn poll(&mut self, store: &mut Store) -> usize {
        self.observe_selection();
        let mut handled = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.apply(store, completion);
            handled += 1;
        }
        handled
    }

    fn observe_selection(&mut self) {
        // Several changes since the last poll collapse into the last one.
        let Some(algorithm) = self.selections.try_iter().last() else {
            return;
        };
        if !self.mounted || algorithm == self.latest.algorithm {
            self.latest.algorithm = algorithm;
            return;
        }
        self.latest = Ticket {
            algorithm,
            generation: self.latest.generation + 1,
        };
        info!(
            %algorithm,
            generation = self.latest.generation,
            "selection changed"
        );
        let ticket = self.latest;
        self.schedule(Effect::FetchClusters { ticket });
        self.schedule(Effect::FetchVisualization { ticket });
    }

    fn is_current(&self, ticket: Ticket, store: &Store) -> bool {
        ticket == self.latest && ticket.algorithm == store.algorithm()
    }

    fn apply(&mut self, store: &mut Store, completion: Completion) {
        match completion {
            Completion::FeatureSummary(result) => match result {
                Ok(summary) => store.commit_feature_summary(summary),
                Err(e) => fail(store, OperationKind::FeatureSummary, &e),
            },
            Completion::Clusters { ticket, result } => {
                if !self.is_current(ticket, store) {
                    debug!(?ticket, "discarding stale cluster set");
                    return;
                }
                match result {
                    Ok(clusters) => store.commit_clusters(clusters),
                    Err(e) => fail(store, OperationKind::Clusters, &e),
                }
            }
            Completion::Visualization { ticket, result } => {
                if !self.is_current(ticket, store) {
                    debug!(?ticket, "discarding stale visualization");
                    return;
                }
                match result {
                    Ok(payload) => store.commit_visualization(payload),
                    Err(e) => fail(store, OperationKind::Visualization, &e),
                }
            }
            Completion::Prediction { algorithm, result } => {
                self.prediction_in_flight = false;
                match result {
                    Ok(prediction) => {
                        debug!(
                            %algorithm,
                            cluster = %prediction.predicted_cluster,
                            "prediction resolved"
                        );
                        store.commit_prediction(prediction)
                    }
                    Err(e) => fail(store, OperationKind::Prediction, &e),
                }
            }
        }
    }
}

fn fail(store: &mut Store, kind: OperationKind, error: &GatewayError) {
    store.commit_error(kind, format!("{}: {error}", kind.failure_prefix()));
}
