use eframe::egui::Vec2;
use std::sync::Arc;

use crate::actions::{self, Action};
use crate::cache::Cache;
use crate::effects::Effect;
use crate::gateway::Gateway;
use crate::model::AlgorithmId;
use crate::orchestrator::Orchestrator;
use crate::spawn::Spawner;
use crate::store::Store;

pub struct State {
    pub store: Store,
    pub orchestrator: Orchestrator,
    pub cache: Cache,
    action_queue: Vec<Action>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(
        algorithm: AlgorithmId,
        gateway: Arc<dyn Gateway>,
        spawner: Box<dyn Spawner>,
        canvas: Vec2,
    ) -> Self {
        let mut store = Store::new(algorithm);
        let orchestrator = Orchestrator::new(gateway, spawner, &mut store);
        Self {
            store,
            orchestrator,
            cache: Cache::new(canvas),
            action_queue: Vec::new(),
            effect_queue: Vec::new(),
        }
    }

    pub fn mount(&mut self) {
        self.orchestrator.mount(&self.store);
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            let mut effects = actions::update(&mut self.store, action);
            self.effect_queue.append(&mut effects);
        }
    }

    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            self.orchestrator.schedule(effect);
        }
    }

    /// Pick up selection changes and commit finished calls.
    pub fn poll(&mut self) -> usize {
        self.orchestrator.poll(&mut self.store)
    }

    /// One full turn: apply queued actions, issue their effects, then
    /// react to whatever changed.
    pub fn step(&mut self) -> usize {
        self.flush_actions();
        self.flush_effects();
        self.poll()
    }
}
