pub mod actions;
pub mod app;
pub mod cache;
pub mod config;
pub mod effects;
pub mod form;
pub mod gateway;
pub mod interpretation;
pub mod model;
pub mod native;
pub mod orchestrator;
pub mod paint;
pub mod projection;
pub mod spawn;
pub mod state;
pub mod store;
pub mod summary;
pub mod versioned;

use std::sync::Arc;
use tracing::info;

use crate::app::DashboardApp;
use crate::config::DashboardConfig;
use crate::gateway::HttpGateway;
use crate::spawn::ThreadSpawner;
use crate::state::State;

/// Wire the HTTP gateway, the store and the orchestrator together and
/// start the initial load.
pub fn create_app(
    cc: &eframe::CreationContext<'_>,
    config: &DashboardConfig,
) -> DashboardApp {
    let gateway = HttpGateway::new(&config.api_url, config.timeout());
    info!(
        api_url = gateway.base_url(),
        "connecting to clustering service"
    );
    let mut state = State::new(
        config.default_algorithm,
        Arc::new(gateway),
        Box::new(ThreadSpawner::new(cc.egui_ctx.clone())),
        config.canvas_size(),
    );
    state.mount();
    DashboardApp::new(state, config.canvas_size())
}
