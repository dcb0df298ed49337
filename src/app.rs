use eframe::egui::{self, Color32, RichText, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::actions::Action;
use crate::cache::Cache;
use crate::form::{AGE_RANGE, INCOME_RANGE, SPENDING_RANGE, SliderRange};
use crate::interpretation::{
    FEATURE_AGE, FEATURE_INCOME, FEATURE_SPENDING, cluster_name,
    feature_label, interpretation,
};
use crate::model::{AlgorithmId, FeatureSummary};
use crate::paint::paint;
use crate::projection::cluster_color;
use crate::state::State;
use crate::store::Store;
use crate::summary::{coverage_caption, feature_hint, format_metric};

const SIDE_PANEL_WIDTH: f32 = 320.0;
const ERROR_COLOR: Color32 = Color32::from_rgb(0xc0, 0x39, 0x2b);
const CHART_HEIGHT: f32 = 160.0;

pub struct DashboardApp {
    state: State,
    canvas: Vec2,
}

impl DashboardApp {
    pub fn new(state: State, canvas: Vec2) -> Self {
        Self { state, canvas }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();

        let mut actions = Vec::new();
        let canvas = self.canvas;
        let in_flight = self.state.orchestrator.prediction_in_flight();
        let State { store, cache, .. } = &mut self.state;
        let store: &Store = store;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            header(ui, store, &mut actions);
        });

        egui::SidePanel::left("prediction")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    prediction_form(ui, store, in_flight, &mut actions);
                    ui.separator();
                    prediction_panel(ui, store);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                visualization_panel(ui, store, cache, canvas);
                ui.separator();
                summary_panel(ui, store, cache);
            });
        });

        // Display error dialog if there's an error message
        if let Some(error) = store.error() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(RichText::new(&error.message).color(ERROR_COLOR));
                    if ui.button("OK").clicked() {
                        actions.push(Action::DismissError);
                    }
                });
        }

        for action in actions {
            self.state.dispatch(action);
        }
        if self.state.step() > 0 {
            ctx.request_repaint();
        }
    }
}

fn header(ui: &mut egui::Ui, store: &Store, actions: &mut Vec<Action>) {
    ui.horizontal(|ui| {
        ui.heading("Customer Segmentation Dashboard");
        ui.separator();

        let current = store.algorithm();
        let mut selected = current;
        egui::ComboBox::from_label("Algorithm")
            .selected_text(selected.display_name())
            .show_ui(ui, |ui| {
                for algorithm in AlgorithmId::ALL {
                    ui.selectable_value(
                        &mut selected,
                        algorithm,
                        algorithm.display_name(),
                    );
                }
            });
        if selected != current {
            actions.push(Action::SelectAlgorithm {
                algorithm: selected,
            });
        }

        if let Some(summary) = store.feature_summary() {
            ui.separator();
            ui.weak(format!(
                "{} customers, {} features",
                summary.sample_count(),
                summary.catalog.n_features
            ));
        }
    });
}

fn prediction_form(
    ui: &mut egui::Ui,
    store: &Store,
    in_flight: bool,
    actions: &mut Vec<Action>,
) {
    ui.heading("Predict Customer Segment");
    let form = store.form;
    let stats = store.feature_summary();

    if let Some(age) =
        slider(ui, "Age", form.age, AGE_RANGE, stats, FEATURE_AGE)
    {
        actions.push(Action::SetAge { age });
    }
    if let Some(income) = slider(
        ui,
        "Annual Income (k$)",
        form.income,
        INCOME_RANGE,
        stats,
        FEATURE_INCOME,
    ) {
        actions.push(Action::SetIncome { income });
    }
    if let Some(spending) = slider(
        ui,
        "Spending Score",
        form.spending,
        SPENDING_RANGE,
        stats,
        FEATURE_SPENDING,
    ) {
        actions.push(Action::SetSpending { spending });
    }

    let mut is_male = form.is_male;
    if ui.checkbox(&mut is_male, "Male").changed() {
        actions.push(Action::SetMale { is_male });
    }

    ui.add_space(8.0);
    let label = if in_flight { "Predicting..." } else { "Predict" };
    if ui
        .add_enabled(!in_flight, egui::Button::new(label))
        .clicked()
    {
        actions.push(Action::SubmitPrediction);
    }
}

/// Returns the new value when the user moved the slider.
fn slider(
    ui: &mut egui::Ui,
    label: &str,
    value: f64,
    range: SliderRange,
    stats: Option<&FeatureSummary>,
    feature: &str,
) -> Option<f64> {
    let mut edited = value;
    let changed = ui
        .add(
            egui::Slider::new(&mut edited, range.as_range())
                .step_by(range.step)
                .text(label),
        )
        .changed();
    if let Some(s) = stats.and_then(|s| s.get(feature)) {
        ui.weak(feature_hint(s));
    }
    changed.then_some(edited)
}

fn prediction_panel(ui: &mut egui::Ui, store: &Store) {
    let Some(prediction) = store.prediction() else {
        ui.label("No prediction yet");
        return;
    };
    let name = cluster_name(prediction.predicted_cluster);
    let profile = &prediction.cluster_profile;

    ui.heading(&name);
    ui.label(format!("Cluster {}", prediction.predicted_cluster));
    if prediction.algorithm != store.algorithm() {
        ui.weak(format!(
            "Predicted with {}",
            prediction.algorithm.display_name()
        ));
    }

    egui::Grid::new("prediction_stats").striped(true).show(ui, |ui| {
        ui.label("Cluster Size:");
        ui.label(format!("{} customers", profile.size));
        ui.end_row();
        ui.label("Percentage:");
        ui.label(format!("{}%", profile.percentage));
        ui.end_row();
    });

    ui.add_space(6.0);
    ui.strong("Cluster Characteristics:");
    egui::Grid::new("prediction_features").striped(true).show(ui, |ui| {
        for (feature, value) in &profile.features {
            ui.label(feature_label(feature));
            ui.label(format!("{value:.2}"));
            ui.end_row();
        }
    });

    ui.add_space(6.0);
    ui.strong("Interpretation:");
    ui.label(interpretation(&name));
}

fn visualization_panel(
    ui: &mut egui::Ui,
    store: &Store,
    cache: &mut Cache,
    canvas: Vec2,
) {
    ui.heading("Cluster Visualization");
    match cache.projection.get(store) {
        Some(drawing) => {
            let (response, painter) =
                ui.allocate_painter(canvas, egui::Sense::hover());
            paint(&painter, response.rect.min, drawing);
        }
        None => {
            ui.allocate_ui(canvas, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label("Loading visualization...");
                });
            });
        }
    }

    ui.label(store.algorithm().display_name());
    if let Some(prediction) = store.prediction() {
        ui.label(
            RichText::new(format!(
                "Your position: Cluster {}",
                prediction.predicted_cluster
            ))
            .strong(),
        );
    }
}

fn summary_panel(ui: &mut egui::Ui, store: &Store, cache: &mut Cache) {
    ui.heading("Cluster Summary");
    let Some(clusters) = store.clusters() else {
        ui.label("Loading clusters...");
        return;
    };
    if clusters.is_empty() {
        ui.label("No clusters available");
        return;
    }
    let rows = cache.summary_rows.get(store);

    ui.push_id("summary_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().at_least(60.0), 6)
            .header(20.0, |mut header| {
                for title in [
                    "Cluster",
                    "Size",
                    "%",
                    "Avg Age",
                    "Avg Income",
                    "Avg Spending",
                ] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(18.0, |mut r| {
                        r.col(|ui| {
                            ui.label(
                                RichText::new(row.cluster.to_string())
                                    .color(cluster_color(row.cluster)),
                            );
                        });
                        r.col(|ui| {
                            ui.label(row.size.to_string());
                        });
                        r.col(|ui| {
                            ui.label(format!("{}%", row.percentage));
                        });
                        r.col(|ui| {
                            ui.label(format_metric(row.avg_age));
                        });
                        r.col(|ui| {
                            ui.label(format_metric(row.avg_income));
                        });
                        r.col(|ui| {
                            ui.label(format_metric(row.avg_spending));
                        });
                    });
                }
            });
    });
    ui.weak(coverage_caption(clusters));

    ui.add_space(8.0);
    ui.strong("Distribution:");
    let bars: Vec<Bar> = rows
        .iter()
        .map(|row| {
            Bar::new(f64::from(row.cluster.0), row.percentage)
                .name(format!("Cluster {}", row.cluster))
                .fill(cluster_color(row.cluster))
        })
        .collect();
    Plot::new("distribution")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(|mark, _| format!("C{}", mark.value.round() as i64))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new("Share of customers (%)", bars).width(0.6),
            );
        });
}
