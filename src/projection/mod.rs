//! Turns a visualization payload into a list of draw commands in canvas
//! coordinates. Nothing in here touches egui's painter; see `paint`.

mod legend;
mod marker;
mod palette;
mod scale;

pub use legend::{LegendEntry, cluster_label, legend_entries};
pub use marker::{MARKER_RANGE_FRACTION, sample_marker_position, star_points};
pub use palette::{PALETTE_SIZE, cluster_color};
pub use scale::{Bounds, CanvasTransform};

use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2, pos2};
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

use crate::model::{PredictionResult, VisualizationPayload};

pub const PADDING: f32 = 60.0;
pub const SHRINK: f32 = 0.9;
pub const POINT_RADIUS: f32 = 5.0;

pub const STAR_OUTER_RADIUS: f32 = 12.0;
pub const STAR_INNER_RADIUS: f32 = 6.0;
pub const STAR_SPIKES: usize = 15;

const LEGEND_INSET: f32 = 120.0;
const LEGEND_ROW: f32 = 18.0;
const LEGEND_SWATCH: f32 = 12.0;

const BACKGROUND: Color32 = Color32::WHITE;
const AXIS_COLOR: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);
const CAPTION_COLOR: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);
const LEGEND_TEXT: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
const PLACEHOLDER_COLOR: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
const POINT_OUTLINE: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 51);
const STAR_FILL: Color32 = Color32::from_rgb(0xff, 0xd7, 0x00);
const STAR_STROKE: Color32 = Color32::from_rgb(0xff, 0x45, 0x00);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        color: Color32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Star {
        center: Pos2,
        outer_radius: f32,
        inner_radius: f32,
        spikes: usize,
        fill: Color32,
        stroke: Stroke,
    },
    /// `angle` is in radians, clockwise, around `pos`.
    Text {
        pos: Pos2,
        anchor: Align2,
        text: String,
        size: f32,
        color: Color32,
        angle: f32,
    },
}

impl DrawCommand {
    fn text(
        pos: Pos2,
        anchor: Align2,
        text: impl Into<String>,
        size: f32,
        color: Color32,
    ) -> Self {
        DrawCommand::Text {
            pos,
            anchor,
            text: text.into(),
            size,
            color,
            angle: 0.0,
        }
    }
}

/// A finished frame, in back-to-front order.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub size: Vec2,
    pub commands: Vec<DrawCommand>,
    pub legend: Vec<LegendEntry>,
    /// Canvas position of the prediction marker, if one was drawn.
    pub marker: Option<Pos2>,
}

impl Drawing {
    /// Centers of all plotted points, in payload order.
    pub fn point_positions(&self) -> Vec<Pos2> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Lay out the scatter plot for `payload` on a canvas of `canvas` size.
///
/// The only impure input is `rng`, used to place the prediction marker.
pub fn render<R: Rng + ?Sized>(
    canvas: Vec2,
    payload: &VisualizationPayload,
    prediction: Option<&PredictionResult>,
    rng: &mut R,
) -> Drawing {
    let mut commands = vec![DrawCommand::Rect {
        rect: Rect::from_min_size(Pos2::ZERO, canvas),
        color: BACKGROUND,
    }];

    let Some(bounds) = Bounds::of(&payload.points) else {
        commands.push(DrawCommand::text(
            pos2(50.0, 50.0),
            Align2::LEFT_BOTTOM,
            "No data to visualize",
            14.0,
            PLACEHOLDER_COLOR,
        ));
        return Drawing {
            size: canvas,
            commands,
            legend: Vec::new(),
            marker: None,
        };
    };

    let transform = CanvasTransform::new(canvas, PADDING, SHRINK, bounds);
    let region = transform.region();
    let axis = Stroke::new(1.0, AXIS_COLOR);

    commands.push(DrawCommand::Line {
        from: region.left_bottom(),
        to: region.right_bottom(),
        stroke: axis,
    });
    commands.push(DrawCommand::Line {
        from: region.left_top(),
        to: region.left_bottom(),
        stroke: axis,
    });
    commands.push(DrawCommand::text(
        pos2(canvas.x / 2.0, canvas.y - 10.0),
        Align2::CENTER_BOTTOM,
        "Principal Component 1",
        12.0,
        CAPTION_COLOR,
    ));
    commands.push(DrawCommand::Text {
        pos: pos2(10.0, canvas.y / 2.0),
        anchor: Align2::CENTER_CENTER,
        text: "Principal Component 2".to_string(),
        size: 12.0,
        color: CAPTION_COLOR,
        angle: -FRAC_PI_2,
    });

    let outline = Stroke::new(1.0, POINT_OUTLINE);
    commands.extend(payload.points.iter().map(|p| DrawCommand::Circle {
        center: transform.to_canvas(p.x, p.y),
        radius: POINT_RADIUS,
        fill: cluster_color(p.cluster),
        stroke: outline,
    }));

    let marker = prediction.map(|_| {
        let (x, y) = sample_marker_position(&transform.bounds(), rng);
        let center = transform.to_canvas(x, y);
        commands.push(DrawCommand::Star {
            center,
            outer_radius: STAR_OUTER_RADIUS,
            inner_radius: STAR_INNER_RADIUS,
            spikes: STAR_SPIKES,
            fill: STAR_FILL,
            stroke: Stroke::new(2.0, STAR_STROKE),
        });
        center
    });

    let legend = legend_entries(&payload.points);
    push_legend(&mut commands, canvas, &legend);

    if let Some([pc1, pc2]) = payload.explained_variance {
        commands.push(DrawCommand::text(
            pos2(PADDING, canvas.y - 35.0),
            Align2::LEFT_BOTTOM,
            format!("Explained Var: {:.1}% + {:.1}%", pc1 * 100.0, pc2 * 100.0),
            11.0,
            CAPTION_COLOR,
        ));
    }

    Drawing {
        size: canvas,
        commands,
        legend,
        marker,
    }
}

fn push_legend(
    commands: &mut Vec<DrawCommand>,
    canvas: Vec2,
    legend: &[LegendEntry],
) {
    let left = canvas.x - LEGEND_INSET;
    let mut baseline = PADDING + 20.0;

    commands.push(DrawCommand::text(
        pos2(left, baseline),
        Align2::LEFT_BOTTOM,
        "Clusters:",
        12.0,
        LEGEND_TEXT,
    ));
    baseline += 20.0;

    for entry in legend {
        commands.push(DrawCommand::Rect {
            rect: Rect::from_min_size(
                pos2(left, baseline - 10.0),
                Vec2::splat(LEGEND_SWATCH),
            ),
            color: entry.color,
        });
        commands.push(DrawCommand::text(
            pos2(left + 20.0, baseline),
            Align2::LEFT_BOTTOM,
            entry.label.clone(),
            11.0,
            LEGEND_TEXT,
        ));
        baseline += LEGEND_ROW;
    }
}
