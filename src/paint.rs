use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2,
    emath::Rot2,
    epaint::{CircleShape, TextShape},
};

use crate::projection::{DrawCommand, Drawing, star_points};

/// Paint `drawing` with its top-left corner at `origin`, clipped to the
/// drawing's own size.
pub fn paint(painter: &Painter, origin: Pos2, drawing: &Drawing) {
    let clip = canvas_rect(origin, drawing).intersect(painter.clip_rect());
    let painter = painter.with_clip_rect(clip);
    let offset = origin.to_vec2();
    let shapes: Vec<Shape> = drawing
        .commands
        .iter()
        .flat_map(|command| command_shapes(&painter, offset, command))
        .collect();
    painter.extend(shapes);
}

fn canvas_rect(origin: Pos2, drawing: &Drawing) -> Rect {
    Rect::from_min_size(origin, drawing.size)
}

fn command_shapes(
    painter: &Painter,
    offset: Vec2,
    command: &DrawCommand,
) -> Vec<Shape> {
    match command {
        DrawCommand::Rect { rect, color } => {
            vec![Shape::rect_filled(rect.translate(offset), 0.0, *color)]
        }
        DrawCommand::Line { from, to, stroke } => {
            vec![Shape::line_segment([*from + offset, *to + offset], *stroke)]
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        } => vec![
            CircleShape {
                center: *center + offset,
                radius: *radius,
                fill: *fill,
                stroke: *stroke,
            }
            .into(),
        ],
        DrawCommand::Star {
            center,
            outer_radius,
            inner_radius,
            spikes,
            fill,
            stroke,
        } => star_shapes(
            *center + offset,
            *outer_radius,
            *inner_radius,
            *spikes,
            *fill,
            *stroke,
        ),
        DrawCommand::Text {
            pos,
            anchor,
            text,
            size,
            color,
            angle,
        } => vec![text_shape(
            painter,
            *pos + offset,
            *anchor,
            text,
            *size,
            *color,
            *angle,
        )],
    }
}

// A star is concave, so the fill is a fan of convex kites around the
// center with the outline drawn on top.
fn star_shapes(
    center: Pos2,
    outer_radius: f32,
    inner_radius: f32,
    spikes: usize,
    fill: Color32,
    stroke: Stroke,
) -> Vec<Shape> {
    let outline = star_points(center, outer_radius, inner_radius, spikes);
    let n = outline.len();
    let mut shapes: Vec<Shape> = (0..n)
        .step_by(2)
        .map(|tip| {
            let before = outline[(tip + n - 1) % n];
            let after = outline[(tip + 1) % n];
            Shape::convex_polygon(
                vec![center, before, outline[tip], after],
                fill,
                Stroke::NONE,
            )
        })
        .collect();
    shapes.push(Shape::closed_line(outline, stroke));
    shapes
}

fn text_shape(
    painter: &Painter,
    pos: Pos2,
    anchor: Align2,
    text: &str,
    size: f32,
    color: Color32,
    angle: f32,
) -> Shape {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(size),
        color,
    );
    let rect = anchor.anchor_size(pos, galley.size());
    if angle == 0.0 {
        return TextShape::new(rect.min, galley, color).into();
    }
    // Rotation happens around the galley's top-left corner; shift it so
    // the anchored point stays put.
    let pivot = pos - rect.min;
    let top_left = pos - Rot2::from_angle(angle) * pivot;
    TextShape::new(top_left, galley, color)
        .with_angle(angle)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, VisualizationPayload};
    use crate::projection::render;
    use eframe::egui::{pos2, vec2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_clip_covers_every_point_at_offset() {
        let payload = VisualizationPayload {
            points: vec![Point::new(-3.0, 1.0, 0), Point::new(8.0, -2.0, 1)],
            explained_variance: None,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let drawing = render(vec2(500.0, 400.0), &payload, None, &mut rng);
        let origin = pos2(10.0, 20.0);

        let clip = canvas_rect(origin, &drawing);
        assert_eq!(clip.max, pos2(510.0, 420.0));
        for p in drawing.point_positions() {
            assert!(clip.contains(p + origin.to_vec2()), "{p:?}");
        }
    }
}
