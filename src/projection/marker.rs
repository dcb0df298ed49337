use eframe::egui::{Pos2, pos2};
use rand::Rng;
use std::f32::consts::PI;

use super::scale::Bounds;

/// Share of each axis' data range the prediction marker is placed in.
pub const MARKER_RANGE_FRACTION: f64 = 0.2;

/// Data-space position for the prediction marker.
///
/// The backend does not return the projected coordinates of a predicted
/// customer, so the marker lands at a random spot in the lower-left part
/// of the cloud. It shows that a prediction exists, not where it is.
pub fn sample_marker_position<R: Rng + ?Sized>(
    bounds: &Bounds,
    rng: &mut R,
) -> (f64, f64) {
    let x = bounds.min_x
        + rng.random::<f64>() * bounds.range_x() * MARKER_RANGE_FRACTION;
    let y = bounds.min_y
        + rng.random::<f64>() * bounds.range_y() * MARKER_RANGE_FRACTION;
    (x, y)
}

/// Outline of a star, alternating outer tip and inner notch, starting
/// with the tip pointing straight up.
pub fn star_points(
    center: Pos2,
    outer_radius: f32,
    inner_radius: f32,
    spikes: usize,
) -> Vec<Pos2> {
    let step = PI / spikes as f32;
    (0..spikes * 2)
        .map(|i| {
            let angle = 1.5 * PI + step * i as f32;
            let r = if i % 2 == 0 { outer_radius } else { inner_radius };
            pos2(center.x + angle.cos() * r, center.y + angle.sin() * r)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_star_starts_at_top_tip() {
        let points = star_points(pos2(10.0, 10.0), 12.0, 6.0, 5);
        assert_eq!(points.len(), 10);
        assert!((points[0].x - 10.0).abs() < 1e-4);
        assert!((points[0].y - -2.0).abs() < 1e-4);
        let notch = points[1] - pos2(10.0, 10.0);
        assert!((notch.length() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_marker_sampled_in_lower_fifth() {
        let bounds = Bounds {
            min_x: -3.0,
            max_x: 7.0,
            min_y: 100.0,
            max_y: 150.0,
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (x, y) = sample_marker_position(&bounds, &mut rng);
            assert!((-3.0..=-1.0).contains(&x));
            assert!((100.0..=110.0).contains(&y));
        }
    }
}
