use eframe::egui::Color32;

use crate::model::ClusterId;

const PALETTE: [colorous::Color; 10] = colorous::TABLEAU10;

pub const PALETTE_SIZE: usize = PALETTE.len();

/// Fixed color of a cluster: the palette entry at `id mod PALETTE_SIZE`.
/// Noise (`-1`) wraps around to the last entry.
pub fn cluster_color(cluster: ClusterId) -> Color32 {
    let index = cluster.0.rem_euclid(PALETTE_SIZE as i32) as usize;
    let c = PALETTE[index];
    Color32::from_rgb(c.r, c.g, c.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_wraps_modulo_palette() {
        assert_eq!(cluster_color(ClusterId(0)), cluster_color(ClusterId(10)));
        assert_ne!(cluster_color(ClusterId(0)), cluster_color(ClusterId(1)));
        assert_eq!(
            cluster_color(ClusterId::NOISE),
            cluster_color(ClusterId(PALETTE_SIZE as i32 - 1))
        );
    }
}
