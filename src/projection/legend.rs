use eframe::egui::Color32;
use std::collections::HashSet;

use super::palette::cluster_color;
use crate::model::{ClusterId, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub cluster: ClusterId,
    pub color: Color32,
    pub label: String,
}

pub fn cluster_label(cluster: ClusterId) -> String {
    if cluster.is_noise() {
        "Noise".to_string()
    } else {
        format!("Cluster {cluster}")
    }
}

/// One entry per distinct cluster, in order of first appearance.
pub fn legend_entries(points: &[Point]) -> Vec<LegendEntry> {
    let mut seen = HashSet::new();
    points
        .iter()
        .filter(|p| seen.insert(p.cluster))
        .map(|p| LegendEntry {
            cluster: p.cluster,
            color: cluster_color(p.cluster),
            label: cluster_label(p.cluster),
        })
        .collect()
}
