//! Network classification and the rendering tier derived from it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkQuality {
    #[default]
    Unknown,
    Slow2g,
    TwoG,
    ThreeG,
    FourG,
}

impl NetworkQuality {
    /// Parse an effective-connection-type label. Anything unrecognized is `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "slow-2g" | "slow2g" => NetworkQuality::Slow2g,
            "2g" => NetworkQuality::TwoG,
            "3g" => NetworkQuality::ThreeG,
            "4g" => NetworkQuality::FourG,
            _ => NetworkQuality::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NetworkQuality::Unknown => "unknown",
            NetworkQuality::Slow2g => "slow-2g",
            NetworkQuality::TwoG => "2g",
            NetworkQuality::ThreeG => "3g",
            NetworkQuality::FourG => "4g",
        }
    }

    /// Next classification, wrapping around (used by the `n` key).
    pub fn cycle(&self) -> Self {
        match self {
            NetworkQuality::Unknown => NetworkQuality::Slow2g,
            NetworkQuality::Slow2g => NetworkQuality::TwoG,
            NetworkQuality::TwoG => NetworkQuality::ThreeG,
            NetworkQuality::ThreeG => NetworkQuality::FourG,
            NetworkQuality::FourG => NetworkQuality::Unknown,
        }
    }
}

impl fmt::Display for NetworkQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the network observer reports.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkInfo {
    pub quality: NetworkQuality,
    pub downlink_mbps: Option<f64>,
}

impl NetworkInfo {
    pub fn new(quality: NetworkQuality, downlink_mbps: Option<f64>) -> Self {
        Self { quality, downlink_mbps }
    }

    /// One-line caption drawn at the bottom of every surface.
    pub fn caption(&self) -> String {
        let tier = select_tier(Some(self));
        let detail = match tier.detail_stride {
            1 => "full detail",
            2 => "reduced detail",
            _ => "low detail",
        };
        match self.downlink_mbps {
            Some(mbps) => format!("Network: {} ({:.1} Mbps) · {}", self.quality, mbps, detail),
            None => format!("Network: {} · {}", self.quality, detail),
        }
    }
}

/// Rendering cost parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderQuality {
    pub line_width: f64,
    pub detail_stride: usize,
    pub particle_count: usize,
    pub grid_size_px: u32,
    pub show_secondary_overlays: bool,
}

pub const LOW_TIER: RenderQuality = RenderQuality {
    line_width: 2.0,
    detail_stride: 3,
    particle_count: 20,
    grid_size_px: 40,
    show_secondary_overlays: false,
};

pub const MEDIUM_TIER: RenderQuality = RenderQuality {
    line_width: 2.5,
    detail_stride: 2,
    particle_count: 35,
    grid_size_px: 30,
    show_secondary_overlays: true,
};

pub const HIGH_TIER: RenderQuality = RenderQuality {
    line_width: 3.0,
    detail_stride: 1,
    particle_count: 50,
    grid_size_px: 20,
    show_secondary_overlays: true,
};

impl Default for RenderQuality {
    fn default() -> Self {
        HIGH_TIER
    }
}

/// Map a network report to its tier. Missing or unknown reports get the
/// highest tier.
pub fn select_tier(network: Option<&NetworkInfo>) -> RenderQuality {
    match network.map(|n| n.quality) {
        Some(NetworkQuality::Slow2g) | Some(NetworkQuality::TwoG) => LOW_TIER,
        Some(NetworkQuality::ThreeG) => MEDIUM_TIER,
        Some(NetworkQuality::FourG) | Some(NetworkQuality::Unknown) | None => HIGH_TIER,
    }
}

/// Indices visited when drawing `len` ordered samples at `stride`: index 0,
/// every `stride`-th index after it, and the final index.
pub fn stride_indices(len: usize, stride: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let stride = stride.max(1);
    let mut indices: Vec<usize> = (0..len).step_by(stride).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_2g_gets_low_tier() {
        let info = NetworkInfo::new(NetworkQuality::parse("slow-2g"), None);
        let tier = select_tier(Some(&info));
        assert_eq!(tier.line_width, 2.0);
        assert_eq!(tier.detail_stride, 3);
        assert_eq!(tier.particle_count, 20);
        assert!(!tier.show_secondary_overlays);
    }

    #[test]
    fn tier_table() {
        let tier = |q| select_tier(Some(&NetworkInfo::new(q, None)));
        assert_eq!(tier(NetworkQuality::TwoG), LOW_TIER);
        assert_eq!(tier(NetworkQuality::ThreeG), MEDIUM_TIER);
        assert_eq!(tier(NetworkQuality::FourG), HIGH_TIER);
        assert_eq!(tier(NetworkQuality::ThreeG).grid_size_px, 30);
    }

    #[test]
    fn unknown_and_absent_fall_back_to_high_tier() {
        assert_eq!(select_tier(None), HIGH_TIER);
        let unknown = NetworkInfo::new(NetworkQuality::parse("5g-ultra"), Some(100.0));
        assert_eq!(unknown.quality, NetworkQuality::Unknown);
        assert_eq!(select_tier(Some(&unknown)), HIGH_TIER);
    }

    #[test]
    fn selection_is_deterministic() {
        let info = NetworkInfo::new(NetworkQuality::ThreeG, Some(1.2));
        assert_eq!(select_tier(Some(&info)), select_tier(Some(&info)));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(NetworkQuality::parse(" 4G "), NetworkQuality::FourG);
        assert_eq!(NetworkQuality::parse("SLOW-2G"), NetworkQuality::Slow2g);
    }

    #[test]
    fn stride_keeps_first_every_kth_and_last() {
        assert_eq!(stride_indices(10, 3), vec![0, 3, 6, 9]);
        assert_eq!(stride_indices(11, 3), vec![0, 3, 6, 9, 10]);
        assert_eq!(stride_indices(5, 1), vec![0, 1, 2, 3, 4]);
        assert_eq!(stride_indices(1, 3), vec![0]);
        assert!(stride_indices(0, 2).is_empty());
    }

    #[test]
    fn zero_stride_is_treated_as_one() {
        assert_eq!(stride_indices(3, 0), vec![0, 1, 2]);
    }

    #[test]
    fn caption_mentions_classification() {
        let caption = NetworkInfo::new(NetworkQuality::TwoG, Some(0.25)).caption();
        assert!(caption.contains("2g"));
        assert!(caption.contains("0.2") || caption.contains("0.3"));
        assert!(caption.contains("low detail"));
    }

    #[test]
    fn cycle_visits_every_class() {
        let mut q = NetworkQuality::Unknown;
        for _ in 0..5 {
            q = q.cycle();
        }
        assert_eq!(q, NetworkQuality::Unknown);
    }
}
