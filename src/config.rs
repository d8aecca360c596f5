use std::net::SocketAddr;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Fixed settings of the dashboard process. The binary always runs with
/// [`DashboardConfig::default`]; tests build their own.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Launch table read once at startup.
    pub data_path: PathBuf,
    /// Listen address (all interfaces).
    pub bind_addr: SocketAddr,
    pub slider: SliderConfig,
}

/// Bounds of the payload range control, in kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: [f64; 5],
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10_000.0,
            step: 1_000.0,
            marks: [0.0, 2_500.0, 5_000.0, 7_500.0, 10_000.0],
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8050)),
            slider: SliderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_every_interface() {
        let cfg = DashboardConfig::default();
        assert!(cfg.bind_addr.ip().is_unspecified());
        assert_eq!(cfg.bind_addr.port(), 8050);
        assert_eq!(cfg.slider.marks.first(), Some(&cfg.slider.min));
        assert_eq!(cfg.slider.marks.last(), Some(&cfg.slider.max));
    }
}
