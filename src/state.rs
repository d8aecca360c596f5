use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::SliderConfig;
use crate::data::filter::{PayloadRange, Selection, SiteSelection};
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// Read-only state shared by every request. The selection itself lives in
/// the browser and arrives with each request.
pub struct DashboardState {
    /// Loaded once at startup, never mutated.
    pub dataset: LaunchDataset,

    /// Colour per booster category (scatter, booster bars).
    pub booster_colors: ColorMap,

    /// Colour per launch site (pie, site bars).
    pub site_colors: ColorMap,

    pub slider: SliderConfig,
}

pub type SharedState = Arc<DashboardState>;

impl DashboardState {
    /// Ingest the loaded dataset and build the colour maps.
    pub fn new(dataset: LaunchDataset, slider: SliderConfig) -> Self {
        let booster_colors = ColorMap::new(&dataset.booster_categories);
        let mut sites = dataset.sites.clone();
        sites.sort();
        let site_colors = ColorMap::new(&sites);

        Self {
            dataset,
            booster_colors,
            site_colors,
            slider,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Initial slider value: the observed payload bounds, or the whole
    /// slider when the table is empty.
    pub fn initial_range(&self) -> PayloadRange {
        match self.dataset.payload_bounds {
            Some((lo, hi)) => PayloadRange::new(lo, hi),
            None => PayloadRange::new(self.slider.min, self.slider.max),
        }
    }

    /// Build a selection from raw request values; absent bounds default to
    /// the slider's extent.
    pub fn selection(&self, site: Option<&str>, low: Option<f64>, high: Option<f64>) -> Selection {
        let site = site.map(SiteSelection::parse).unwrap_or_default();
        if let SiteSelection::Site(name) = &site {
            if !self.dataset.has_site(name) {
                log::warn!("selected site '{name}' is not in the dataset");
            }
        }
        Selection {
            site,
            payload: PayloadRange::new(
                low.unwrap_or(self.slider.min),
                high.unwrap_or(self.slider.max),
            ),
        }
    }
}
