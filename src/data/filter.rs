use std::fmt;

use super::model::{LaunchDataset, LaunchRecord};

/// Dropdown value meaning "every launch site".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Selection state, as held by the page and sent with every request
// ---------------------------------------------------------------------------

/// The site dropdown value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Interpret a dropdown value; the `ALL` sentinel (and an empty value)
    /// selects every site.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.launch_site == *site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => f.write_str(ALL_SITES),
            SiteSelection::Site(site) => f.write_str(site),
        }
    }
}

/// Inclusive payload range `[low, high]` in kilograms. `low > high` is
/// allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, mass_kg: f64) -> bool {
        mass_kg >= self.low && mass_kg <= self.high
    }
}

/// Site + payload range.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

impl Selection {
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        self.payload.contains(record.payload_mass_kg) && self.site.matches(record)
    }
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

/// Records of the selected site(s), in dataset order.
pub fn site_records<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset.records.iter().filter(move |rec| site.matches(rec))
}

/// Return indices of records passing both the payload range and the site
/// filter.
pub fn filtered_indices(dataset: &LaunchDataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Outcome;

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            LaunchRecord::new("A", 1000.0, Outcome::Success, "v1.0"),
            LaunchRecord::new("A", 6000.0, Outcome::Failure, "FT"),
            LaunchRecord::new("B", 3000.0, Outcome::Success, "FT"),
        ])
    }

    #[test]
    fn all_sentinel_and_blank_select_everything() {
        assert_eq!(SiteSelection::parse("ALL"), SiteSelection::All);
        assert_eq!(SiteSelection::parse("  "), SiteSelection::All);
        assert_eq!(
            SiteSelection::parse("KSC LC-39A"),
            SiteSelection::Site("KSC LC-39A".into())
        );
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = PayloadRange::new(1000.0, 3000.0);
        assert!(range.contains(1000.0));
        assert!(range.contains(3000.0));
        assert!(!range.contains(3000.1));
    }

    #[test]
    fn range_and_site_filters_combine() {
        let ds = dataset();
        let sel = Selection {
            site: SiteSelection::Site("A".into()),
            payload: PayloadRange::new(0.0, 5000.0),
        };
        assert_eq!(filtered_indices(&ds, &sel), vec![0]);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let ds = dataset();
        let sel = Selection {
            site: SiteSelection::All,
            payload: PayloadRange::new(8000.0, 2000.0),
        };
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn unknown_site_matches_nothing() {
        let ds = dataset();
        let site = SiteSelection::Site("Z".into());
        assert_eq!(site_records(&ds, &site).count(), 0);
    }
}
