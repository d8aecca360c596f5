use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Outcome – the `class` column
// ---------------------------------------------------------------------------

/// Binary launch outcome. `class == 1` is a successful landing/recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Parse the numeric `class` value; anything but 0/1 is rejected.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    /// The numeric `class` value (0 or 1).
    pub fn as_class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.as_class())
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PayloadBucket – derived payload range column
// ---------------------------------------------------------------------------

/// Upper edge of the bucketed payload axis, in kilograms.
pub const PAYLOAD_AXIS_MAX: f64 = 10_000.0;

/// One of four fixed-width payload ranges partitioning `[0, 10000]` kg.
///
/// Intervals are right-inclusive, `(lo, hi]`, except the first which also
/// contains 0: `[0, 2500]`, `(2500, 5000]`, `(5000, 7500]`, `(7500, 10000]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PayloadBucket {
    #[serde(rename = "0-2500")]
    Light,
    #[serde(rename = "2500-5000")]
    Medium,
    #[serde(rename = "5000-7500")]
    Heavy,
    #[serde(rename = "7500-10000")]
    SuperHeavy,
}

impl PayloadBucket {
    pub const ALL: [PayloadBucket; 4] = [
        PayloadBucket::Light,
        PayloadBucket::Medium,
        PayloadBucket::Heavy,
        PayloadBucket::SuperHeavy,
    ];

    /// Bucket edges `(lo, hi)` in kilograms.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            PayloadBucket::Light => (0.0, 2_500.0),
            PayloadBucket::Medium => (2_500.0, 5_000.0),
            PayloadBucket::Heavy => (5_000.0, 7_500.0),
            PayloadBucket::SuperHeavy => (7_500.0, PAYLOAD_AXIS_MAX),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PayloadBucket::Light => "0-2500",
            PayloadBucket::Medium => "2500-5000",
            PayloadBucket::Heavy => "5000-7500",
            PayloadBucket::SuperHeavy => "7500-10000",
        }
    }

    /// Bucket a payload mass. Masses outside `[0, 10000]` (and NaN) have no
    /// bucket.
    pub fn from_mass(mass_kg: f64) -> Option<Self> {
        if !(0.0..=PAYLOAD_AXIS_MAX).contains(&mass_kg) {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|bucket| mass_kg <= bucket.bounds().1)
    }
}

impl fmt::Display for PayloadBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the launch table
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    /// `Flight Number`, when the source table carries it.
    pub flight_number: Option<u32>,
    /// `Launch Site`.
    pub launch_site: String,
    /// `Payload Mass (kg)`.
    pub payload_mass_kg: f64,
    /// `class`.
    pub outcome: Outcome,
    /// `Booster Version`, when present (hover text only).
    pub booster_version: Option<String>,
    /// `Booster Version Category`.
    pub booster_category: String,
}

impl LaunchRecord {
    /// Convenience constructor for the four required columns.
    #[cfg(test)]
    pub fn new(site: &str, payload_mass_kg: f64, outcome: Outcome, booster_category: &str) -> Self {
        Self {
            flight_number: None,
            launch_site: site.to_string(),
            payload_mass_kg,
            outcome,
            booster_version: None,
            booster_category: booster_category.to_string(),
        }
    }

    /// The derived payload bucket for this row.
    pub fn payload_bucket(&self) -> Option<PayloadBucket> {
        PayloadBucket::from_mass(self.payload_mass_kg)
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full launch table with pre-computed column indices. Never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    /// All launches (rows), in file order.
    pub records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    pub sites: Vec<String>,
    /// Distinct booster categories, sorted.
    pub booster_categories: Vec<String>,
    /// Observed `(min, max)` payload mass; `None` for an empty table.
    pub payload_bounds: Option<(f64, f64)>,
}

impl LaunchDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut boosters: BTreeSet<String> = BTreeSet::new();
        let mut payload_bounds: Option<(f64, f64)> = None;

        for rec in &records {
            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            boosters.insert(rec.booster_category.clone());

            let m = rec.payload_mass_kg;
            payload_bounds = Some(match payload_bounds {
                Some((lo, hi)) => (lo.min(m), hi.max(m)),
                None => (m, m),
            });
        }

        LaunchDataset {
            records,
            sites,
            booster_categories: boosters.into_iter().collect(),
            payload_bounds,
        }
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }
}
