use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::{filtered_indices, site_records, Selection, SiteSelection};
use super::model::{LaunchDataset, LaunchRecord, Outcome, PayloadBucket};

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// One labelled pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// Pie view for the site dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeDistribution {
    /// `ALL`: number of successful launches per site (every site listed).
    SuccessesBySite { slices: Vec<Slice> },
    /// One site: launches per outcome that occurs there.
    SiteOutcomes { site: String, slices: Vec<Slice> },
}

impl OutcomeDistribution {
    pub fn slices(&self) -> &[Slice] {
        match self {
            OutcomeDistribution::SuccessesBySite { slices }
            | OutcomeDistribution::SiteOutcomes { slices, .. } => slices,
        }
    }

    /// Sum of all slice values.
    pub fn total(&self) -> f64 {
        self.slices().iter().map(|s| s.value).sum()
    }
}

/// A launch as plotted on the payload/outcome scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
    pub booster_category: String,
    pub launch_site: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

impl From<&LaunchRecord> for ScatterPoint {
    fn from(rec: &LaunchRecord) -> Self {
        Self {
            payload_mass_kg: rec.payload_mass_kg,
            class: rec.outcome.as_class(),
            booster_category: rec.booster_category.clone(),
            launch_site: rec.launch_site.clone(),
            flight_number: rec.flight_number,
            booster_version: rec.booster_version.clone(),
        }
    }
}

/// Per-group count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// Per-group mean outcome. `rate` is `None` when the group has no launches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub key: String,
    pub rate: Option<f64>,
    pub launches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteInsights {
    pub success_counts: Vec<GroupCount>,
    pub success_rates: Vec<GroupRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadBoosterInsights {
    pub bucket_rates: Vec<GroupRate>,
    pub booster_rates: Vec<GroupRate>,
}

// ---------------------------------------------------------------------------
// Mean accumulator
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    n: usize,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn mean(self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

fn mean_outcome_by<K, I>(pairs: I) -> BTreeMap<K, MeanAcc>
where
    K: Ord,
    I: IntoIterator<Item = (K, Outcome)>,
{
    let mut groups: BTreeMap<K, MeanAcc> = BTreeMap::new();
    for (key, outcome) in pairs {
        groups.entry(key).or_default().push(outcome.as_f64());
    }
    groups
}

fn to_rate(key: String, acc: MeanAcc) -> GroupRate {
    GroupRate {
        key,
        rate: acc.mean(),
        launches: acc.n,
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Pie data for the dropdown selection.
///
/// * `ALL` → sum of `class` per site, every site present.
/// * one site → count of launches per outcome observed at that site
///   (Success first). An unknown site gives no slices.
pub fn outcome_distribution(dataset: &LaunchDataset, site: &SiteSelection) -> OutcomeDistribution {
    match site {
        SiteSelection::All => {
            let mut per_site: BTreeMap<&str, f64> = BTreeMap::new();
            for rec in &dataset.records {
                *per_site.entry(rec.launch_site.as_str()).or_default() += rec.outcome.as_f64();
            }
            OutcomeDistribution::SuccessesBySite {
                slices: per_site
                    .into_iter()
                    .map(|(site, value)| Slice {
                        label: site.to_string(),
                        value,
                    })
                    .collect(),
            }
        }
        SiteSelection::Site(name) => {
            let mut counts: BTreeMap<Outcome, usize> = BTreeMap::new();
            for rec in site_records(dataset, site) {
                *counts.entry(rec.outcome).or_default() += 1;
            }
            let slices = [Outcome::Success, Outcome::Failure]
                .into_iter()
                .filter_map(|outcome| {
                    counts.get(&outcome).map(|&n| Slice {
                        label: outcome.label().to_string(),
                        value: n as f64,
                    })
                })
                .collect();
            OutcomeDistribution::SiteOutcomes {
                site: name.clone(),
                slices,
            }
        }
    }
}

/// Launches inside the payload range (and site), unmodified, in dataset order.
pub fn payload_scatter(dataset: &LaunchDataset, selection: &Selection) -> Vec<ScatterPoint> {
    filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| ScatterPoint::from(&dataset.records[i]))
        .collect()
}

/// Successful launches per site and success rate per site, over the whole
/// dataset.
pub fn site_insights(dataset: &LaunchDataset) -> SiteInsights {
    let mut success_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in dataset.records.iter().filter(|r| r.outcome.is_success()) {
        *success_counts.entry(rec.launch_site.as_str()).or_default() += 1;
    }

    let rates = mean_outcome_by(
        dataset
            .records
            .iter()
            .map(|r| (r.launch_site.as_str(), r.outcome)),
    );

    SiteInsights {
        success_counts: success_counts
            .into_iter()
            .map(|(key, count)| GroupCount {
                key: key.to_string(),
                count,
            })
            .collect(),
        success_rates: rates
            .into_iter()
            .map(|(key, acc)| to_rate(key.to_string(), acc))
            .collect(),
    }
}

/// Success rate per payload bucket (all four buckets, empty ones without a
/// rate) and per booster category.
pub fn payload_booster_insights(dataset: &LaunchDataset) -> PayloadBoosterInsights {
    let by_bucket = mean_outcome_by(
        dataset
            .records
            .iter()
            .filter_map(|r| r.payload_bucket().map(|b| (b, r.outcome))),
    );
    let bucket_rates = PayloadBucket::ALL
        .into_iter()
        .map(|bucket| {
            let acc = by_bucket.get(&bucket).copied().unwrap_or_default();
            to_rate(bucket.label().to_string(), acc)
        })
        .collect();

    let booster_rates = mean_outcome_by(
        dataset
            .records
            .iter()
            .map(|r| (r.booster_category.as_str(), r.outcome)),
    )
    .into_iter()
    .map(|(key, acc)| to_rate(key.to_string(), acc))
    .collect();

    PayloadBoosterInsights {
        bucket_rates,
        booster_rates,
    }
}
