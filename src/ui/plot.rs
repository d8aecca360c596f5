use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::color::ColorMap;
use crate::data::aggregate::{
    self, GroupCount, GroupRate, OutcomeDistribution, ScatterPoint,
};
use crate::data::filter::Selection;
use crate::state::DashboardState;

const EMPTY_MESSAGE: &str = "No launches match the current selection";

// ---------------------------------------------------------------------------
// Figure – a Plotly document
// ---------------------------------------------------------------------------

/// A Plotly figure: `Plotly.react(div, figure.data, figure.layout)`.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    fn new(title: &str, data: Vec<Value>, mut layout: Value) -> Self {
        layout["title"] = json!({ "text": title });
        if data.is_empty() {
            layout["annotations"] = json!([{
                "text": EMPTY_MESSAGE,
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": 0.5,
                "y": 0.5,
            }]);
        }
        Figure { data, layout }
    }
}

/// The four selection-independent bar charts.
#[derive(Debug, Clone, Serialize)]
pub struct InsightFigures {
    pub site_success: Figure,
    pub site_success_rate: Figure,
    pub payload_success_rate: Figure,
    pub booster_success_rate: Figure,
}

/// Every chart panel of the page, keyed by its element id.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardFigures {
    #[serde(rename = "success-pie-chart")]
    pub outcome: Figure,
    #[serde(rename = "success-payload-scatter-chart")]
    pub scatter: Figure,
    #[serde(rename = "site-success-bar")]
    pub site_success: Figure,
    #[serde(rename = "site-success-rate-bar")]
    pub site_success_rate: Figure,
    #[serde(rename = "payload-success-rate-bar")]
    pub payload_success_rate: Figure,
    #[serde(rename = "booster-success-rate-bar")]
    pub booster_success_rate: Figure,
}

// ---------------------------------------------------------------------------
// Chart builders
// ---------------------------------------------------------------------------

/// Pie chart of the outcome distribution.
pub fn outcome_pie(dist: &OutcomeDistribution, site_colors: &ColorMap) -> Figure {
    let slices = dist.slices();
    let (title, colors): (String, Vec<&str>) = match dist {
        OutcomeDistribution::SuccessesBySite { .. } => (
            "Total Successful Launches by Site".to_string(),
            slices.iter().map(|s| site_colors.color_for(&s.label)).collect(),
        ),
        OutcomeDistribution::SiteOutcomes { site, .. } => (
            format!("Success vs Failure for site {site}"),
            slices
                .iter()
                .map(|s| if s.label == "Success" { "#2ca02c" } else { "#d62728" })
                .collect(),
        ),
    };

    // A pie of all-zero slices draws nothing; treat it as an empty view.
    let data = if dist.total() == 0.0 {
        Vec::new()
    } else {
        vec![json!({
            "type": "pie",
            "labels": slices.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            "values": slices.iter().map(|s| s.value).collect::<Vec<_>>(),
            "marker": { "colors": colors },
            "sort": false,
        })]
    };

    Figure::new(&title, data, json!({}))
}

/// Payload vs outcome scatter, one trace per booster category.
pub fn payload_scatter(points: &[ScatterPoint], booster_colors: &ColorMap) -> Figure {
    let mut by_booster: BTreeMap<&str, Vec<&ScatterPoint>> = BTreeMap::new();
    for p in points {
        by_booster.entry(p.booster_category.as_str()).or_default().push(p);
    }

    let data = by_booster
        .into_iter()
        .map(|(booster, pts)| {
            json!({
                "type": "scatter",
                "mode": "markers",
                "name": booster,
                "x": pts.iter().map(|p| p.payload_mass_kg).collect::<Vec<_>>(),
                "y": pts.iter().map(|p| p.class).collect::<Vec<_>>(),
                "text": pts.iter().map(|p| hover_text(p)).collect::<Vec<_>>(),
                "marker": { "color": booster_colors.color_for(booster), "size": 10 },
            })
        })
        .collect();

    Figure::new(
        "Payload vs Launch Outcome",
        data,
        json!({
            "xaxis": { "title": { "text": "Payload Mass (kg)" } },
            "yaxis": { "title": { "text": "class" }, "tickvals": [0, 1] },
            "legend": { "title": { "text": "Booster Version Category" } },
        }),
    )
}

fn hover_text(p: &ScatterPoint) -> String {
    let mut text = p.launch_site.clone();
    if let Some(n) = p.flight_number {
        text.push_str(&format!("<br>Flight {n}"));
    }
    if let Some(version) = &p.booster_version {
        text.push_str(&format!("<br>{version}"));
    }
    text
}

/// Bar chart of per-group counts.
pub fn count_bar(title: &str, x_label: &str, groups: &[GroupCount], colors: &ColorMap) -> Figure {
    let data = if groups.is_empty() {
        Vec::new()
    } else {
        vec![json!({
            "type": "bar",
            "x": groups.iter().map(|g| g.key.as_str()).collect::<Vec<_>>(),
            "y": groups.iter().map(|g| g.count).collect::<Vec<_>>(),
            "marker": { "color": groups.iter().map(|g| colors.color_for(&g.key)).collect::<Vec<_>>() },
        })]
    };
    Figure::new(
        title,
        data,
        json!({
            "xaxis": { "title": { "text": x_label } },
            "yaxis": { "title": { "text": "class" } },
        }),
    )
}

/// Bar chart of per-group success rates. Groups without launches plot as
/// gaps (`null`).
pub fn rate_bar(title: &str, x_label: &str, groups: &[GroupRate], colors: Option<&ColorMap>) -> Figure {
    let data = if groups.iter().all(|g| g.rate.is_none()) {
        Vec::new()
    } else {
        let mut trace = json!({
            "type": "bar",
            "x": groups.iter().map(|g| g.key.as_str()).collect::<Vec<_>>(),
            "y": groups.iter().map(|g| g.rate).collect::<Vec<_>>(),
            "customdata": groups.iter().map(|g| g.launches).collect::<Vec<_>>(),
            "hovertemplate": "%{x}: %{y:.0%} of %{customdata} launches<extra></extra>",
        });
        if let Some(colors) = colors {
            trace["marker"] = json!({
                "color": groups.iter().map(|g| colors.color_for(&g.key)).collect::<Vec<_>>(),
            });
        }
        vec![trace]
    };
    Figure::new(
        title,
        data,
        json!({
            "xaxis": { "title": { "text": x_label } },
            "yaxis": { "title": { "text": "class" }, "range": [0, 1] },
        }),
    )
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

pub fn outcome_figure(state: &DashboardState, selection: &Selection) -> Figure {
    let dist = aggregate::outcome_distribution(&state.dataset, &selection.site);
    log::debug!(
        "outcome pie for {}: {} slices, total {}",
        selection.site,
        dist.slices().len(),
        dist.total()
    );
    outcome_pie(&dist, &state.site_colors)
}

pub fn scatter_figure(state: &DashboardState, selection: &Selection) -> Figure {
    let points = aggregate::payload_scatter(&state.dataset, selection);
    log::debug!(
        "scatter for {} [{}, {}]: {} launches",
        selection.site,
        selection.payload.low,
        selection.payload.high,
        points.len()
    );
    payload_scatter(&points, &state.booster_colors)
}

pub fn insight_figures(state: &DashboardState) -> InsightFigures {
    let site = aggregate::site_insights(&state.dataset);
    let payload = aggregate::payload_booster_insights(&state.dataset);

    InsightFigures {
        site_success: count_bar(
            "Successful Launches by Site",
            "Launch Site",
            &site.success_counts,
            &state.site_colors,
        ),
        site_success_rate: rate_bar(
            "Launch Success Rate by Site",
            "Launch Site",
            &site.success_rates,
            Some(&state.site_colors),
        ),
        payload_success_rate: rate_bar(
            "Launch Success Rate by Payload Range",
            "Payload Range",
            &payload.bucket_rates,
            None,
        ),
        booster_success_rate: rate_bar(
            "Launch Success Rate by Booster Version",
            "Booster Version Category",
            &payload.booster_rates,
            Some(&state.booster_colors),
        ),
    }
}

pub fn dashboard_figures(state: &DashboardState, selection: &Selection) -> DashboardFigures {
    let insights = insight_figures(state);
    DashboardFigures {
        outcome: outcome_figure(state, selection),
        scatter: scatter_figure(state, selection),
        site_success: insights.site_success,
        site_success_rate: insights.site_success_rate,
        payload_success_rate: insights.payload_success_rate,
        booster_success_rate: insights.booster_success_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::Slice;

    fn colors() -> ColorMap {
        ColorMap::new(["A", "B", "FT", "v1.1"])
    }

    #[test]
    fn all_sites_pie_uses_site_labels() {
        let dist = OutcomeDistribution::SuccessesBySite {
            slices: vec![
                Slice { label: "A".into(), value: 1.0 },
                Slice { label: "B".into(), value: 3.0 },
            ],
        };
        let fig = outcome_pie(&dist, &colors());
        assert_eq!(fig.layout["title"]["text"], "Total Successful Launches by Site");
        assert_eq!(fig.data[0]["labels"], json!(["A", "B"]));
        assert_eq!(fig.data[0]["values"], json!([1.0, 3.0]));
    }

    #[test]
    fn pie_without_successes_shows_the_placeholder() {
        let dist = OutcomeDistribution::SuccessesBySite {
            slices: vec![
                Slice { label: "A".into(), value: 0.0 },
                Slice { label: "B".into(), value: 0.0 },
            ],
        };
        let fig = outcome_pie(&dist, &colors());
        assert!(fig.data.is_empty());
        assert_eq!(fig.layout["annotations"][0]["text"], EMPTY_MESSAGE);
    }

    #[test]
    fn scatter_splits_traces_by_booster() {
        let points = vec![
            ScatterPoint {
                payload_mass_kg: 1000.0,
                class: 1,
                booster_category: "v1.1".into(),
                launch_site: "A".into(),
                flight_number: Some(7),
                booster_version: None,
            },
            ScatterPoint {
                payload_mass_kg: 3000.0,
                class: 0,
                booster_category: "FT".into(),
                launch_site: "B".into(),
                flight_number: None,
                booster_version: Some("F9 FT B1021.1".into()),
            },
        ];
        let fig = payload_scatter(&points, &colors());
        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.data[0]["name"], "FT");
        assert_eq!(fig.data[0]["y"], json!([0]));
        assert_eq!(fig.data[1]["x"], json!([1000.0]));
        assert_eq!(fig.data[1]["text"], json!(["A<br>Flight 7"]));
        assert!(fig.layout.get("annotations").is_none());
    }

    #[test]
    fn empty_views_get_a_placeholder_annotation() {
        let fig = payload_scatter(&[], &colors());
        assert!(fig.data.is_empty());
        assert_eq!(fig.layout["annotations"][0]["text"], EMPTY_MESSAGE);

        let fig = rate_bar(
            "Launch Success Rate by Payload Range",
            "Payload Range",
            &[GroupRate { key: "0-2500".into(), rate: None, launches: 0 }],
            None,
        );
        assert!(fig.data.is_empty());
    }

    #[test]
    fn rate_bars_keep_gaps_for_empty_groups() {
        let fig = rate_bar(
            "Launch Success Rate by Payload Range",
            "Payload Range",
            &[
                GroupRate { key: "0-2500".into(), rate: Some(0.5), launches: 2 },
                GroupRate { key: "2500-5000".into(), rate: None, launches: 0 },
            ],
            None,
        );
        assert_eq!(fig.data[0]["y"], json!([0.5, null]));
        assert_eq!(fig.layout["yaxis"]["range"], json!([0, 1]));
    }
}
