use crate::data::filter::ALL_SITES;
use crate::state::DashboardState;

const PAGE_TEMPLATE: &str = include_str!("../../templates/dashboard.html");

// ---------------------------------------------------------------------------
// Dashboard page
// ---------------------------------------------------------------------------

/// Render the dashboard page: site dropdown, payload range control and the
/// six (initially empty) chart panels. The inline script fills the charts.
pub fn dashboard_page(state: &DashboardState) -> String {
    let range = state.initial_range();
    let slider = &state.slider;

    PAGE_TEMPLATE
        .replace("{{SITE_OPTIONS}}", &site_options(&state.dataset.sites))
        .replace("{{SLIDER_MIN}}", &slider.min.to_string())
        .replace("{{SLIDER_MAX}}", &slider.max.to_string())
        .replace("{{SLIDER_STEP}}", &slider.step.to_string())
        .replace("{{SLIDER_MARKS}}", &slider_marks(&slider.marks))
        .replace("{{RANGE_LOW}}", &range.low.to_string())
        .replace("{{RANGE_HIGH}}", &range.high.to_string())
}

/// `<option>`s for the site dropdown: `All Sites` first, then every site in
/// order of first appearance.
fn site_options(sites: &[String]) -> String {
    let mut html = format!(r#"    <option value="{ALL_SITES}" selected>All Sites</option>"#);
    for site in sites {
        let site = escape_html(site);
        html.push_str(&format!("\n    <option value=\"{site}\">{site}</option>"));
    }
    html
}

fn slider_marks(marks: &[f64]) -> String {
    marks
        .iter()
        .map(|m| format!("<span>{m}</span>"))
        .collect::<Vec<_>>()
        .join("")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SliderConfig;
    use crate::data::model::{LaunchDataset, LaunchRecord, Outcome};

    fn state() -> DashboardState {
        DashboardState::new(
            LaunchDataset::from_records(vec![
                LaunchRecord::new("VAFB SLC-4E", 500.0, Outcome::Failure, "v1.1"),
                LaunchRecord::new("CCAFS LC-40", 9600.0, Outcome::Success, "B5"),
            ]),
            SliderConfig::default(),
        )
    }

    #[test]
    fn page_lists_sites_after_the_all_option() {
        let html = dashboard_page(&state());
        let all = html.find(r#"value="ALL""#).unwrap();
        let vafb = html.find(r#"value="VAFB SLC-4E""#).unwrap();
        let ccafs = html.find(r#"value="CCAFS LC-40""#).unwrap();
        assert!(all < vafb && vafb < ccafs);
        assert!(!html.contains("{{"));
    }

    #[test]
    fn slider_starts_at_observed_payload_bounds() {
        let html = dashboard_page(&state());
        assert!(html.contains(r#"id="payload-low" min="0" max="10000" step="1000" value="500""#));
        assert!(html.contains(r#"value="9600""#));
        assert!(html.contains("<span>2500</span>"));
    }

    #[test]
    fn every_chart_panel_is_present() {
        let html = dashboard_page(&state());
        for id in [
            "success-pie-chart",
            "success-payload-scatter-chart",
            "site-success-bar",
            "site-success-rate-bar",
            "payload-success-rate-bar",
            "booster-success-rate-bar",
        ] {
            assert!(html.contains(&format!(r#"<div id="{id}""#)), "{id}");
        }
    }

    #[test]
    fn site_names_are_escaped() {
        assert_eq!(
            site_options(&["<b>".to_string()]).lines().nth(1),
            Some(r#"    <option value="&lt;b&gt;">&lt;b&gt;</option>"#)
        );
    }
}
