use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::data::filter::Selection;
use crate::error::ApiError;
use crate::state::SharedState;
use crate::ui::plot::{self, DashboardFigures, Figure, InsightFigures};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the dashboard router over the shared, read-only state.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        // Page
        .route("/", get(index))
        .route("/healthz", get(healthz))
        // API endpoints
        .route("/api/summary", get(summary))
        .route("/api/dashboard", get(dashboard))
        .route("/api/figures/outcome", get(outcome_figure))
        .route("/api/figures/scatter", get(scatter_figure))
        .route("/api/figures/insights", get(insight_figures))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Selection as sent by the page. Bounds are kept as text so a bad value
/// produces our own error body instead of a bare extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub site: Option<String>,
    pub low: Option<String>,
    pub high: Option<String>,
}

fn parse_bound(name: &'static str, raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ApiError::BadParameter {
            name,
            reason: format!("'{raw}' is not a finite number"),
        }),
    }
}

impl SelectionQuery {
    fn resolve(&self, state: &SharedState) -> Result<Selection, ApiError> {
        let low = parse_bound("low", self.low.as_deref())?;
        let high = parse_bound("high", self.high.as_deref())?;
        Ok(state.selection(self.site.as_deref(), low, high))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET / - the dashboard page
pub async fn index(State(state): State<SharedState>) -> Html<String> {
    Html(panels::dashboard_page(&state))
}

pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Summary {
    pub records: usize,
    pub sites: Vec<String>,
    pub booster_categories: Vec<String>,
    pub payload_min: Option<f64>,
    pub payload_max: Option<f64>,
    pub slider_min: f64,
    pub slider_max: f64,
    pub slider_step: f64,
}

/// GET /api/summary - dropdown options and slider bounds
pub async fn summary(State(state): State<SharedState>) -> Json<Summary> {
    let ds = &state.dataset;
    Json(Summary {
        records: ds.len(),
        sites: ds.sites.clone(),
        booster_categories: ds.booster_categories.clone(),
        payload_min: ds.payload_bounds.map(|(lo, _)| lo),
        payload_max: ds.payload_bounds.map(|(_, hi)| hi),
        slider_min: state.slider.min,
        slider_max: state.slider.max,
        slider_step: state.slider.step,
    })
}

/// GET /api/dashboard?site=&low=&high= - all six panels for one interaction
pub async fn dashboard(
    State(state): State<SharedState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<DashboardFigures>, ApiError> {
    let selection = query.resolve(&state)?;
    Ok(Json(plot::dashboard_figures(&state, &selection)))
}

/// GET /api/figures/outcome?site= - success pie
pub async fn outcome_figure(
    State(state): State<SharedState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Figure>, ApiError> {
    let selection = query.resolve(&state)?;
    Ok(Json(plot::outcome_figure(&state, &selection)))
}

/// GET /api/figures/scatter?site=&low=&high= - payload vs outcome
pub async fn scatter_figure(
    State(state): State<SharedState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Figure>, ApiError> {
    let selection = query.resolve(&state)?;
    Ok(Json(plot::scatter_figure(&state, &selection)))
}

/// GET /api/figures/insights - the four insight bars
pub async fn insight_figures(State(state): State<SharedState>) -> Json<InsightFigures> {
    Json(plot::insight_figures(&state))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::SliderConfig;
    use crate::data::model::{LaunchDataset, LaunchRecord, Outcome};
    use crate::state::DashboardState;

    fn router() -> Router {
        let dataset = LaunchDataset::from_records(vec![
            LaunchRecord::new("A", 1000.0, Outcome::Success, "v1.1"),
            LaunchRecord::new("A", 6000.0, Outcome::Failure, "FT"),
            LaunchRecord::new("B", 3000.0, Outcome::Success, "FT"),
        ]);
        build_router(DashboardState::new(dataset, SliderConfig::default()).shared())
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json(uri: &str) -> Value {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn page_is_served() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("SpaceX Launch Records Dashboard"));
        assert!(html.contains(r#"<option value="B">B</option>"#));
    }

    #[tokio::test]
    async fn summary_reports_options_and_bounds() {
        let (status, body) = get("/api/summary").await;
        assert_eq!(status, StatusCode::OK);
        let summary: Summary = serde_json::from_slice(&body).unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.sites, vec!["A", "B"]);
        assert_eq!(summary.payload_min, Some(1000.0));
        assert_eq!(summary.payload_max, Some(6000.0));
        assert_eq!(summary.slider_step, 1000.0);
    }

    #[tokio::test]
    async fn site_pie_for_one_site() {
        let fig = get_json("/api/figures/outcome?site=B").await;
        assert_eq!(fig["layout"]["title"]["text"], "Success vs Failure for site B");
        assert_eq!(fig["data"][0]["labels"], serde_json::json!(["Success"]));
        assert_eq!(fig["data"][0]["values"], serde_json::json!([1.0]));
    }

    #[tokio::test]
    async fn scatter_respects_payload_range() {
        let fig = get_json("/api/figures/scatter?site=ALL&low=2000&high=5000").await;
        let traces = fig["data"].as_array().unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0]["name"], "FT");
        assert_eq!(traces[0]["x"], serde_json::json!([3000.0]));
    }

    #[tokio::test]
    async fn inverted_range_gives_empty_scatter() {
        let fig = get_json("/api/figures/scatter?low=9000&high=1000").await;
        assert_eq!(fig["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn non_numeric_bound_is_a_bad_request() {
        let (status, body) = get("/api/dashboard?low=heavy").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert!(err["error"].as_str().unwrap().contains("'low'"));
    }

    #[tokio::test]
    async fn dashboard_returns_every_panel() {
        let figs = get_json("/api/dashboard?site=A&low=0&high=10000").await;
        for id in [
            "success-pie-chart",
            "success-payload-scatter-chart",
            "site-success-bar",
            "site-success-rate-bar",
            "payload-success-rate-bar",
            "booster-success-rate-bar",
        ] {
            assert!(figs.get(id).is_some(), "{id}");
        }
        assert_eq!(
            figs["site-success-rate-bar"]["data"][0]["y"],
            serde_json::json!([0.5, 1.0])
        );
    }

    #[tokio::test]
    async fn insights_ignore_selection() {
        let figs = get_json("/api/figures/insights").await;
        assert_eq!(figs["site_success"]["data"][0]["y"], serde_json::json!([1, 1]));
        assert_eq!(
            figs["payload_success_rate"]["data"][0]["x"],
            serde_json::json!(["0-2500", "2500-5000", "5000-7500", "7500-10000"])
        );
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = get("/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }
}
