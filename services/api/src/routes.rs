use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use playbook::import::MeetingCsvImporter;
use playbook::playbook::{
    build_report, playbook_router, Period, PlaybookReport, PlaybookService, RecordSet,
    RecordStore, ReportOptions,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub(crate) struct PlaybookReportRequest {
    #[serde(default)]
    pub(crate) records: RecordSet,
    #[serde(default)]
    pub(crate) meetings_csv: Option<String>,
    #[serde(default)]
    pub(crate) period: Period,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlaybookReportResponse {
    pub(crate) data_source: ReportDataSource,
    pub(crate) imported_meetings: usize,
    #[serde(flatten)]
    pub(crate) report: PlaybookReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ReportDataSource {
    Snapshot,
    SnapshotWithCsv,
}

pub(crate) fn with_playbook_routes<S>(service: Arc<PlaybookService<S>>) -> axum::Router
where
    S: RecordStore + 'static,
{
    let options = *service.options();
    playbook_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/playbook/report",
            axum::routing::post(playbook_report_endpoint),
        )
        .layer(Extension(options))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless report over a posted record set, for clients that keep their own
/// storage.
pub(crate) async fn playbook_report_endpoint(
    Extension(mut options): Extension<ReportOptions>,
    Json(payload): Json<PlaybookReportRequest>,
) -> Response {
    let PlaybookReportRequest {
        mut records,
        meetings_csv,
        period,
        now,
        top,
    } = payload;

    match top {
        Some(0) => {
            let payload = json!({ "error": "top must be at least 1" });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        Some(top) => options.top_n = top,
        None => {}
    }

    let (data_source, imported_meetings) = match meetings_csv {
        Some(csv) => match MeetingCsvImporter::merge_into(&mut records, Cursor::new(csv)) {
            Ok(imported) => (ReportDataSource::SnapshotWithCsv, imported),
            Err(err) => {
                warn!(error = %err, "posted meeting csv rejected");
                return playbook::error::AppError::from(err).into_response();
            }
        },
        None => (ReportDataSource::Snapshot, 0),
    };

    let now = now.unwrap_or_else(Utc::now);
    let report = build_report(&records, period, now, &options);

    Json(PlaybookReportResponse {
        data_source,
        imported_meetings,
        report,
    })
    .into_response()
}
