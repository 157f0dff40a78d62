use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::aggregate::{
    Bucket, DeveloperEffort, KpiSummary, StatusCount, TimeSeriesPoint, developer_effort,
    kpi_summary, status_distribution, time_series,
};
use crate::export::to_csv;
use crate::filter::filter_window;
use crate::graph::{self, GraphOptions};
use crate::ingest::ingest;
use crate::record::{ActivityRecord, RecordStore, UploadMeta};

/// Shared server state: one record store per process, replaced wholesale on
/// upload so concurrent readers see either the old or the new dataset
pub struct AppState {
    store: RwLock<RecordStore>,
}

/// Query parameters shared by the data and chart endpoints
#[derive(Deserialize)]
struct ViewQuery {
    /// Trailing window in days; 0 or absent means all data
    window: Option<u32>,
    /// Time-series bucket granularity; defaults to day
    bucket: Option<Bucket>,
}

#[derive(Serialize)]
struct UploadResponse {
    status: String,
    rows: Option<usize>,
    message: Option<String>,
}

#[derive(Serialize)]
struct DashboardResponse {
    kpis: KpiSummary,
    time_series: Vec<TimeSeriesPoint>,
    status_distribution: Vec<StatusCount>,
    developer_effort: Vec<DeveloperEffort>,
    records: Vec<ActivityRecord>,
    upload: Option<UploadMeta>,
}

fn error_body(message: impl ToString) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "error",
        "message": message.to_string(),
    }))
}

/// Start the dashboard server on the given port
pub async fn run(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState {
        store: RwLock::new(RecordStore::new()),
    });

    let app = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/upload", post(upload_csv))
        .route("/api/dashboard", get(dashboard_data))
        .route("/api/export", get(export_csv))
        .route("/charts/timeseries.png", get(timeseries_chart))
        .route("/charts/status.png", get(status_chart))
        .route("/charts/effort.png", get(effort_chart))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    info!("listening on http://127.0.0.1:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

/// Accept a CSV upload and replace the record store
///
/// Ingestion is all-or-nothing: on any parse or schema failure the previous
/// dataset is left untouched and the error message is returned for display.
async fn upload_csv(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut file_data = Vec::new();
    let mut filename = String::from("upload.csv");

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        if field.name().unwrap_or("") == "file" {
            if let Some(name) = field.file_name() {
                filename = name.to_string();
            }
            file_data = field.bytes().await.unwrap_or_default().to_vec();
        }
    }

    if file_data.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            error_body("no file data received"),
        )
            .into_response();
    }

    match ingest(&file_data) {
        Ok(records) => {
            let rows = records.len();
            let mut store = state.store.write().unwrap();
            store.replace(records, &filename);
            info!("accepted upload `{filename}` with {rows} rows");

            Json(UploadResponse {
                status: "ok".to_string(),
                rows: Some(rows),
                message: None,
            })
            .into_response()
        }
        Err(e) => {
            warn!("rejected upload `{filename}`: {e}");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                error_body(e),
            )
                .into_response()
        }
    }
}

/// Recompute every dashboard view for the requested window
///
/// Each call is a fresh, total function of (stored records, query); an empty
/// store yields the explicit empty payload rather than an error.
async fn dashboard_data(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let window = query.window.unwrap_or(0);
    let bucket = query.bucket.unwrap_or_default();

    let (records, upload) = {
        let store = state.store.read().unwrap();
        (
            filter_window(store.records(), window),
            store.meta().cloned(),
        )
    };

    let kpis = match kpi_summary(&records) {
        Ok(kpis) => kpis,
        Err(e) => return aggregation_failure(e),
    };
    let developer_effort = match developer_effort(&records) {
        Ok(rows) => rows,
        Err(e) => return aggregation_failure(e),
    };

    Json(DashboardResponse {
        kpis,
        time_series: time_series(&records, bucket),
        status_distribution: status_distribution(&records),
        developer_effort,
        records,
        upload,
    })
    .into_response()
}

/// Download the filtered record set as a CSV attachment
async fn export_csv(Query(query): Query<ViewQuery>, State(state): State<Arc<AppState>>) -> Response {
    let window = query.window.unwrap_or(0);
    let records = {
        let store = state.store.read().unwrap();
        filter_window(store.records(), window)
    };

    match to_csv(&records) {
        Ok(csv) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
            .header(
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"activity.csv\"",
            )
            .body(Body::from(csv))
            .unwrap(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e),
        )
            .into_response(),
    }
}

async fn timeseries_chart(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let window = query.window.unwrap_or(0);
    let bucket = query.bucket.unwrap_or_default();

    let records = {
        let store = state.store.read().unwrap();
        filter_window(store.records(), window)
    };
    let points = time_series(&records, bucket);

    let options = GraphOptions {
        title: "New vs completed tasks".to_string(),
        x_label: "Date".to_string(),
        y_label: "Tasks".to_string(),
        ..GraphOptions::default()
    };
    png_response(graph::time_series_chart(&points, &options))
}

async fn status_chart(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let window = query.window.unwrap_or(0);
    let records = {
        let store = state.store.read().unwrap();
        filter_window(store.records(), window)
    };
    let counts = status_distribution(&records);

    let options = GraphOptions {
        title: "Task status distribution".to_string(),
        ..GraphOptions::default()
    };
    png_response(graph::status_pie_chart(&counts, &options))
}

async fn effort_chart(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let window = query.window.unwrap_or(0);
    let records = {
        let store = state.store.read().unwrap();
        filter_window(store.records(), window)
    };

    let rows = match developer_effort(&records) {
        Ok(rows) => rows,
        Err(e) => return aggregation_failure(e),
    };

    let options = GraphOptions {
        title: "Effort hours by developer".to_string(),
        x_label: "Developer".to_string(),
        y_label: "Hours".to_string(),
        ..GraphOptions::default()
    };
    png_response(graph::effort_bar_chart(&rows, &options))
}

fn png_response(result: Result<Vec<u8>, Box<dyn std::error::Error>>) -> Response {
    match result {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(png))
            .unwrap(),
        Err(e) => {
            warn!("chart rendering failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(e),
            )
                .into_response()
        }
    }
}

fn aggregation_failure(e: crate::aggregate::AggregationError) -> Response {
    warn!("aggregation failed: {e}");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        error_body(e),
    )
        .into_response()
}
