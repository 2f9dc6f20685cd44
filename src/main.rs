use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use medicab::config::AppConfig;
use medicab::error::AppError;
use medicab::telemetry;
use medicab::workflows::roster::{quota_report, RosterImporter};
use medicab::workflows::transport::authorization::{
    authorization_router, AuthorizationService, InMemoryDocumentRepository, InMemoryRideRepository,
    QuotaConfig, QuotaEngine, RideQuotaView,
};
use medicab::workflows::transport::handoff::{
    handoff_router, HandoffService, InMemoryHandoffRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    quota: QuotaConfig,
}

#[derive(Parser, Debug)]
#[command(
    name = "Medicab Dispatch Service",
    about = "Run the medical-transport scheduling service or audit quota consumption from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect prescription-quota consumption
    Quota {
        #[command(subcommand)]
        command: QuotaCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum QuotaCommand {
    /// Evaluate every ride in a dispatch export and print banner states
    Report(QuotaReportArgs),
}

#[derive(Args, Debug)]
struct QuotaReportArgs {
    /// CSV export of scheduled rides
    #[arg(long)]
    rides_csv: PathBuf,
    /// CSV export of scanned patient documents
    #[arg(long)]
    documents_csv: PathBuf,
}

#[derive(Debug, Deserialize)]
struct QuotaReportRequest {
    rides_csv: String,
    documents_csv: String,
}

#[derive(Debug, Serialize)]
struct QuotaReportResponse {
    rides: usize,
    documents: usize,
    entries: Vec<RideQuotaView>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Quota {
            command: QuotaCommand::Report(args),
        } => run_quota_report(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let quota_config = config.quota.quota_config();

    let rides = Arc::new(InMemoryRideRepository::default());
    let documents = Arc::new(InMemoryDocumentRepository::default());
    let authorization = Arc::new(AuthorizationService::new(
        rides.clone(),
        documents,
        quota_config.clone(),
    ));
    let handoffs = Arc::new(HandoffService::new(
        Arc::new(InMemoryHandoffRepository::default()),
        rides,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        quota: quota_config,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/quota/report", post(quota_report_endpoint))
        .with_state(state)
        .merge(authorization_router(authorization))
        .merge(handoff_router(handoffs))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "medicab dispatch service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_quota_report(args: QuotaReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let roster = RosterImporter::from_paths(&args.rides_csv, &args.documents_csv)?;
    let engine = QuotaEngine::new(config.quota.quota_config());

    let entries = quota_report(&roster, &engine);
    render_quota_report(roster.rides.len(), roster.documents.len(), &entries);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn quota_report_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<QuotaReportRequest>,
) -> Result<Json<QuotaReportResponse>, AppError> {
    let QuotaReportRequest {
        rides_csv,
        documents_csv,
    } = payload;

    let roster = RosterImporter::from_readers(
        Cursor::new(rides_csv.into_bytes()),
        Cursor::new(documents_csv.into_bytes()),
    )?;
    let engine = QuotaEngine::new(state.quota.clone());
    let entries = quota_report(&roster, &engine);

    Ok(Json(QuotaReportResponse {
        rides: roster.rides.len(),
        documents: roster.documents.len(),
        entries,
    }))
}

fn render_quota_report(rides: usize, documents: usize, entries: &[RideQuotaView]) {
    println!("Quota report");
    println!("Rides: {rides} (documents on file: {documents})");

    println!("\nPer-ride authorization status");
    for entry in entries {
        let ledger_note = match (entry.consumed, entry.max_authorized, entry.remaining) {
            (Some(consumed), Some(max), Some(remaining)) => {
                format!(" (consumed {consumed} of {max}, remaining {remaining})")
            }
            (None, Some(max), None) => format!(" (open-ended series, nominal cap {max})"),
            _ => String::new(),
        };
        println!(
            "- {} | {} | {}{}",
            entry.ride_id.0, entry.patient_id.0, entry.state_label, ledger_note
        );
    }

    let mut states: BTreeMap<&'static str, usize> = BTreeMap::new();
    for entry in entries {
        *states.entry(entry.state).or_default() += 1;
    }

    println!("\nStates");
    for (state, count) in states {
        println!("- {state}: {count}");
    }
}
