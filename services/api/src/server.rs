use crate::cli::ServeArgs;
use crate::infra::{load_records, AppState, InMemoryRecordStore};
use crate::routes::with_playbook_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use playbook::config::AppConfig;
use playbook::error::AppError;
use playbook::playbook::PlaybookService;
use playbook::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = match args.snapshot.take() {
        Some(path) => {
            let records = load_records(&path, None)?;
            info!(
                profiles = records.profiles.len(),
                meetings = records.meetings.len(),
                path = %path.display(),
                "store preloaded from snapshot"
            );
            InMemoryRecordStore::from_records(records)?
        }
        None => InMemoryRecordStore::default(),
    };
    let service = Arc::new(PlaybookService::new(
        Arc::new(store),
        config.playbook.report_options(),
    ));

    let app = with_playbook_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, top_n = config.playbook.top_n, "playbook service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
