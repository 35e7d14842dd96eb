use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use board_server::holidays::{HolidayCalendar, HolidayClient, HolidayClientConfig};
use board_server::line::yokohama_line;
use board_server::lookup::LookupConfig;
use board_server::session::SessionStore;
use board_server::timetable::Timetable;
use board_server::web::{AppState, TimetableStore, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let session_file = std::env::var("SESSION_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(&data_dir).join("session.json"));
    let bind = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    let line = yokohama_line();

    // Holiday calendar: a local file by default, a URL when configured.
    // Failure is logged and leaves the weekend-only classification.
    let holidays = match std::env::var("HOLIDAY_URL") {
        Ok(url) => {
            let client = HolidayClient::new(HolidayClientConfig::new().with_url(url))
                .expect("failed to build holiday client");
            match client.fetch().await {
                Ok(calendar) => calendar,
                Err(e) => {
                    warn!(%e, "holiday calendar fetch failed; weekends only");
                    HolidayCalendar::empty()
                }
            }
        }
        Err(_) => {
            let path = PathBuf::from(&data_dir).join("syukujitsu.csv");
            match HolidayCalendar::from_file(&path) {
                Ok(calendar) => calendar,
                Err(e) => {
                    warn!(path = %path.display(), %e, "no holiday calendar; weekends only");
                    HolidayCalendar::empty()
                }
            }
        }
    };
    info!(holidays = holidays.len(), "holiday calendar ready");

    // Load both timetables behind the readiness gate. Until the task
    // resolves it, lookups answer 503; a failure is permanent.
    let tables = TimetableStore::new();
    {
        let tables = tables.clone();
        let line = line.clone();
        let weekday_path = PathBuf::from(&data_dir).join("timetable-weekday.csv");
        let holiday_path = PathBuf::from(&data_dir).join("timetable-holiday.csv");

        tokio::spawn(async move {
            let loaded = Timetable::load(&weekday_path, &line)
                .and_then(|weekday| Ok((weekday, Timetable::load(&holiday_path, &line)?)));

            match loaded {
                Ok((weekday, holiday)) => {
                    info!(
                        weekday_trains = weekday.trains().len(),
                        holiday_trains = holiday.trains().len(),
                        "timetables loaded"
                    );
                    tables.set_ready(weekday, holiday).await;
                }
                Err(e) => {
                    error!(%e, "timetable load failed; the board stays unavailable");
                    tables.set_failed(e.to_string()).await;
                }
            }
        });
    }

    let session = SessionStore::new(session_file);
    let state = AppState::new(line, tables, holidays, session, LookupConfig::default());
    let app = create_router(state, &data_dir);

    println!("Departure board listening on http://{bind}");
    println!();
    println!("Endpoints:");
    println!("  GET /                       - Board page");
    println!("  GET /health                 - Health check");
    println!("  GET /api/stations           - Station listing");
    println!("  GET /api/departures         - Next departures");
    println!("  GET /api/departures/stream  - Current-time stream (SSE)");

    let listener = tokio::net::TcpListener::bind(bind).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
