use crate::bridge::state::TableState;
use crate::motion::model::MotionConfig;
use fooscore::table::{CommandKind, CommandRequest};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn bridge_bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Bridge that stands in for the table backend over HTTP.
///
/// Serves the coordinate endpoint and the four command endpoints consumed by
/// the panel, plus the plain GET routes of the original development server.
pub struct TableBridge {
    state: Arc<RwLock<TableState>>,
}

impl TableBridge {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(TableState::new(config))),
        }
    }

    /// Serves the bridge on a dedicated thread until the process exits.
    pub fn spawn(&self, port: u16) {
        let state = self.state.clone();
        thread::spawn(move || {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes(state)).run(bridge_bind_address(port)).await;
            });
        });
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }
}

/// All bridge routes over the shared table state.
pub fn routes(
    state: Arc<RwLock<TableState>>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let coordinates = warp::path("api")
        .and(warp::path("coordinates"))
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: Arc<RwLock<TableState>>| {
            let coordinate = state.write().unwrap().coordinate();
            warp::reply::json(&coordinate)
        });

    let legacy_coordinates = warp::path("coordinates")
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: Arc<RwLock<TableState>>| {
            let coordinate = state.write().unwrap().coordinate();
            warp::reply::json(&coordinate)
        });

    coordinates
        .or(command_route(CommandKind::PowerOn, state_filter.clone()))
        .or(command_route(CommandKind::Start, state_filter.clone()))
        .or(command_route(CommandKind::Reset, state_filter.clone()))
        .or(command_route(CommandKind::Stop, state_filter.clone()))
        .or(legacy_coordinates)
        .or(legacy_route(CommandKind::Start, "Start Button Clicked", state_filter.clone()))
        .or(legacy_route(CommandKind::Reset, "Reset Button Clicked", state_filter.clone()))
        .or(legacy_route(CommandKind::Stop, "Stop Button Clicked", state_filter))
}

/// One `POST /api/<command>` route. The body must name the same action as
/// the route; a mismatch is answered with 400 and leaves the table alone.
fn command_route(
    kind: CommandKind,
    state_filter: impl Filter<Extract = (Arc<RwLock<TableState>>,), Error = std::convert::Infallible>
        + Clone
        + Send,
) -> impl Filter<Extract = (warp::reply::WithStatus<warp::reply::Json>,), Error = warp::Rejection> + Clone
{
    let segment = kind.route().trim_start_matches("/api/");
    warp::path("api")
        .and(warp::path(segment))
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .map(
            move |request: CommandRequest, state: Arc<RwLock<TableState>>| {
                if !request.matches(kind) {
                    return warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "rejected",
                            "error": "body action does not match route",
                        })),
                        StatusCode::BAD_REQUEST,
                    );
                }
                if state.write().unwrap().apply(kind) {
                    warp::reply::with_status(
                        warp::reply::json(&json!({"status": "ok", "action": kind.action()})),
                        StatusCode::OK,
                    )
                } else {
                    warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "refused",
                            "error": "table is not powered on",
                        })),
                        StatusCode::CONFLICT,
                    )
                }
            },
        )
}

/// One plain `GET /<command>` route kept for the original dev frontends.
/// Replies with the historical click message whatever the table decides.
fn legacy_route(
    kind: CommandKind,
    message: &'static str,
    state_filter: impl Filter<Extract = (Arc<RwLock<TableState>>,), Error = std::convert::Infallible>
        + Clone
        + Send,
) -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    let segment = kind.route().trim_start_matches("/api/");
    warp::path(segment)
        .and(warp::get())
        .and(state_filter)
        .map(move |state: Arc<RwLock<TableState>>| {
            state.write().unwrap().apply(kind);
            message.to_string()
        })
}
