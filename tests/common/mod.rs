//! Shared utilities for integration tests: a programmable mock upstream and
//! a helper that runs the real gateway on an ephemeral port.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use launch_gateway::{GatewayConfig, HttpServer, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What the mock upstream answers on one endpoint.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    Text(&'static str),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(body) => axum::Json(body).into_response(),
            Reply::Status(status) => (status, "upstream failure").into_response(),
            Reply::Text(body) => body.into_response(),
        }
    }
}

pub struct MockUpstream {
    pub base_url: String,
    pub launches_hits: Arc<AtomicUsize>,
    pub rockets_hits: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn launches_calls(&self) -> usize {
        self.launches_hits.load(Ordering::SeqCst)
    }

    pub fn rockets_calls(&self) -> usize {
        self.rockets_hits.load(Ordering::SeqCst)
    }
}

fn counted(reply: Reply, hits: Arc<AtomicUsize>) -> axum::routing::MethodRouter {
    get(move || {
        let reply = reply.clone();
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            reply
        }
    })
}

/// Start a mock `/v3/launches` + `/v3/rockets` provider.
pub async fn start_mock_upstream(launches: Reply, rockets: Reply) -> MockUpstream {
    let launches_hits = Arc::new(AtomicUsize::new(0));
    let rockets_hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/v3/launches", counted(launches, launches_hits.clone()))
        .route("/v3/rockets", counted(rockets, rockets_hits.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{addr}"),
        launches_hits,
        rockets_hits,
    }
}

/// Config pointing at `upstream`, with rate limiting off.
pub fn config_for(upstream: &MockUpstream) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.upstream.base_url = upstream.base_url.clone();
    config.upstream.timeout_secs = Some(5);
    config.upstream.use_system_proxy = false;
    config.rate_limit.enabled = false;
    config
}

pub struct RunningGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningGateway {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Run the real server on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningGateway { addr, shutdown }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn launch(flight_number: u64, rocket_id: &str) -> Value {
    json!({
        "flight_number": flight_number,
        "mission_name": format!("Mission {flight_number}"),
        "rocket": {
            "rocket_id": rocket_id,
            "second_stage": {
                "payloads": [{
                    "payload_id": format!("payload-{flight_number}"),
                    "manufacturer": "SpaceX",
                    "payload_type": "Satellite"
                }]
            }
        }
    })
}

pub fn rocket(rocket_id: &str) -> Value {
    json!({
        "rocket_id": rocket_id,
        "rocket_name": format!("{rocket_id} name"),
        "description": format!("{rocket_id} description"),
        "flickr_images": [format!("https://img/{rocket_id}.jpg")]
    })
}

/// `count` launches numbered from 1, all on `falcon9`.
pub fn launches(count: u64) -> Value {
    Value::Array((1..=count).map(|n| launch(n, "falcon9")).collect())
}
