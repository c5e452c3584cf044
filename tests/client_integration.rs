mod common;

use std::net::SocketAddr;

use starter_rpc::client::ApiClient;
use starter_rpc::models::SessionUser;
use starter_rpc::response::{ResponseEnvelope, ResponseStatus};
use starter_rpc::routes::HealthReport;
use tokio::net::TcpListener;

use common::{access_token, build_app, load_test_config};

/// Serves the app on an ephemeral port and returns its base URL.
async fn spawn_server() -> String {
    let app = build_app(load_test_config()).await;
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no local address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("server crashed");
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn client_reads_health() {
    let client = ApiClient::new(spawn_server().await);

    let envelope: ResponseEnvelope<HealthReport> = client.get("/api/health").await;

    assert_eq!(envelope.status, ResponseStatus::Success);
    assert!(envelope.data.is_some());
}

#[tokio::test]
async fn client_sees_unauthorized_as_failure() {
    let client = ApiClient::new(spawn_server().await);

    let envelope: ResponseEnvelope<SessionUser> = client.get("/api/session").await;

    assert_eq!(envelope.status, ResponseStatus::Fail);
    assert_eq!(envelope.message, r#"{"error":"Unauthorized"}"#);
    assert_eq!(envelope.data, None);
}

#[tokio::test]
async fn client_with_bearer_gets_session() {
    let client = ApiClient::new(spawn_server().await).with_bearer(access_token("client-user"));

    let envelope: ResponseEnvelope<SessionUser> = client.get("/api/session").await;

    assert!(envelope.is_success(), "unexpected envelope: {:?}", envelope);
    assert_eq!(envelope.data.map(|u| u.id).as_deref(), Some("client-user"));
}

#[tokio::test]
async fn client_against_closed_port_fails_softly() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let envelope: ResponseEnvelope<HealthReport> =
        ApiClient::new(format!("http://{}", addr)).get("/api/health").await;

    assert_eq!(envelope.status, ResponseStatus::Fail);
    assert!(!envelope.message.is_empty());
    assert_eq!(envelope.data, None);
}
