//! Integration tests that connect to a real varnishd admin port.
//!
//! These tests are gated by environment variables:
//! - `VARNISH_TEST_SERVER` — admin endpoint (e.g., `127.0.0.1:6082`)
//! - `VARNISH_TEST_VERSION` — varnish major version (default `4`)
//! - `VARNISH_TEST_SECRET` — contents of the `-S` secret file, if any

use varnishadm_rs_client::VarnishAdminClient;

fn test_server() -> Option<(String, u16)> {
    let addr = std::env::var("VARNISH_TEST_SERVER").ok()?;
    let (host, port) = addr.rsplit_once(':')?;
    Some((host.to_owned(), port.parse().ok()?))
}

fn test_version() -> String {
    std::env::var("VARNISH_TEST_VERSION").unwrap_or_else(|_| "4".to_owned())
}

fn make_client() -> Option<VarnishAdminClient> {
    let (host, port) = test_server()?;
    let mut client = VarnishAdminClient::new(host, port, &test_version()).unwrap();
    if let Ok(secret) = std::env::var("VARNISH_TEST_SECRET") {
        client.set_secret(secret);
    }
    Some(client)
}

#[tokio::test]
async fn connect_and_banner() {
    let Some(mut client) = make_client() else {
        eprintln!("skipping: VARNISH_TEST_SERVER not set");
        return;
    };

    let banner = client.connect().await.unwrap();
    eprintln!("banner:\n{banner}");
    assert!(!banner.is_empty());
    assert!(client.is_connected());

    client.quit().await;
    assert!(!client.is_connected());
}

#[tokio::test]
async fn status_reports_child_state() {
    let Some(mut client) = make_client() else {
        eprintln!("skipping: VARNISH_TEST_SERVER not set");
        return;
    };

    client.connect().await.unwrap();
    let running = client.status().await;
    eprintln!("child running: {running}");

    client.quit().await;
}

#[tokio::test]
async fn ban_roundtrip() {
    let Some(mut client) = make_client() else {
        eprintln!("skipping: VARNISH_TEST_SERVER not set");
        return;
    };

    client.connect().await.unwrap();

    // a ban that matches nothing real but exercises the full round trip
    client
        .purge("req.http.x-varnishadm-rs-test == 1")
        .await
        .unwrap();
    client.purge_url("^/varnishadm-rs-test/").await.unwrap();

    client.quit().await;
}
