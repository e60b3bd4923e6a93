//! Startup failures: bad config and unreachable upstream.

mod common;

use common::server::free_local_addr;
use common::TestDaemon;
use std::time::Duration;

#[tokio::test]
async fn test_invalid_config_refuses_to_start() {
    let listen = free_local_addr().unwrap();
    let config = format!(
        r#"
[daemon]
network = ""

[listen]
address = "{listen}"

[upstream]
address = "no-port"
nick = "bad nick"
"#
    );

    let mut daemon = TestDaemon::spawn_with_config(&config, listen).unwrap();
    let status = daemon.wait_exit(Duration::from_secs(5)).await.unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn test_unreachable_upstream_is_fatal() {
    let listen = free_local_addr().unwrap();
    let upstream = free_local_addr().unwrap();
    let config = format!(
        r#"
[daemon]
network = "testnet"

[listen]
address = "{listen}"

[upstream]
address = "{upstream}"
nick = "hatcog"
"#
    );

    let mut daemon = TestDaemon::spawn_with_config(&config, listen).unwrap();
    let status = daemon.wait_exit(Duration::from_secs(5)).await.unwrap();
    assert!(!status.success());
    assert!(tokio::net::TcpStream::connect(listen).await.is_err());
}
