//! End-to-end tests over real TCP.
//!
//! Most servers here use a tick interval far longer than any test, and the
//! simulation is advanced by hand so results are deterministic. One test
//! runs on a fast tick to cover the background simulation itself.

use reflow_oven_sim::simulation::step;
use reflow_oven_sim::{
    Error, Oven, OvenClient, OvenServer, OvenStatus, Profile, ServerConfig, ThermalModel,
};
use std::net::SocketAddr;
use std::time::Duration;

async fn spawn_server() -> (SocketAddr, Oven, tokio::task::JoinHandle<()>) {
    spawn_server_with_tick(Duration::from_secs(3600)).await
}

async fn spawn_server_with_tick(
    tick_interval: Duration,
) -> (SocketAddr, Oven, tokio::task::JoinHandle<()>) {
    let config = ServerConfig::default()
        .with_host("127.0.0.1")
        .with_port(0)
        .with_tag("scenario")
        .with_tick_interval(tick_interval);
    let server = OvenServer::bind(config).await.expect("bind");
    let addr = server.local_addr().unwrap();
    let oven = server.oven();
    let handle = tokio::spawn(async move {
        server.run().await.expect("server failed");
    });
    (addr, oven, handle)
}

fn tick(oven: &Oven, times: usize) {
    let model = ThermalModel::default();
    for _ in 0..times {
        oven.with_state(|state| step(state, &model));
    }
}

#[tokio::test]
async fn test_reference_scenario() {
    let (addr, oven, _server) = spawn_server().await;
    let mut client = OvenClient::connect(addr).await.unwrap();

    let greeting = client.greeting();
    assert_eq!(greeting.status, OvenStatus::Idle);
    assert_eq!(greeting.current_temp, 25.0);
    assert_eq!(greeting.target_temp, 0.0);

    let started = client.start(&Profile::new(150.0, 60, 220.0, 30)).await.unwrap();
    assert_eq!(started.status, OvenStatus::Heating);
    assert_eq!(started.current_temp, 25.0);
    assert_eq!(started.target_temp, 150.0);
    assert_eq!(started.timer, 0);

    tick(&oven, 125);
    let status = client.status().await.unwrap();
    assert_eq!(status.status, OvenStatus::Soaking);
    assert_eq!(status.current_temp, 150.0);
    assert_eq!(status.timer, 60);

    let stopped = client.stop().await.unwrap();
    assert_eq!(stopped.status, OvenStatus::Cooling);
    assert_eq!(stopped.target_temp, 25.0);
    assert_eq!(stopped.timer, 0);
}

#[tokio::test]
async fn test_state_is_shared_between_clients() {
    let (addr, oven, _server) = spawn_server().await;

    let mut first = OvenClient::connect(addr).await.unwrap();
    first.start(&Profile::new(150.0, 60, 220.0, 30)).await.unwrap();
    tick(&oven, 10);

    let mut second = OvenClient::connect(addr).await.unwrap();
    let greeting = second.greeting();
    assert_eq!(greeting.status, OvenStatus::Heating);
    assert_eq!(greeting.current_temp, 35.0);

    let stopped = second.stop().await.unwrap();
    assert_eq!(stopped.status, OvenStatus::Cooling);
    assert_eq!(first.status().await.unwrap().status, OvenStatus::Cooling);
}

#[tokio::test]
async fn test_malformed_start_gets_no_reply() {
    let (addr, _oven, _server) = spawn_server().await;
    let mut client = OvenClient::connect_with_timeout(addr, Duration::from_millis(200))
        .await
        .unwrap();

    client.send_line("START;abc;60;220;30").await.unwrap();
    assert!(matches!(client.read_status().await, Err(Error::Timeout)));

    client.send_line("BOGUS").await.unwrap();
    assert!(matches!(client.read_status().await, Err(Error::Timeout)));

    // The connection is still usable afterwards.
    let status = client.status().await.unwrap();
    assert_eq!(status.status, OvenStatus::Idle);
}

#[tokio::test]
async fn test_closing_one_client_leaves_others_running() {
    let (addr, _oven, _server) = spawn_server().await;

    let first = OvenClient::connect(addr).await.unwrap();
    let mut second = OvenClient::connect(addr).await.unwrap();
    drop(first);

    second.start(&Profile::new(100.0, 10, 120.0, 5)).await.unwrap();
    assert_eq!(second.status().await.unwrap().status, OvenStatus::Heating);

    let mut third = OvenClient::connect(addr).await.unwrap();
    assert_eq!(third.status().await.unwrap().target_temp, 100.0);
}

#[tokio::test]
async fn test_running_server_completes_a_profile_on_its_own() {
    let (addr, _oven, _server) = spawn_server_with_tick(Duration::from_millis(10)).await;
    let mut client = OvenClient::connect(addr).await.unwrap();

    // Roughly two dozen ticks from start to COMPLETE.
    let started = client.start(&Profile::new(30.0, 2, 32.0, 1)).await.unwrap();
    assert_eq!(started.status, OvenStatus::Heating);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    let finished = loop {
        let status = client.status().await.unwrap();
        if status.status == OvenStatus::Complete {
            break status;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "run did not complete, last status {:?}",
            status
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    };

    assert_eq!(finished.current_temp, 25.0);
    assert_eq!(finished.target_temp, 25.0);
    assert!(client.history().len() >= 2);
    assert_eq!(
        client.history().latest().map(|sample| sample.status),
        Some(OvenStatus::Complete)
    );
}
