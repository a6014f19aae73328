//! Run a full reflow profile against an in-process simulator
//!
//! Run with: cargo run --example run_profile
//!
//! Set OVEN_ADDR to drive an already running simulator instead.

use reflow_oven_sim::{OvenClient, OvenServer, OvenStatus, Profile, Result, ServerConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (minimal)
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let poll_interval;
    let addr = match std::env::var("OVEN_ADDR") {
        Ok(addr) => {
            poll_interval = Duration::from_secs(1);
            addr
        }
        Err(_) => {
            // Fast ticks so the whole cycle finishes in a few seconds.
            let config = ServerConfig::default()
                .with_host("127.0.0.1")
                .with_port(0)
                .with_tag("demo")
                .with_tick_interval(Duration::from_millis(5));
            let server = OvenServer::bind(config).await?;
            let addr = server.local_addr()?.to_string();
            tokio::spawn(server.run());
            poll_interval = Duration::from_millis(25);
            addr
        }
    };

    println!("Reflow Profile Runner");
    println!("=====================\n");

    let mut client = OvenClient::connect(addr.as_str()).await?;
    println!("Connected to {} (oven is {})", addr, client.greeting().status);

    let profile = Profile::new(150.0, 60, 220.0, 30);
    let mut last_status = client.start(&profile).await?.status;
    println!("Started: {:?}\n", profile);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                let snapshot = client.stop().await?;
                println!("\nAborted, oven is {} toward {:.1}°C", snapshot.status, snapshot.target_temp);
                break;
            }
            _ = tokio::time::sleep(poll_interval) => {
                let snapshot = client.status().await?;
                if snapshot.status != last_status {
                    println!(
                        "{:>10} -> {:<10} at {:>6.1}°C",
                        last_status.to_string(),
                        snapshot.status.to_string(),
                        snapshot.current_temp
                    );
                    last_status = snapshot.status;
                }

                if snapshot.status == OvenStatus::Complete {
                    break;
                }
            }
        }
    }

    let history = client.history();
    println!(
        "\nLast {} readings peaked at {:.1}°C",
        history.len(),
        history.peak_temp().unwrap_or_default()
    );

    Ok(())
}
