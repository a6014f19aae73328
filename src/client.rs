//! Async client for the oven protocol.
//!
//! Connects to a running simulator, sends commands and decodes the status
//! lines it answers with. Every status line received is kept in a rolling
//! [`TemperatureHistory`], which starts over with each new run.
//!
//! ```rust,no_run
//! use reflow_oven_sim::{OvenClient, Profile, Result};
//!
//! # async fn demo() -> Result<()> {
//! let mut client = OvenClient::connect("127.0.0.1:8080").await?;
//! println!("Oven is {}", client.greeting().status);
//!
//! let snapshot = client.start(&Profile::new(150.0, 60, 220.0, 30)).await?;
//! println!("Heating toward {:.1}°C", snapshot.target_temp);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

use crate::data::{Profile, TemperatureHistory};
use crate::error::{Error, Result};
use crate::oven::OvenSnapshot;
use crate::protocol::{decode_status, Command};

/// A connection to an oven simulator.
pub struct OvenClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    greeting: OvenSnapshot,
    reply_timeout: Duration,
    history: TemperatureHistory,
}

impl OvenClient {
    /// Default time to wait for a status line.
    pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connect and read the greeting status line.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        Self::connect_with_timeout(addr, Self::DEFAULT_REPLY_TIMEOUT).await
    }

    /// Connect with a custom reply timeout.
    pub async fn connect_with_timeout(
        addr: impl ToSocketAddrs,
        reply_timeout: Duration,
    ) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();

        let mut client = Self {
            reader: BufReader::new(read_half),
            writer,
            greeting: OvenSnapshot::default(),
            reply_timeout,
            history: TemperatureHistory::default(),
        };
        client.greeting = client.read_status().await?;
        debug!("Connected, greeting: {:?}", client.greeting);

        Ok(client)
    }

    /// The status line pushed by the server on connect.
    pub fn greeting(&self) -> OvenSnapshot {
        self.greeting
    }

    /// Readings received on this connection since the last START.
    pub fn history(&self) -> &TemperatureHistory {
        &self.history
    }

    /// Query the current status.
    pub async fn status(&mut self) -> Result<OvenSnapshot> {
        self.request(&Command::StatusQuery).await
    }

    /// Start a run with `profile`.
    ///
    /// The history is cleared first, so it only ever holds the new run.
    pub async fn start(&mut self, profile: &Profile) -> Result<OvenSnapshot> {
        self.history.clear();
        self.request(&Command::Start(*profile)).await
    }

    /// Abort the current run.
    pub async fn stop(&mut self) -> Result<OvenSnapshot> {
        self.request(&Command::Stop).await
    }

    /// Send a raw line. A terminator is appended if missing.
    ///
    /// The server does not answer malformed or unknown commands, so no reply
    /// is read here.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        Ok(())
    }

    /// Read the next status line and record it in the history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if nothing arrives within the reply timeout
    /// and [`Error::ConnectionClosed`] if the server hung up.
    pub async fn read_status(&mut self) -> Result<OvenSnapshot> {
        let mut line = String::new();
        let read = tokio::time::timeout(self.reply_timeout, self.reader.read_line(&mut line))
            .await
            .map_err(|_| Error::Timeout)??;
        if read == 0 {
            return Err(Error::ConnectionClosed);
        }
        let snapshot = decode_status(&line)?;
        self.history.record(&snapshot);
        Ok(snapshot)
    }

    async fn request(&mut self, command: &Command) -> Result<OvenSnapshot> {
        self.writer.write_all(command.to_line().as_bytes()).await?;
        self.read_status().await
    }
}
