//! Per-client connection handling.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::oven::Oven;
use crate::protocol::{encode_status, Command, LineBuffer};

/// Serves one client: sends a greeting, then answers commands line by line.
pub struct ConnectionHandler<S> {
    stream: S,
    oven: Oven,
    lines: LineBuffer,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a handler for `stream` driving the shared `oven`.
    pub fn new(stream: S, oven: Oven) -> Self {
        Self {
            stream,
            oven,
            lines: LineBuffer::new(),
        }
    }

    /// Serve the client until it disconnects or an I/O error occurs.
    ///
    /// The stream is shut down on every exit path. Returns `Ok` when the peer
    /// closed the connection cleanly, and [`Error::LineTooLong`] when the peer
    /// sends an unterminated line longer than the buffer limit.
    pub async fn run(mut self) -> Result<()> {
        let result = self.serve().await;
        if let Err(e) = self.stream.shutdown().await {
            debug!("Error shutting down stream: {}", e);
        }
        result
    }

    async fn serve(&mut self) -> Result<()> {
        let greeting = encode_status(&self.oven.snapshot());
        self.stream.write_all(greeting.as_bytes()).await?;

        loop {
            let read = self.stream.read_buf(self.lines.buffer_mut()).await?;
            if read == 0 {
                debug!("Peer closed connection");
                return Ok(());
            }

            while let Some(line) = self.lines.next_line() {
                if let Some(reply) = self.dispatch(&line) {
                    self.stream.write_all(reply.as_bytes()).await?;
                }
            }

            if self.lines.is_overflowing() {
                warn!(
                    "Dropping connection: {} bytes pending without a terminator",
                    self.lines.pending()
                );
                return Err(Error::LineTooLong {
                    limit: self.lines.limit(),
                });
            }
        }
    }

    /// Apply one line to the oven and build the reply, if any.
    ///
    /// The oven lock is taken and released inside this call, never across a
    /// socket write.
    fn dispatch(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match Command::parse(line) {
            Ok(Command::StatusQuery) => Some(encode_status(&self.oven.snapshot())),
            Ok(Command::Start(profile)) => {
                let snapshot = self.oven.start(profile);
                info!(
                    "START received. Targeting soak temp: {:.1}°C (soak {}s, peak {:.1}°C, reflow {}s)",
                    profile.soak_temp, profile.soak_time, profile.reflow_temp, profile.reflow_time
                );
                Some(encode_status(&snapshot))
            }
            Ok(Command::Stop) => {
                let snapshot = self.oven.stop();
                info!("STOP received. Starting COOLING");
                Some(encode_status(&snapshot))
            }
            Ok(Command::Unknown(command)) => {
                warn!("Unknown command received: {:?}", command);
                None
            }
            Err(e) => {
                warn!("Dropping START command {:?}: {}", line, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{OvenStatus, Profile};
    use crate::protocol::MAX_LINE_LEN;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, BufReader, DuplexStream};

    struct TestClient {
        reader: BufReader<tokio::io::ReadHalf<DuplexStream>>,
        writer: tokio::io::WriteHalf<DuplexStream>,
    }

    impl TestClient {
        async fn send(&mut self, data: &str) {
            self.writer.write_all(data.as_bytes()).await.unwrap();
        }

        async fn line(&mut self) -> String {
            let mut line = String::new();
            tokio::time::timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
                .await
                .expect("timed out waiting for reply")
                .unwrap();
            line
        }
    }

    fn spawn_handler(oven: &Oven) -> (TestClient, tokio::task::JoinHandle<Result<()>>) {
        let (client, server) = tokio::io::duplex(1024);
        let handle = tokio::spawn(ConnectionHandler::new(server, oven.clone()).run());
        let (reader, writer) = tokio::io::split(client);
        (
            TestClient {
                reader: BufReader::new(reader),
                writer,
            },
            handle,
        )
    }

    #[tokio::test]
    async fn test_greeting_and_status_query() {
        let oven = Oven::new();
        let (mut client, _handle) = spawn_handler(&oven);

        assert_eq!(client.line().await, "STATUS;25.0;0.0;IDLE;0\n");
        client.send("STATUS?\n").await;
        assert_eq!(client.line().await, "STATUS;25.0;0.0;IDLE;0\n");
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let oven = Oven::new();
        let (mut client, _handle) = spawn_handler(&oven);
        client.line().await;

        client.send("START;150;60;220;30\n").await;
        assert_eq!(client.line().await, "STATUS;25.0;150.0;HEATING;0\n");
        assert_eq!(oven.profile(), Profile::new(150.0, 60, 220.0, 30));

        client.send("STOP\n").await;
        assert_eq!(client.line().await, "STATUS;25.0;25.0;COOLING;0\n");
    }

    #[tokio::test]
    async fn test_pipelined_and_fragmented_commands() {
        let oven = Oven::new();
        let (mut client, _handle) = spawn_handler(&oven);
        client.line().await;

        client.send("STATUS?\nSTART;150;60;2").await;
        assert_eq!(client.line().await, "STATUS;25.0;0.0;IDLE;0\n");
        client.send("20;30\r\n\nSTOP\n").await;
        assert_eq!(client.line().await, "STATUS;25.0;150.0;HEATING;0\n");
        assert_eq!(client.line().await, "STATUS;25.0;25.0;COOLING;0\n");
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_commands_get_no_reply() {
        let oven = Oven::new();
        let (mut client, _handle) = spawn_handler(&oven);
        client.line().await;

        client
            .send("START;abc;60;220;30\nSTART;150\nPROFILE;1;2\nSTATUS?\n")
            .await;
        // The first reply is the one for STATUS?; nothing changed the oven.
        assert_eq!(client.line().await, "STATUS;25.0;0.0;IDLE;0\n");
        assert_eq!(oven.snapshot().status, OvenStatus::Idle);
    }

    #[tokio::test]
    async fn test_unterminated_flood_closes_connection() {
        let oven = Oven::new();
        let (mut client, handle) = spawn_handler(&oven);
        assert_eq!(client.line().await, "STATUS;25.0;0.0;IDLE;0\n");

        let flood = "S".repeat(MAX_LINE_LEN + 1);
        let _ = client.writer.write_all(flood.as_bytes()).await;

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("handler did not finish")
            .unwrap();
        assert!(matches!(
            result,
            Err(Error::LineTooLong { limit }) if limit == MAX_LINE_LEN
        ));
        assert_eq!(client.line().await, "");
        assert_eq!(oven.snapshot().status, OvenStatus::Idle);
    }

    #[tokio::test]
    async fn test_handler_ends_when_peer_closes() {
        let oven = Oven::new();
        let (client, handle) = spawn_handler(&oven);
        drop(client);

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("handler did not finish")
            .unwrap();
        assert!(result.is_ok() || matches!(result, Err(Error::Io(_))));
    }
}
