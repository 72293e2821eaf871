//! Solver-feed UDP receiver
//!
//! Receives one JSON datagram per solved frame from the external tracking
//! helper, parses it, and applies the camera-mirror hand swap. The receiver
//! only produces frames; writing them into the shared state (and the status
//! transitions that come with it) is the feed task's job.

use std::net::UdpSocket;
use std::time::Duration;

use crate::config::TrackingConfig;
use crate::error::{KagamiError, TrackingError};

use super::frame::{LandmarkFrame, SolverPacket};

/// JSON-over-UDP receiver for solver packets.
pub struct SolverReceiver {
    config: TrackingConfig,
    socket: Option<UdpSocket>,
}

impl SolverReceiver {
    /// Create a new receiver (does not bind yet).
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
        }
    }

    /// Bind the UDP socket and start receiving.
    pub fn start(&mut self) -> Result<(), KagamiError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr).map_err(|e| {
            TrackingError::Receiver(format!("Failed to bind to {}: {}", addr, e))
        })?;

        socket.set_nonblocking(true).map_err(|e| {
            TrackingError::Receiver(format!("Failed to set non-blocking: {}", e))
        })?;

        socket
            .set_read_timeout(Some(Duration::from_millis(100)))
            .ok();

        tracing::info!(
            "Solver receiver listening on {} (mirror: {})",
            socket.local_addr().map_or(addr, |a| a.to_string()),
            self.config.mirror
        );
        self.socket = Some(socket);

        Ok(())
    }

    /// Address the socket is bound to, once started.
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Receive and parse the next pending datagram (non-blocking).
    ///
    /// Returns `Ok(None)` when no datagram is waiting. The returned frame
    /// already has the mirror swap applied.
    pub async fn process(&self) -> Result<Option<LandmarkFrame>, KagamiError> {
        let socket = match &self.socket {
            Some(s) => s,
            None => return Err(TrackingError::NotStarted.into()),
        };

        let mut buf = [0u8; 65536];

        match socket.recv(&mut buf) {
            Ok(size) if size > 0 => {
                let packet: SolverPacket = serde_json::from_slice(&buf[..size])
                    .map_err(|e| TrackingError::Parse(format!("JSON parse error: {}", e)))?;

                Ok(Some(packet.into_frame(self.config.mirror)))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                // No data available
                Ok(None)
            }
            Err(e) => Err(TrackingError::Receiver(format!("Receive error: {}", e)).into()),
        }
    }

    /// Stop the receiver and release the socket.
    pub fn stop(&mut self) {
        self.socket = None;
        tracing::info!("Solver receiver stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral_config(mirror: bool) -> TrackingConfig {
        TrackingConfig {
            port: 0,
            mirror,
            ..Default::default()
        }
    }

    async fn recv_with_retry(receiver: &SolverReceiver) -> Option<LandmarkFrame> {
        for _ in 0..100 {
            if let Some(frame) = receiver.process().await.unwrap() {
                return Some(frame);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        None
    }

    #[tokio::test]
    async fn test_process_before_start_errors() {
        let receiver = SolverReceiver::new(&ephemeral_config(true));
        assert!(receiver.process().await.is_err());
    }

    #[tokio::test]
    async fn test_empty_socket_yields_none() {
        let mut receiver = SolverReceiver::new(&ephemeral_config(true));
        receiver.start().unwrap();
        assert!(receiver.process().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_receive_and_mirror_swap() {
        let mut receiver = SolverReceiver::new(&ephemeral_config(true));
        receiver.start().unwrap();
        let addr = receiver.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        let json = r#"{"left_hand": {"wrist": {"x": 0.1, "y": 0.0, "z": 0.0}}}"#;
        sender.send_to(json.as_bytes(), addr).unwrap();

        let frame = recv_with_retry(&receiver).await.expect("no frame received");
        // Detector-left drives the rig's right hand
        assert!(frame.left_hand.is_none());
        assert!(frame.right_hand.is_some());
    }

    #[tokio::test]
    async fn test_malformed_datagram_is_a_parse_error() {
        let mut receiver = SolverReceiver::new(&ephemeral_config(true));
        receiver.start().unwrap();
        let addr = receiver.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(b"not json", addr).unwrap();

        // Wait for the datagram to land, then expect a typed parse error
        let mut saw_error = false;
        for _ in 0..100 {
            match receiver.process().await {
                Err(KagamiError::Tracking(TrackingError::Parse(_))) => {
                    saw_error = true;
                    break;
                }
                Err(e) => panic!("unexpected error: {}", e),
                Ok(Some(_)) => panic!("malformed datagram parsed"),
                Ok(None) => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
        assert!(saw_error);
    }
}
