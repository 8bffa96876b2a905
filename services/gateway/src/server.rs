//! Readiness-multiplexed TCP session server
//!
//! One `Gateway` owns the listening socket. Every accepted connection
//! gets a fresh [`OrderStore`] and a task spawned on the local set;
//! the current-thread runtime multiplexes all sessions on one OS
//! thread, so no session state needs locks and each dispatcher is
//! exclusively owned by its connection's lifecycle.
//!
//! Framing: one read buffer holds at most one message; a message split
//! across reads is not reassembled (documented protocol limitation).

use std::cell::Cell;
use std::io;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use protocol::codec::{Codec, CodecError};
use protocol::messages::{Header, Message, OrderResponse, Payload};
use risk_engine::{DispatchError, OrderStore};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::GatewayConfig;

/// Protocol version this gateway speaks
pub const PROTOCOL_VERSION: u16 = 1;
/// Fixed per-session read buffer; every protocol message fits
pub const READ_BUFFER_SIZE: usize = 64;
/// Listen backlog requested from the OS
pub const BACKLOG_SIZE: u32 = 5;
/// Bound on each readiness wait; expiry re-polls, nothing else
pub const IDLE_POLL: Duration = Duration::from_millis(500);

/// Session-fatal errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("dispatch contract violation: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Listening server; owns the socket and the per-session limits
pub struct Gateway {
    listener: TcpListener,
    config: GatewayConfig,
    codec: Codec,
}

impl Gateway {
    /// Bind and listen. Failure here is fatal: the caller reports it
    /// and exits rather than retrying.
    pub async fn bind(config: GatewayConfig) -> io::Result<Self> {
        let socket = match config.addr {
            SocketAddr::V4(_) => tokio::net::TcpSocket::new_v4()?,
            SocketAddr::V6(_) => tokio::net::TcpSocket::new_v6()?,
        };
        socket.bind(config.addr)?;
        let listener = socket.listen(BACKLOG_SIZE)?;
        Ok(Self {
            listener,
            config,
            codec: Codec::new(PROTOCOL_VERSION),
        })
    }

    /// Address the listener actually bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Must run inside a [`task::LocalSet`] on a
    /// current-thread runtime; every session task is spawned locally.
    pub async fn run(self) -> io::Result<()> {
        // Server-wide response sequence: increasing across all
        // sessions, wrapping to 0 after u32::MAX (the wire field is
        // 32-bit). Single-thread execution makes the shared counter
        // race-free.
        let next_sequence = Rc::new(Cell::new(1u32));

        loop {
            let (stream, peer) = self.listener.accept().await?;
            info!(%peer, "session accepted");

            let store = OrderStore::new(self.config.limits, PROTOCOL_VERSION);
            let codec = self.codec;
            let sequence = Rc::clone(&next_sequence);
            task::spawn_local(async move {
                match serve_session(stream, store, codec, sequence).await {
                    Ok(()) => info!(%peer, "session closed"),
                    Err(err) => warn!(%peer, %err, "session ended"),
                }
            });
        }
    }
}

/// Serve one connection until the peer closes or a session-fatal
/// error occurs.
async fn serve_session(
    mut stream: TcpStream,
    mut store: OrderStore,
    codec: Codec,
    next_sequence: Rc<Cell<u32>>,
) -> Result<(), SessionError> {
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    loop {
        let read = match timeout(IDLE_POLL, stream.read(&mut buffer)).await {
            // Idle wait expired: liveness re-poll only, the session
            // is never force-closed for inactivity.
            Err(_) => continue,
            Ok(result) => result?,
        };
        if read == 0 {
            return Ok(());
        }

        let message = match codec.decode(&buffer[..read]) {
            Ok(message) => message,
            // Foreign protocol version: drop, no response, no reply
            // to the peer.
            Err(CodecError::ProtocolMismatch { got, want }) => {
                debug!(got, want, "dropping frame with foreign protocol version");
                continue;
            }
            // Fatal for this read only; subsequent reads are
            // unaffected.
            Err(err) => {
                warn!(%err, "dropping unreadable frame");
                continue;
            }
        };

        let response = match store.consume(&message) {
            Ok(Some(response)) => response,
            Ok(None) => continue,
            Err(err) => {
                error!(%err, "closing session");
                return Err(err.into());
            }
        };

        let sequence = next_sequence.get();
        next_sequence.set(sequence.wrapping_add(1));

        let frame = codec.encode(&Message {
            header: Header {
                version: codec.version(),
                payload_size: OrderResponse::WIRE_SIZE as u16,
                sequence_number: sequence,
                timestamp: unix_nanos(),
            },
            payload: Payload::OrderResponse(OrderResponse {
                order_id: response.id.into(),
                status: response.status,
            }),
        });
        stream.write_all(&frame).await?;
    }
}

/// Wall-clock Unix nanoseconds for response timestamps
fn unix_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
