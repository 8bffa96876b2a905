//! End-to-end session tests over real TCP sockets
//!
//! Each test drives the gateway exactly as a client process would:
//! encoded frames out, encoded OrderResponse frames back.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use gateway::server::PROTOCOL_VERSION;
use gateway::{Gateway, GatewayConfig};
use protocol::messages::{
    DeleteOrder, Header, Message, NewOrder, OrderResponse, Payload, Trade, HEADER_SIZE,
};
use protocol::Codec;
use risk_engine::RiskLimits;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::LocalSet;
use types::response::OrderStatus;

/// Run a test future on a current-thread runtime with a LocalSet,
/// matching the gateway's single-thread execution model.
fn run_local<Fut: Future<Output = ()>>(fut: Fut) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let local = LocalSet::new();
    local.block_on(&runtime, fut);
}

/// Bind a gateway on an ephemeral port and spawn its accept loop.
async fn start_gateway() -> SocketAddr {
    let config = GatewayConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        limits: RiskLimits::new(20, 15).unwrap(),
    };
    let gateway = Gateway::bind(config).await.unwrap();
    let addr = gateway.local_addr().unwrap();
    tokio::task::spawn_local(async move {
        let _ = gateway.run().await;
    });
    addr
}

fn codec() -> Codec {
    Codec::new(PROTOCOL_VERSION)
}

fn frame(sequence: u32, payload: Payload) -> Vec<u8> {
    codec().encode(&Message {
        header: Header {
            version: PROTOCOL_VERSION,
            payload_size: payload.wire_size() as u16,
            sequence_number: sequence,
            timestamp: 1_708_123_456_789_000_000,
        },
        payload,
    })
}

fn new_order(listing: u64, id: u64, quantity: u64, price: u64, side: u8) -> Payload {
    Payload::NewOrder(NewOrder {
        listing_id: listing.into(),
        order_id: id.into(),
        order_quantity: quantity,
        order_price: price,
        side,
    })
}

fn trade(listing: u64, id: u64, quantity: u64, price: u64) -> Payload {
    Payload::Trade(Trade {
        listing_id: listing.into(),
        trade_id: id.into(),
        trade_quantity: quantity,
        trade_price: price,
    })
}

fn delete(id: u64) -> Payload {
    Payload::DeleteOrder(DeleteOrder { order_id: id.into() })
}

/// Read exactly one response frame and decode it.
async fn read_response(stream: &mut TcpStream) -> (Header, OrderResponse) {
    let mut buf = [0u8; HEADER_SIZE + OrderResponse::WIRE_SIZE];
    stream.read_exact(&mut buf).await.unwrap();
    let message = codec().decode(&buf).unwrap();
    match message.payload {
        Payload::OrderResponse(response) => (message.header, response),
        other => panic!("expected OrderResponse, got {:?}", other),
    }
}

#[test]
fn test_new_order_accepted_roundtrip() {
    run_local(async {
        let addr = start_gateway().await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        client
            .write_all(&frame(1, new_order(1, 12, 10, 120_000, b'B')))
            .await
            .unwrap();

        let (header, response) = read_response(&mut client).await;
        assert_eq!(header.version, PROTOCOL_VERSION);
        assert_eq!(header.payload_size as usize, OrderResponse::WIRE_SIZE);
        assert_eq!(response.order_id.as_u64(), 12);
        assert_eq!(response.status, OrderStatus::Accepted);
    });
}

#[test]
fn test_sell_at_limit_rejected() {
    run_local(async {
        let addr = start_gateway().await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        // Quantity equal to the exclusive sell limit of 15
        client
            .write_all(&frame(1, new_order(4, 9, 15, 90_999, b'S')))
            .await
            .unwrap();

        let (_, response) = read_response(&mut client).await;
        assert_eq!(response.order_id.as_u64(), 9);
        assert_eq!(response.status, OrderStatus::Rejected);
    });
}

#[test]
fn test_version_mismatch_gets_no_reply() {
    run_local(async {
        let addr = start_gateway().await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        // Foreign version first: must be dropped silently.
        let mut foreign = frame(1, new_order(1, 50, 5, 100, b'B'));
        foreign[0..2].copy_from_slice(&9u16.to_le_bytes());
        client.write_all(&foreign).await.unwrap();

        // The protocol reads one message per readiness cycle; give
        // the dropped frame its own read before sending the next.
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The only reply must belong to this second, valid frame.
        client
            .write_all(&frame(2, new_order(1, 51, 5, 100, b'B')))
            .await
            .unwrap();

        let (_, response) = read_response(&mut client).await;
        assert_eq!(response.order_id.as_u64(), 51);
    });
}

#[test]
fn test_unreadable_frame_does_not_poison_session() {
    run_local(async {
        let addr = start_gateway().await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        // Unknown type tag: dropped with a warning, session lives on.
        let mut garbled = frame(1, new_order(1, 60, 5, 100, b'B'));
        garbled[16..18].copy_from_slice(&99u16.to_le_bytes());
        client.write_all(&garbled).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        client
            .write_all(&frame(2, new_order(1, 61, 5, 100, b'B')))
            .await
            .unwrap();

        let (_, response) = read_response(&mut client).await;
        assert_eq!(response.order_id.as_u64(), 61);
        assert_eq!(response.status, OrderStatus::Accepted);
    });
}

#[test]
fn test_trade_flow_over_socket() {
    run_local(async {
        let addr = start_gateway().await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        client
            .write_all(&frame(1, new_order(1, 7, 5, 100, b'B')))
            .await
            .unwrap();
        let (_, response) = read_response(&mut client).await;
        assert_eq!(response.status, OrderStatus::Accepted);

        // Quantity mismatch: rejected
        client.write_all(&frame(2, trade(1, 7, 6, 100))).await.unwrap();
        let (_, response) = read_response(&mut client).await;
        assert_eq!(response.status, OrderStatus::Rejected);

        // Exact match: accepted
        client.write_all(&frame(3, trade(1, 7, 5, 100))).await.unwrap();
        let (_, response) = read_response(&mut client).await;
        assert_eq!(response.order_id.as_u64(), 7);
        assert_eq!(response.status, OrderStatus::Accepted);
    });
}

#[test]
fn test_response_sequence_strictly_increases() {
    run_local(async {
        let addr = start_gateway().await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        client
            .write_all(&frame(1, new_order(1, 1, 3, 100, b'B')))
            .await
            .unwrap();
        let (first, _) = read_response(&mut client).await;

        client
            .write_all(&frame(2, new_order(1, 2, 3, 100, b'B')))
            .await
            .unwrap();
        let (second, _) = read_response(&mut client).await;

        assert!(second.sequence_number > first.sequence_number);
    });
}

#[test]
fn test_sessions_are_isolated() {
    run_local(async {
        let addr = start_gateway().await;
        let mut first = TcpStream::connect(addr).await.unwrap();
        let mut second = TcpStream::connect(addr).await.unwrap();

        first
            .write_all(&frame(1, new_order(1, 77, 5, 100, b'B')))
            .await
            .unwrap();
        let (_, response) = read_response(&mut first).await;
        assert_eq!(response.status, OrderStatus::Accepted);

        // The second session cannot see the first session's order.
        second.write_all(&frame(1, delete(77))).await.unwrap();
        let (_, response) = read_response(&mut second).await;
        assert_eq!(response.status, OrderStatus::Rejected);

        // The owning session still can.
        first.write_all(&frame(2, delete(77))).await.unwrap();
        let (_, response) = read_response(&mut first).await;
        assert_eq!(response.status, OrderStatus::Accepted);
    });
}

#[test]
fn test_peer_close_tears_down_only_that_session() {
    run_local(async {
        let addr = start_gateway().await;

        let mut first = TcpStream::connect(addr).await.unwrap();
        first
            .write_all(&frame(1, new_order(1, 5, 5, 100, b'B')))
            .await
            .unwrap();
        let _ = read_response(&mut first).await;
        drop(first);

        // A fresh session starts clean and keeps being served.
        let mut second = TcpStream::connect(addr).await.unwrap();
        second.write_all(&frame(1, delete(5))).await.unwrap();
        let (_, response) = read_response(&mut second).await;
        assert_eq!(response.status, OrderStatus::Rejected);
    });
}
