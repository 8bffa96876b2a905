//! Interactive reference client
//!
//! Connects to the gateway, encodes line commands as protocol frames,
//! and prints the decoded response for each one.
//!
//! Commands:
//! ```text
//! new <listing> <id> <qty> <price> <B|S>
//! delete <id>
//! modify <id> <qty>
//! trade <listing> <id> <qty> <price>
//! quit
//! ```

use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use protocol::messages::{
    DeleteOrder, Header, Message, ModifyOrderQuantity, NewOrder, OrderResponse, Payload, Trade,
    HEADER_SIZE,
};
use protocol::Codec;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Must match the gateway's configured version
const PROTOCOL_VERSION: u16 = 1;
const DEFAULT_ADDR: &str = "127.0.0.1:1234";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    protocol::codec::assert_wire_sizes();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let mut stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("could not connect to the gateway at {addr}"))?;
    println!("connected to {addr}");

    let codec = Codec::new(PROTOCOL_VERSION);
    let mut sequence: u32 = 1;

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let payload = match parse_command(line) {
            Ok(payload) => payload,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        let frame = codec.encode(&Message {
            header: Header {
                version: PROTOCOL_VERSION,
                payload_size: payload.wire_size() as u16,
                sequence_number: sequence,
                timestamp: unix_nanos(),
            },
            payload,
        });
        sequence += 1;

        stream.write_all(&frame).await?;

        let mut response = [0u8; HEADER_SIZE + OrderResponse::WIRE_SIZE];
        stream
            .read_exact(&mut response)
            .await
            .context("gateway closed the connection")?;
        match codec.decode(&response)?.payload {
            Payload::OrderResponse(response) => {
                println!("{} (id {})", response.status, response.order_id);
            }
            other => bail!("unexpected reply from gateway: {other:?}"),
        }
    }

    Ok(())
}

fn parse_command(line: &str) -> Result<Payload> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["new", listing, id, quantity, price, side] => {
            let side = match *side {
                "B" => b'B',
                "S" => b'S',
                other => bail!("side must be B or S, got {other:?}"),
            };
            Ok(Payload::NewOrder(NewOrder {
                listing_id: parse(listing, "listing")?.into(),
                order_id: parse(id, "id")?.into(),
                order_quantity: parse(quantity, "qty")?,
                order_price: parse(price, "price")?,
                side,
            }))
        }
        ["delete", id] => Ok(Payload::DeleteOrder(DeleteOrder {
            order_id: parse(id, "id")?.into(),
        })),
        ["modify", id, quantity] => Ok(Payload::ModifyOrderQuantity(ModifyOrderQuantity {
            order_id: parse(id, "id")?.into(),
            new_quantity: parse(quantity, "qty")?,
        })),
        ["trade", listing, id, quantity, price] => Ok(Payload::Trade(Trade {
            listing_id: parse(listing, "listing")?.into(),
            trade_id: parse(id, "id")?.into(),
            trade_quantity: parse(quantity, "qty")?,
            trade_price: parse(price, "price")?,
        })),
        _ => bail!(
            "usage: new <listing> <id> <qty> <price> <B|S> | delete <id> \
             | modify <id> <qty> | trade <listing> <id> <qty> <price> | quit"
        ),
    }
}

fn parse(raw: &str, name: &str) -> Result<u64> {
    raw.parse::<u64>()
        .with_context(|| format!("{name} must be an unsigned integer, got {raw:?}"))
}

fn unix_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
