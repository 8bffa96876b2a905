use gateway::{Gateway, GatewayConfig};
use tokio::task::LocalSet;
use tracing::info;

fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // The codec layout must hold before any frame crosses the wire.
    protocol::codec::assert_wire_sizes();

    let config = GatewayConfig::from_env()?;
    info!(addr = %config.addr, "starting gateway");

    // One OS thread drives every session; no worker threads.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = LocalSet::new();

    local.block_on(&runtime, async {
        let gateway = Gateway::bind(config).await?;
        info!("listening on {}", gateway.local_addr()?);
        gateway.run().await?;
        Ok(())
    })
}
