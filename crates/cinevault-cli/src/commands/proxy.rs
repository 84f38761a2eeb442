use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use cinevault_core::{AppConfig, ProxyServer};

pub async fn run(config: &AppConfig, bind: Option<String>) -> Result<()> {
    let mut server = ProxyServer::new(&config.proxy)?;
    if let Some(bind) = bind {
        server = server.with_bind_addr(bind);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Setup signal handler for graceful shutdown
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    println!("Proxy listening on http://{}", server.bind_addr());
    println!("Press Ctrl+C to stop.");

    server.run(shutdown_rx).await?;

    println!("Proxy stopped.");
    Ok(())
}
