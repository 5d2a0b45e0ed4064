use clap::Parser;
use std::net::SocketAddr;
use tinydns_domain::{CliOverrides, ListenNet};
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "tinydns")]
#[command(version)]
#[command(about = "tinydns - caching, rule-driven DNS responder")]
struct Cli {
    /// Configuration file path (TOML, or YAML by extension)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address, e.g. 127.0.0.1:53
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listener network (udp, tcp, both)
    #[arg(short = 'n', long)]
    net: Option<ListenNet>,

    /// Enable or disable the answer cache
    #[arg(long, value_name = "BOOL")]
    disk: Option<bool>,

    /// Upstream server; repeat for several
    #[arg(short = 'u', long = "upstream", value_name = "SERVER")]
    upstream: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen: cli.listen,
        net: cli.net,
        cache_enabled: cli.disk,
        upstream_servers: cli.upstream,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting tinydns v{}", env!("CARGO_PKG_VERSION"));

    let listen: SocketAddr = config.server.listen.parse().map_err(|e| {
        anyhow::anyhow!("Invalid listen address '{}': {}", config.server.listen, e)
    })?;

    let dns_services = di::DnsServices::new(&config).await?;
    let handler = dns_services.handler.clone();

    tokio::select! {
        result = server::start_dns_server(listen, config.server.net, handler) => {
            if let Err(e) = result {
                error!(error = %e, "DNS server error");
                dns_services.shutdown().await;
                return Err(e);
            }
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        }
    }

    dns_services.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}
