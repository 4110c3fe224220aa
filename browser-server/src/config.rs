use clap::Parser;
use std::net::SocketAddr;

/// Serve a SQLite database's tables and views over HTTP, read-only
#[derive(Debug, Clone, Parser)]
#[command(name = "browser-server", version, about)]
pub struct Config {
    /// SQLite connection string, e.g. sqlite:./data/app.db
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Address to listen on
    #[arg(long, env = "BROWSER_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// URL prefix the browser API is mounted under
    #[arg(long, env = "BROWSER_BASE_PATH", default_value = "/sqlite-browser")]
    pub base_path: String,

    /// Upper bound on pooled database connections
    #[arg(long, env = "BROWSER_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Create and fill a demo schema before serving
    #[arg(long)]
    pub seed_demo: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
