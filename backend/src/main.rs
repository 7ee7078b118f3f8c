//! Backend entry-point: wires persistence, REST endpoints, and OpenAPI docs.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::outbound::persistence::{run_migrations, DbPool, PoolConfig};
use backend::server::{run, ServerConfig};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let mut config = ServerConfig::new(session_key()?, cookie_secure, bind_addr);

    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            run_migrations(&database_url)
                .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
            let pool = DbPool::new(PoolConfig::new(&database_url))
                .await
                .map_err(|e| std::io::Error::other(format!("pool build failed: {e}")))?;
            config = config.with_db_pool(pool);
        }
        Err(_) => {
            warn!("DATABASE_URL not set; serving from the in-memory store");
        }
    }

    let (server, health) = run(config)?;
    health.mark_ready();
    info!(addr = %bind_addr, "server started");

    let result = server.await;
    health.mark_unhealthy();
    result
}
