//! imapd demo server.
//!
//! Serves a small in-memory mailbox over IMAP. Configuration comes from the
//! environment:
//!
//! | variable | default |
//! |---|---|
//! | `IMAPD_ADDR` | `0.0.0.0:143` (`0.0.0.0:993` with implicit TLS) |
//! | `IMAPD_HOSTNAME` | `localhost` |
//! | `IMAPD_CERT`, `IMAPD_KEY` | unset: no TLS |
//! | `IMAPD_IMPLICIT_TLS` | `false` |
//! | `IMAPD_INSECURE_LOGIN` | `false` |
//! | `IMAPD_READ_TIMEOUT_SECS`, `IMAPD_WRITE_TIMEOUT_SECS` | unset: no deadline |
//! | `IMAPD_USER`, `IMAPD_PASSWORD` | `demo` / `demo` |

mod memory;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use imapd::{Config, Server};
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memory::MemoryBackend;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imapd=debug,imapd_demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_from_env()?;
    let implicit_tls = flag("IMAPD_IMPLICIT_TLS")?;

    let backend = MemoryBackend::with_sample_data(
        env::var("IMAPD_USER").unwrap_or_else(|_| "demo".to_string()),
        env::var("IMAPD_PASSWORD").unwrap_or_else(|_| "demo".to_string()),
    );

    info!(
        hostname = %config.hostname,
        tls = config.tls.is_some(),
        implicit_tls,
        "Starting imapd demo"
    );

    let server = Server::new(config, Arc::new(backend));
    if implicit_tls {
        server.listen_and_serve_tls().await?;
    } else {
        server.listen_and_serve().await?;
    }
    Ok(())
}

fn config_from_env() -> Result<Config> {
    let mut builder = Config::builder().insecure_login(flag("IMAPD_INSECURE_LOGIN")?);

    if let Ok(addr) = env::var("IMAPD_ADDR") {
        builder = builder.addr(addr);
    }
    if let Ok(hostname) = env::var("IMAPD_HOSTNAME") {
        builder = builder.hostname(hostname);
    }
    if let Some(timeout) = seconds("IMAPD_READ_TIMEOUT_SECS")? {
        builder = builder.read_timeout(timeout);
    }
    if let Some(timeout) = seconds("IMAPD_WRITE_TIMEOUT_SECS")? {
        builder = builder.write_timeout(timeout);
    }

    match (env::var("IMAPD_CERT"), env::var("IMAPD_KEY")) {
        (Ok(cert), Ok(key)) => builder = builder.tls(load_tls(&cert, &key)?),
        (Err(_), Err(_)) => {}
        _ => bail!("IMAPD_CERT and IMAPD_KEY must be set together"),
    }

    Ok(builder.build())
}

/// Builds a rustls server config from PEM files.
fn load_tls(cert_path: &str, key_path: &str) -> Result<Arc<rustls::ServerConfig>> {
    let certs = CertificateDer::pem_file_iter(cert_path)
        .with_context(|| format!("Failed to open certificate file {cert_path}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse certificates in {cert_path}"))?;
    let key = PrivateKeyDer::from_pem_file(key_path)
        .with_context(|| format!("Failed to load private key from {key_path}"))?;

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("Invalid certificate or key")?;
    Ok(Arc::new(config))
}

fn flag(name: &str) -> Result<bool> {
    match env::var(name) {
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => bail!("{name} must be a boolean, got {value:?}"),
        },
        Err(_) => Ok(false),
    }
}

fn seconds(name: &str) -> Result<Option<Duration>> {
    env::var(name)
        .ok()
        .map(|value| {
            value
                .parse()
                .map(Duration::from_secs)
                .with_context(|| format!("{name} must be a number of seconds"))
        })
        .transpose()
}
