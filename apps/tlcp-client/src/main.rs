use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use tlcp_core::{
    config::{ClientConfig, DEFAULT_CIPHER_SUITE, DEFAULT_CONN_ADDR},
    context,
    engine::{TlcpSession, VerifyPolicy},
    exchange::{self, ExchangeError},
};
use tlcp_engine_plain::PlainEngine;
use tlcp_net_tokio::dial_tcp;

#[derive(Parser)]
#[command(name = "tlcp-client", version, about = "TLCP dual-certificate client")]
struct Cli {
    /// host:port
    #[arg(long, default_value = DEFAULT_CONN_ADDR)]
    conn: String,

    /// cipher suite
    #[arg(long, default_value = DEFAULT_CIPHER_SUITE)]
    cipher: String,

    /// sign certificate file (PEM)
    #[arg(long = "sign_cert")]
    sign_cert: Option<PathBuf>,

    /// sign private key file (PEM)
    #[arg(long = "sign_key")]
    sign_key: Option<PathBuf>,

    /// encrypt certificate file (PEM)
    #[arg(long = "enc_cert")]
    enc_cert: Option<PathBuf>,

    /// encrypt private key file (PEM)
    #[arg(long = "enc_key")]
    enc_key: Option<PathBuf>,

    /// CA certificate file (PEM)
    #[arg(long = "CAfile")]
    ca_file: Option<PathBuf>,

    /// verify the peer against the trust anchors instead of skipping
    /// host verification
    #[arg(long, default_value_t = false)]
    verify: bool,
}

impl Cli {
    fn into_config(self) -> ClientConfig {
        ClientConfig {
            conn_addr: self.conn,
            cipher_suite: self.cipher,
            sign_cert: self.sign_cert,
            sign_key: self.sign_key,
            enc_cert: self.enc_cert,
            enc_key: self.enc_key,
            ca_file: self.ca_file,
            verify: if self.verify {
                VerifyPolicy::Strict
            } else {
                VerifyPolicy::SkipHostVerification
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run_client(cli.into_config()).await
}

async fn run_client(config: ClientConfig) -> Result<()> {
    let engine = PlainEngine::new();

    let ctx = context::build(&engine, &config).context("configuration failed")?;

    let mut session = dial_tcp(&ctx, &config.conn_addr, config.verify)
        .await
        .with_context(|| format!("failed to establish session with {}", config.conn_addr))?;

    println!("New connection: {}", session.params());

    let mut input = BufReader::new(tokio::io::stdin());
    let outcome = exchange::run_once(&mut session, &mut input).await;

    // Release the session on every path past establishment.
    session.close().await;

    match outcome {
        Ok(ex) => {
            println!(">>>\n{}", String::from_utf8_lossy(&ex.request));
            println!("<<<\n{}", String::from_utf8_lossy(&ex.response));
            Ok(())
        }
        // The one recoverable failure: report it and exit cleanly.
        Err(ExchangeError::Read(e)) => {
            eprintln!("read error: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
