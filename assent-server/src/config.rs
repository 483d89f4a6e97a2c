use std::{fs, ops::RangeInclusive, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug, Clone, Deserialize)]
#[command(name = "server")]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    #[clap(long)]
    #[arg(short = 'c')]
    #[serde(default)]
    pub config: Option<String>,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("assent_server=info"))]
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("0.0.0.0"))]
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[clap(long, env)]
    #[arg(value_parser = port_in_range, short = 'p', default_value_t = 8080)]
    #[serde(default = "default_port")]
    pub port: u16,
    /// Statement file (`.toml` or `.json`) loaded into the static warden.
    #[clap(long, env)]
    #[serde(default)]
    pub policy_file: Option<String>,
    #[clap(long, env)]
    #[arg(default_value_t = 512)]
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    /// Deadline for one warden evaluation, in milliseconds.
    #[clap(long, env)]
    #[arg(default_value_t = 2000)]
    #[serde(default = "default_engine_timeout")]
    pub engine_timeout: u64,
    #[clap(long, env)]
    #[arg(default_value_t = 1024 * 1024)]
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl AppConfig {
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout)
    }
}

fn default_rust_log() -> String {
    String::from("assent_server=info")
}

fn default_endpoint() -> String {
    String::from("0.0.0.0")
}

fn default_port() -> u16 {
    8080
}

fn default_cache_size() -> usize {
    512
}

fn default_engine_timeout() -> u64 {
    2000
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` isn't a port number"))?;
    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn load(cfg: &str) -> Result<AppConfig> {
    let content =
        fs::read_to_string(cfg).context("could not read config file")?;
    toml::from_str(&content).context("could not parse config file")
}
