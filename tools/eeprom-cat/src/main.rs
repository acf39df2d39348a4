//! Read one sample from a running eeprom-pollerd and print it.
//!
//! The HTTP analog of `cat` against the device node: blocks until the
//! daemon has an undrained sample, prints it, and exits. Takes the
//! daemon base URL as an optional argument.

use anyhow::{bail, Context};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7786";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let url = format!("{}/api/v1/sample", base.trim_end_matches('/'));

    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        bail!("daemon returned {status}: {body}");
    }

    println!("{body}");
    Ok(())
}
