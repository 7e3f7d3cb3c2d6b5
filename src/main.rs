//! CLI entry point for the bookfetch tool.

use anyhow::Result;

mod app;
mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    app::runtime::run_bookfetch().await
}
