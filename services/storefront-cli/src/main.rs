//! `voltmarket`: drive the storefront controllers from a terminal.

mod cli;
mod commands;
mod config;
mod render;
mod token_file;

use std::io;
use std::rc::Rc;

use clap::Parser;
use tracing::info;
use vm_client::{ApiClient, NoopNavigator};
use vm_http::ReqwestTransport;

use crate::cli::Cli;
use crate::config::Settings;
use crate::token_file::FileTokenStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli.api_url, cli.token_file);
    info!(base_url = %settings.client.base_url, token_file = %settings.token_file, "starting");

    let client = Rc::new(ApiClient::new(
        settings.client,
        ReqwestTransport::new(),
        Rc::new(FileTokenStore::new(settings.token_file)),
        Rc::new(NoopNavigator),
    ));

    let mut out = io::stdout().lock();
    commands::run(cli.command, client, &mut out).await
}
