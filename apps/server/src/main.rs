use anyhow::Context;
use paywall::domain::config::ApiConfig;
use paywall::kernel::config::load_config;
use paywall_logger::Logger;
use paywall_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "server".to_owned());
    let cfg: ApiConfig =
        load_config(Some(&path)).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .directive(&cfg.logging.level)
        .directory(cfg.logging.directory.as_ref())
        .json(cfg.logging.json)
        .init()?;

    Server::builder().config(cfg).build().await?.run().await
}
