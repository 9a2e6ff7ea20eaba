use clap::Parser;
use gh_stats::{gh_stats_main, GhStatsCli};
use std::process::exit;

#[tokio::main]
async fn main() {
    let _ = dotenv::dotenv();
    let args = GhStatsCli::parse();
    env_logger::builder()
        .filter_level(args.log_level())
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .init();
    log::debug!(concat!(
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    ));
    match gh_stats_main(args).await {
        Ok(_) => {
            exit(0);
        }
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    };
}
