use std::process::ExitCode;

use clap::Parser;
use tuition_benefit::{api, logging};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_default_logging();
    let cli = api::Cli::parse();
    api::run(cli).await
}
