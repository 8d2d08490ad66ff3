use clap::Parser;
use dukkan::adapter::inbound::cli::{self, command::Cli, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    if let Err(e) = cli::execute(args).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
