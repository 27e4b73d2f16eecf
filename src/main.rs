use clap::Parser;
mod error;
mod logging;
mod tasks;
mod utils;

use tasks::Task;

/// Small fetch utilities: a timed random-image downloader and a crates.io
/// download-count reporter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Task,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init_tracing();

    let result = match args.command {
        Task::Images { path } => tasks::images::run(&path).await.map(|_| ()),
        Task::Downloads => tasks::downloads::run().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
