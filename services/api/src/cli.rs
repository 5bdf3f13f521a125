use clap::{Args, Parser, Subcommand};

use changesim::error::AppError;

use crate::demo::{run_demo, DemoArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "ChangeSim",
    about = "Run the change leadership simulation service or a scripted demo game",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Play a complete seeded game in the terminal
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Fix the engine seed for reproducible event rolls and game codes
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
    }
}
