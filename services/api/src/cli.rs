use crate::demo::{
    run_demo, run_player, run_report, run_roster, DemoArgs, PlayerArgs, ReportArgs, RosterArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use playbook::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Playbook",
    about = "Rate, rank, and track spend across a dating roster from the command line",
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
    /// Print the playbook report for a JSON snapshot
    Report(ReportArgs),
    /// List the roster split into active and benched profiles
    Roster(RosterArgs),
    /// Show one profile's rating breakdown, spend, and history
    Player(PlayerArgs),
    /// Seed a synthetic roster and walk through every view
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
    /// Preload the in-memory store from a JSON snapshot
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Roster(args) => run_roster(args),
        Command::Player(args) => run_player(args),
        Command::Demo(args) => run_demo(args),
    }
}
