use crate::commands::{
    run_bands_set, run_bands_show, run_calculate, run_export, run_list, run_show, BandsArgs,
    BandsSetArgs, CalculateArgs, ExportArgs, ListArgs, ShowArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use riskmetrica::config::AppConfig;
use riskmetrica::error::AppError;
use riskmetrica::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "riskmetrica",
    about = "Score risk appetite, check decision guardrails and manage saved assessments",
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
    /// Score a context and dimension file and check guardrails
    Calculate(CalculateArgs),
    /// Browse and export saved assessments
    Assessments {
        #[command(subcommand)]
        command: AssessmentsCommand,
    },
    /// Inspect or replace the appetite band configuration
    Bands {
        #[command(subcommand)]
        command: BandsCommand,
    },
    /// Run the seeded SME lending assessment end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum AssessmentsCommand {
    /// List saved assessments, newest first
    List(ListArgs),
    /// Print a saved assessment as JSON
    Show(ShowArgs),
    /// Render a saved assessment as a board pack or result JSON
    Export(ExportArgs),
}

#[derive(Subcommand, Debug)]
enum BandsCommand {
    /// Print the bands currently in effect
    Show(BandsArgs),
    /// Validate a band file and install it as the configured bands
    Set(BandsSetArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Calculate(args) => run_calculate(&config, args),
        Command::Assessments { command } => match command {
            AssessmentsCommand::List(args) => run_list(&config, args),
            AssessmentsCommand::Show(args) => run_show(&config, args),
            AssessmentsCommand::Export(args) => run_export(&config, args),
        },
        Command::Bands { command } => match command {
            BandsCommand::Show(args) => run_bands_show(&config, args),
            BandsCommand::Set(args) => run_bands_set(&config, args),
        },
        Command::Demo(args) => run_demo(&config, args),
    }
}
