mod cli;
mod core;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "costscope", about = "AWS Cost Explorer monthly reporting CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch cost data and render the monthly report (default)
    Report {
        /// Month to analyze: jan, january, jan2024, feb-2026 (default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Year for a bare month token (ignored when the token embeds one)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output PDF path (default: cost-report-<year>-<month>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// AWS profile to use (default: ambient credentials)
        #[arg(long)]
        profile: Option<String>,

        /// AWS region for the Cost Explorer endpoint
        #[arg(long)]
        region: Option<String>,

        /// Skip PDF generation, console output only
        #[arg(long)]
        no_pdf: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = crate::core::config::AppConfig::load().unwrap_or_default();

    let output_opts = cli::output::OutputOptions {
        format: cli::output::resolve_format(
            cli.json,
            cli.format.as_deref(),
            &config.settings.default_format,
        ),
        pretty: cli.pretty,
        use_color: cli::output::resolve_color(cli.no_color, &config.settings.color),
        verbose: cli.verbose,
    };

    match cli.command {
        None | Some(Commands::Report { .. }) => {
            let args = match cli.command {
                Some(Commands::Report {
                    month,
                    year,
                    output,
                    profile,
                    region,
                    no_pdf,
                }) => cli::report_cmd::ReportArgs {
                    month,
                    year,
                    output,
                    profile,
                    region,
                    no_pdf,
                },
                _ => cli::report_cmd::ReportArgs::default(),
            };
            cli::report_cmd::run(args, &config, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
        },
    }

    Ok(())
}
