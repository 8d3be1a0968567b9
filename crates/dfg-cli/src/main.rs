mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dfg",
    about = "Dockerfile generator: discover modules, render the selection page, resolve build plans",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: nearest dfg.yaml walking upward, else built-in defaults)
    #[arg(long, global = true, env = "DFG_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default dfg.yaml
    Init {
        /// Directory to scan for modules
        #[arg(long)]
        modules_root: Option<PathBuf>,
    },

    /// List the directories and modules discovered under the modules root
    Scan {
        /// Override the configured modules root
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Print the selection markup
    Render {
        /// Override the configured modules root
        #[arg(long)]
        root: Option<PathBuf>,

        /// Wrap the markup in the page templates and exceptions table
        #[arg(long)]
        page: bool,
    },

    /// Resolve a submitted selection into build operations
    Plan {
        /// Raw submission body, e.g. `checkbox=001_base%2FubuntuEND`
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        payload: Option<String>,

        /// Read the submission body from stdin
        #[arg(long)]
        stdin: bool,

        /// Run the operations after resolving them
        #[arg(long)]
        execute: bool,
    },

    /// Serve the selection page
    Serve {
        /// Port to listen on (default: server.port from config, 0 = OS-assigned)
        #[arg(long)]
        port: Option<u16>,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = root::resolve_config(cli.config.as_deref());

    let result = match cli.command {
        Commands::Init { modules_root } => cmd::init::run(&config_path, modules_root),
        Commands::Scan { root } => cmd::scan::run(&config_path, root, cli.json),
        Commands::Render { root, page } => cmd::render::run(&config_path, root, page),
        Commands::Plan {
            payload,
            stdin,
            execute,
        } => cmd::plan::run(&config_path, payload, stdin, execute, cli.json),
        Commands::Serve { port, no_open } => cmd::serve::run(&config_path, port, no_open),
        Commands::Config { subcommand } => cmd::config::run(&config_path, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
