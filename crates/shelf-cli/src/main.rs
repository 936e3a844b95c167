#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use shelf_core::config::load_user_config;
use std::env;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "shelf: track the books, films, series, anime and manga you consume",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output (shorthand for --format json).
    #[arg(long, global = true)]
    json: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment and user config.
    fn output_mode(&self) -> OutputMode {
        let user_output = load_user_config().ok().and_then(|c| c.output);
        resolve_output_mode(self.format, self.json, user_output.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a shelf",
        long_about = "Create .shelf/ with a default config and an empty store in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a shelf here\n    shelf init\n\n    # Emit machine-readable output\n    shelf init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Catalog",
        about = "Add a work",
        long_about = "Add a new work. Tags are trimmed, lowercased and capped at 20.",
        after_help = "EXAMPLES:\n    # Add a book to the backlog\n    shelf add --title \"Dune\" --type book\n\n    # Add an anime you are watching\n    shelf add --title \"Frieren\" -t anime --status in-progress --progress 12/28\n\n    # Emit machine-readable output\n    shelf add --title \"Dune\" -t book --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Catalog",
        about = "Update fields on a work",
        long_about = "Change only the fields you pass. Every update refreshes updatedAt.",
        after_help = "EXAMPLES:\n    # Finish a book and rate it\n    shelf update wk-3f9a0c12be --status finished --rating 5\n\n    # Bump progress\n    shelf update wk-3f9a0c12be --progress 120/320\n\n    # Clear the rating\n    shelf update wk-3f9a0c12be --clear-rating"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Catalog",
        about = "Remove a work",
        long_about = "Delete a work permanently. Removing an unknown id is not an error.",
        after_help = "EXAMPLES:\n    # Remove a work\n    shelf remove wk-3f9a0c12be"
    )]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        next_help_heading = "Read",
        about = "List works",
        long_about = "List works, most recently updated first. --status takes precedence over --type.",
        after_help = "EXAMPLES:\n    # Everything (up to the default limit)\n    shelf list\n\n    # What you are watching or reading\n    shelf list --status in-progress\n\n    # All manga, best rated first\n    shelf list --type manga --sort rating\n\n    # Emit machine-readable output\n    shelf list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one work",
        long_about = "Show every field of a single work by ID.",
        after_help = "EXAMPLES:\n    # Show a work\n    shelf show wk-3f9a0c12be\n\n    # Emit machine-readable output\n    shelf show wk-3f9a0c12be --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(next_help_heading = "Read", about = "Search titles, creators and tags")]
    Search(cmd::search::SearchArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show in-progress, backlog and finished works",
        after_help = "EXAMPLES:\n    # Overview of the shelf\n    shelf dashboard"
    )]
    Dashboard(cmd::dashboard::DashboardArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    shelf completions bash > ~/.local/share/bash-completion/completions/shelf"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("SHELF_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose || env::var("DEBUG").is_ok() {
            "shelf=debug,shelf_core=debug,info"
        } else {
            "shelf=info,shelf_core=info,warn"
        })
    });

    let format = env::var("SHELF_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output, &project_root),
        Commands::Add(args) => cmd::add::run_add(args, output, &project_root),
        Commands::Update(args) => cmd::update::run_update(args, output, &project_root),
        Commands::Remove(args) => cmd::remove::run_remove(args, output, &project_root),
        Commands::List(args) => cmd::list::run_list(args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(args, output, &project_root),
        Commands::Search(args) => cmd::search::run_search(args, output, &project_root),
        Commands::Dashboard(args) => {
            cmd::dashboard::run_dashboard(args, output, &project_root)
        }
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            if let Err(render_err) = render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
