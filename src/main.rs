use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use semver_tag::config::{self, ConfigSources, PartialConfig};
use semver_tag::logging::{self, LogConfig};
use semver_tag::report::TracingReporter;
use semver_tag::tagger::{TagOutcome, Tagger, EXIT_CODE_FAILURE};
use semver_tag::{ui, TagError};

#[derive(Parser)]
#[command(
    name = "semver-tag",
    version,
    about = "Create annotated semver git tags from a VERSION file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tag HEAD with the configured version if it is newer than existing tags
    Tag(TagArgs),
}

#[derive(clap::Args)]
struct TagArgs {
    #[arg(long, help = "Print, but do not perform, any actions")]
    dry_run: bool,

    #[arg(short, long, help = "Custom YAML configuration file path")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(LogConfig::default());

    let code = match cli.command {
        Command::Tag(args) => match run_tag(args) {
            Ok(code) => code,
            Err(e) => {
                ui::display_error(&format!("{:#}", e));
                EXIT_CODE_FAILURE
            }
        },
    };

    std::process::exit(code);
}

fn run_tag(args: TagArgs) -> Result<i32> {
    let sources = ConfigSources::from_process(args.config)
        .context("Failed to read process environment")?;

    // Only an explicit flag overrides lower layers
    let overrides = PartialConfig {
        dry_run: args.dry_run.then_some(true),
        ..Default::default()
    };
    let config = config::load_config(&sources, overrides).context("Failed to load configuration")?;

    let reporter = TracingReporter;
    let tagger = Tagger::new(config, &reporter);
    let report = tagger.tag_at(&sources.working_dir);

    if let Some(line) = report.summary_line() {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", line)?;
        stdout.flush()?;
    }

    if let TagOutcome::Failed(err) = &report.outcome {
        if let TagError::DirtyWorktree(status) = err {
            ui::display_worktree_status(status);
        }
        ui::display_error(&err.to_string());
    }

    Ok(report.exit_code())
}
