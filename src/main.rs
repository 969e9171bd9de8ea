use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use clap::Parser;

use image_tagger::cli::run_pipeline;
use image_tagger::config::{self, InputOverrides};
use image_tagger::context::BuildContext;
use image_tagger::exec::ProcessRunner;
use image_tagger::report;
use image_tagger::store::LocalFileStore;
use image_tagger::ui;

#[derive(clap::Parser)]
#[command(
    name = "image-tagger",
    about = "Compute Docker image tags for a CI build and record the image version"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        long,
        env = "INPUT_VERSION-FILE",
        help = "JSON file holding the current released version"
    )]
    version_file: Option<String>,

    #[arg(
        long,
        env = "INPUT_TRUNK-BRANCH",
        help = "Branch whose builds produce released versions"
    )]
    trunk_branch: Option<String>,

    #[arg(
        long,
        env = "INPUT_DEFAULT-TRUNK-VERSION",
        help = "Version used when the trunk has no version yet"
    )]
    default_trunk_version: Option<String>,

    #[arg(
        long,
        env = "INPUT_VERSION-RECORD",
        help = "Where to write the version record (defaults to the version file)"
    )]
    version_record: Option<String>,

    #[arg(long, help = "Resolve tags and report without writing or committing")]
    dry_run: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("image-tagger {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing();

    let actions = ui::in_github_actions();
    if let Err(e) = run(args, actions) {
        ui::display_error(&format!("Action failed with error: {}", e), actions);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(console::colors_enabled())
        .without_time()
        .init();
}

fn run(args: Args, actions: bool) -> Result<()> {
    let overrides = InputOverrides {
        version_file: args.version_file,
        trunk_branch: args.trunk_branch,
        default_trunk_version: args.default_trunk_version,
        version_record: args.version_record,
    };
    let settings = config::load_config(args.config.as_deref())?
        .with_overrides(overrides)
        .settings()?;

    let ctx = BuildContext::from_env()?;
    if args.dry_run {
        ui::display_status("Dry run: the version record will not be written or committed");
    }
    let output = run_pipeline(
        &ctx,
        &settings,
        LocalFileStore::new(),
        ProcessRunner::new(),
        args.dry_run,
    )?;
    let outputs = output.outputs();

    match (actions, std::env::var_os("GITHUB_OUTPUT")) {
        (true, Some(path)) => {
            let path = Path::new(&path);
            outputs
                .append_to(path, &output_delimiter())
                .map_err(|e| anyhow!("cannot write step outputs to {}: {}", path.display(), e))?;
        }
        _ => ui::display_outputs(&outputs.pairs()),
    }

    if let Some(path) = std::env::var_os("GITHUB_STEP_SUMMARY") {
        let path = Path::new(&path);
        report::append_step_summary(path, &output.report)
            .map_err(|e| anyhow!("cannot write job summary to {}: {}", path.display(), e))?;
    }

    if output.tags.version.is_released() {
        ui::display_success(&format!(
            "Released image version {} as {}",
            output.tags.version,
            output.tags.primary_image()
        ));
    } else {
        ui::display_success(&format!("Snapshot image {}", output.tags.primary_image()));
    }
    Ok(())
}

/// Heredoc delimiter for `GITHUB_OUTPUT` entries, unique per run.
fn output_delimiter() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("ghadelimiter_{}_{}", std::process::id(), nanos)
}
