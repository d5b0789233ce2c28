use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use git_semver::cli::{self, RunArgs};
use git_semver::logging;
use git_semver::strategy::StrategyKind;
use git_semver::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-semver",
    version,
    about = "Compute a semantic version from git history"
)]
struct Args {
    #[arg(default_value = ".", help = "Directory inside the repository")]
    dir: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        value_name = "NAMES",
        help = "Print NAME=value for comma separated metadata names, or ALL"
    )]
    metas: Option<String>,

    #[arg(short, long, help = "Strategy: configurable, maven or pattern")]
    strategy: Option<StrategyKind>,

    #[arg(long, help = "Maximum number of commits walked back from HEAD")]
    max_depth: Option<u32>,

    #[arg(long, help = "Append a dirty qualifier on a modified working tree")]
    use_dirty: bool,

    #[arg(long, help = "Append the abbreviated commit id")]
    use_commit_id: bool,

    #[arg(long, help = "Fail unless the version is strict SemVer 2.0")]
    strict_semver: bool,

    #[arg(short, long, help = "Log pipeline decisions to stderr")]
    verbose: bool,
}

impl From<Args> for RunArgs {
    fn from(args: Args) -> Self {
        RunArgs {
            dir: args.dir,
            config_path: args.config,
            metas: args.metas,
            strategy: args.strategy,
            max_depth: args.max_depth,
            use_dirty: args.use_dirty,
            use_commit_id: args.use_commit_id,
            strict_semver: args.strict_semver,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    match cli::run(&args.into()) {
        Ok(lines) => {
            ui::print_lines(&lines);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&ui::error_message(e.as_ref()));
            std::process::exit(1);
        }
    }
}
