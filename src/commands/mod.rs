pub mod changelog;
pub mod list;
pub mod publish;
pub mod tag;
pub mod version;

use {
    crate::{
        error::ReleaseError,
        types::{ReleaseOptions, StageReport, DEFAULT_PACKAGES_DIR},
        Result,
    },
    clap::Args,
    std::path::PathBuf,
};

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory whose children are packages when pnpm-workspace.yaml lists none
    #[arg(
        long,
        global = true,
        env = "MONOREL_PACKAGES_DIR",
        default_value = DEFAULT_PACKAGES_DIR
    )]
    pub packages_dir: String,

    /// Repository root; defaults to the current directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn release_options(&self, dry_run: bool) -> ReleaseOptions {
        ReleaseOptions {
            dry_run,
            packages_dir: self.packages_dir.clone(),
        }
    }

    pub fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(|e| ReleaseError::io(".", e)),
        }
    }
}

pub(crate) fn print_dry_run_notice(options: &ReleaseOptions) {
    if options.dry_run {
        println!("Dry run: no changes will be made.\n");
    }
}

pub(crate) fn print_batch(report: &StageReport) {
    if let Some(summary) = report.summary() {
        println!("\n{summary}");
        if summary.has_failures() {
            println!("Failed: {}", summary.failed.join(", "));
        }
    }
}
