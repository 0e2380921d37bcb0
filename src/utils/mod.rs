pub mod changelog;
pub mod fs;
pub mod git;
pub mod manifest;
pub mod process;
pub mod registry;

pub use changelog::ConventionalChangelog;
pub use fs::{find_candidate_dirs, write_atomic};
pub use git::GitCli;
pub use manifest::{Manifest, MANIFEST_FILE};
pub use process::run_command;
pub use registry::PnpmRegistry;
