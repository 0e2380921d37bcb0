use {
    super::process::run_command,
    crate::{
        types::{CommandOutput, RegistryPublisher},
        Result,
    },
    std::path::Path,
};

const PUBLISH_ARGS: [&str; 2] = ["publish", "--no-git-checks"];

/// Publishes through `pnpm publish`, with pnpm's branch and clean-tree checks
/// turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnpmRegistry;

impl RegistryPublisher for PnpmRegistry {
    fn publish(&self, package_dir: &Path) -> Result<CommandOutput> {
        run_command("pnpm", &PUBLISH_ARGS, package_dir)
    }
}
