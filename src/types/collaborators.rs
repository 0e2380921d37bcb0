//! Seams between the pipeline and the outside world.
//!
//! Production implementations live in [`crate::utils`] and shell out to `git`,
//! `pnpm` and friends; tests substitute recording fakes.

use {
    crate::Result,
    std::path::{Path, PathBuf},
};

/// Captured result of a successful external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

pub trait TagPublisher {
    /// # Errors
    ///
    /// Returns `ReleaseError::ExternalCommand` if the tag cannot be created,
    /// including when it already exists.
    fn create_tag(&self, repo_dir: &Path, tag_name: &str) -> Result<CommandOutput>;

    /// # Errors
    ///
    /// Returns `ReleaseError::ExternalCommand` if the push is rejected.
    fn push_tag(&self, repo_dir: &Path, tag_name: &str) -> Result<CommandOutput>;
}

pub trait RegistryPublisher {
    /// # Errors
    ///
    /// Returns `ReleaseError::ExternalCommand` if the registry rejects the package.
    fn publish(&self, package_dir: &Path) -> Result<CommandOutput>;
}

pub trait WorkingTree {
    /// Discards uncommitted modifications of exactly one file.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::ExternalCommand` if the file cannot be restored.
    fn restore_file(&self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogPreset {
    ConventionalCommits,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogRequest {
    pub package_name: String,
    pub package_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub version: Option<String>,
    pub preset: ChangelogPreset,
    /// How many releases of history to render.
    pub release_count: usize,
    /// Ignore pre-release tags when locating release boundaries.
    pub skip_unstable: bool,
}

/// Lazily produced changelog text. Every call to
/// [`ChangelogGenerator::generate`] starts a fresh stream.
pub type ChangelogStream<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

pub trait ChangelogGenerator {
    /// # Errors
    ///
    /// Returns an error if commit history is unavailable. Errors may also be
    /// yielded mid-stream.
    fn generate(&self, request: &ChangelogRequest) -> Result<ChangelogStream<'_>>;
}
