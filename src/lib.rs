//! monorel - release automation for npm packages
//!
//! Bumps versions, creates and pushes git tags, publishes to the registry and
//! regenerates the changelog for a single-package repository or every member of
//! a pnpm workspace.
//!
//! # Examples
//!
//! ## Listing workspace packages
//!
//! ```no_run
//! use monorel::{types::ReleaseOptions, workspace::WorkspaceResolver};
//!
//! let resolver = WorkspaceResolver::new("/path/to/repo", &ReleaseOptions::default());
//! for package in resolver.resolve().unwrap() {
//!     println!("{} ({})", package.name, package.path.display());
//! }
//! ```
//!
//! ## Bumping version
//!
//! ```no_run
//! use monorel::commands::version::{bump_version, BumpKind};
//! use semver::Version;
//!
//! let current = Version::parse("1.2.3").unwrap();
//! let new = bump_version(BumpKind::Minor, &current, None).unwrap();
//! assert_eq!(new, Version::parse("1.3.0").unwrap());
//! ```
//!
//! ## Running a stage
//!
//! ```no_run
//! use monorel::{
//!     pipeline::{ReleasePipeline, Stage},
//!     types::ReleaseOptions,
//! };
//!
//! let options = ReleaseOptions::default().dry_run(true);
//! let report = ReleasePipeline::new("/path/to/repo", options)
//!     .run(Stage::Tag)
//!     .unwrap();
//! std::process::exit(report.exit_code());
//! ```

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use commands::{changelog, list, publish, tag, version};
pub use error::ReleaseError;
pub use semver::Version;

pub type Result<T, E = ReleaseError> = std::result::Result<T, E>;
