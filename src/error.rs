use {std::path::PathBuf, thiserror::Error};

/// Exit code for resolution, configuration and usage failures.
pub const EXIT_FATAL: i32 = 1;
/// Exit code when a batch stage finished but at least one package failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("failed to parse workspace config at '{path}'")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid package glob '{pattern}'")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("no package.json found in '{path}'")]
    ManifestMissing { path: PathBuf },

    #[error("malformed manifest at '{path}': {reason}")]
    ManifestMalformed { path: PathBuf, reason: String },

    #[error("package name '{name}' is declared by both '{first}' and '{second}'")]
    DuplicatePackage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(
        "invalid bump kind '{0}', expected one of: major, premajor, minor, preminor, patch, \
         prepatch, prerelease"
    )]
    InvalidBumpKind(String),

    #[error("invalid prerelease identifier '{0}'")]
    InvalidPrereleaseId(String),

    #[error("`{command}` failed: {reason}")]
    ExternalCommand { command: String, reason: String },

    #[error("I/O error on '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReleaseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Every error that escapes the pipeline is fatal for the invocation; per-package
    /// failures of batch stages are reported through `StageReport` instead.
    pub fn exit_code(&self) -> i32 {
        EXIT_FATAL
    }
}
