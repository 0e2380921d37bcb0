use std::path::PathBuf;

pub const DEFAULT_PACKAGES_DIR: &str = "packages";

/// A publishable unit: a directory holding its own `package.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Absolute path of the package directory.
    pub path: PathBuf,
}

impl Package {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Per-invocation settings threaded through the resolver and every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub dry_run: bool,
    /// Directory used to build the default `<dir>/*` glob when the workspace
    /// config does not list any packages.
    pub packages_dir: String,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            packages_dir: DEFAULT_PACKAGES_DIR.to_string(),
        }
    }
}

impl ReleaseOptions {
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn default_glob(&self) -> String {
        format!("{}/*", self.packages_dir.trim_end_matches('/'))
    }
}
