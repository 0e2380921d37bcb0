use {
    super::Package,
    crate::error::EXIT_PARTIAL_FAILURE,
    semver::Version,
    std::{fmt, path::PathBuf},
};

/// What happened to one package in a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry run: the effect was computed but not performed.
    Planned,
    Applied,
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Applied => write!(f, "done"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub name: String,
    pub old_version: Version,
    pub new_version: Version,
    /// False for dry runs.
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagResult {
    pub name: String,
    pub tag_name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub name: String,
    pub version: String,
    pub published: bool,
    pub outcome: Outcome,
    /// Set when publishing succeeded but restoring the manifest did not.
    pub revert_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogResult {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
    pub written: bool,
}

/// Names of packages grouped by outcome, in pipeline order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

impl BatchSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = (&'a str, &'a Outcome)>) -> Self {
        let mut summary = Self::default();
        for (name, outcome) in outcomes {
            let bucket = match outcome {
                Outcome::Planned | Outcome::Applied => &mut summary.succeeded,
                Outcome::Skipped(_) => &mut summary.skipped,
                Outcome::Failed(_) => &mut summary.failed,
            };
            bucket.push(name.to_string());
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded / {} failed",
            self.succeeded.len(),
            self.failed.len()
        )?;
        if !self.skipped.is_empty() {
            write!(f, " / {} skipped", self.skipped.len())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageReport {
    List {
        packages: Vec<Package>,
        monorepo: bool,
    },
    Version(Vec<VersionChange>),
    Tag(Vec<TagResult>),
    Publish(Vec<PublishResult>),
    Changelog(ChangelogResult),
}

impl StageReport {
    /// Only the fan-out stages have per-package outcomes to summarize.
    pub fn summary(&self) -> Option<BatchSummary> {
        match self {
            Self::Tag(results) => Some(BatchSummary::from_outcomes(
                results.iter().map(|r| (r.name.as_str(), &r.outcome)),
            )),
            Self::Publish(results) => Some(BatchSummary::from_outcomes(
                results.iter().map(|r| (r.name.as_str(), &r.outcome)),
            )),
            Self::List { .. } | Self::Version(_) | Self::Changelog(_) => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.summary() {
            Some(summary) if summary.has_failures() => EXIT_PARTIAL_FAILURE,
            _ => 0,
        }
    }
}
