pub mod collaborators;
pub mod package;
pub mod report;

pub use collaborators::{
    ChangelogGenerator, ChangelogPreset, ChangelogRequest, ChangelogStream, CommandOutput,
    RegistryPublisher, TagPublisher, WorkingTree,
};
pub use package::{Package, ReleaseOptions, DEFAULT_PACKAGES_DIR};
pub use report::{
    BatchSummary, ChangelogResult, Outcome, PublishResult, StageReport, TagResult, VersionChange,
};
