use {
    crate::{
        commands::{changelog, publish, tag, version},
        error::ReleaseError,
        types::{
            ChangelogGenerator, Package, RegistryPublisher, ReleaseOptions, StageReport,
            TagPublisher, WorkingTree,
        },
        utils::{
            changelog::ConventionalChangelog, git::GitCli, manifest::Manifest,
            registry::PnpmRegistry,
        },
        workspace::WorkspaceResolver,
        Result,
    },
    log::debug,
    std::path::PathBuf,
};

/// The single operation one invocation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    List,
    Version(version::Bump),
    Tag,
    Publish,
    Changelog,
}

/// Resolves the workspace, then runs one stage over it with the configured
/// collaborators.
pub struct ReleasePipeline {
    root: PathBuf,
    options: ReleaseOptions,
    tags: Box<dyn TagPublisher>,
    registry: Box<dyn RegistryPublisher>,
    working_tree: Box<dyn WorkingTree>,
    changelog: Box<dyn ChangelogGenerator>,
}

impl ReleasePipeline {
    /// A pipeline backed by `git`, `pnpm` and the conventional-commits changelog.
    pub fn new(root: impl Into<PathBuf>, options: ReleaseOptions) -> Self {
        Self {
            root: root.into(),
            options,
            tags: Box::new(GitCli::default()),
            registry: Box::new(PnpmRegistry),
            working_tree: Box::new(GitCli::default()),
            changelog: Box::new(ConventionalChangelog::default()),
        }
    }

    pub fn with_tag_publisher(mut self, tags: impl TagPublisher + 'static) -> Self {
        self.tags = Box::new(tags);
        self
    }

    pub fn with_registry(mut self, registry: impl RegistryPublisher + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    pub fn with_working_tree(mut self, working_tree: impl WorkingTree + 'static) -> Self {
        self.working_tree = Box::new(working_tree);
        self
    }

    pub fn with_changelog(mut self, changelog: impl ChangelogGenerator + 'static) -> Self {
        self.changelog = Box::new(changelog);
        self
    }

    pub fn run(&self, stage: Stage) -> Result<StageReport> {
        let resolver = WorkspaceResolver::new(&self.root, &self.options);
        let packages = resolver.resolve()?;
        debug!("resolved {} package(s)", packages.len());

        let report = match stage {
            Stage::List => StageReport::List {
                packages,
                monorepo: resolver.is_monorepo(),
            },
            Stage::Version(bump) => {
                StageReport::Version(version::apply(&packages, &bump, &self.options)?)
            }
            Stage::Tag => {
                StageReport::Tag(tag::apply(&packages, self.tags.as_ref(), &self.options))
            }
            Stage::Publish => StageReport::Publish(publish::apply(
                &packages,
                self.registry.as_ref(),
                self.working_tree.as_ref(),
                &self.options,
            )),
            Stage::Changelog => {
                let target = self.root_package()?;
                StageReport::Changelog(changelog::apply(
                    &target,
                    self.changelog.as_ref(),
                    &self.options,
                )?)
            }
        };
        Ok(report)
    }

    fn root_package(&self) -> Result<Package> {
        let root = self
            .root
            .canonicalize()
            .map_err(|e| ReleaseError::io(&self.root, e))?;
        let manifest = Manifest::read_unnamed(&root)?;
        let name = match manifest.name() {
            "" => root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "root".to_string()),
            name => name.to_string(),
        };
        Ok(Package::new(name, root))
    }
}
