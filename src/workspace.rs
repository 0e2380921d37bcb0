//! Workspace topology: decides whether a root is a pnpm monorepo and turns it
//! into the ordered list of packages every stage iterates over.

use {
    crate::{
        error::ReleaseError,
        types::{Package, ReleaseOptions},
        utils::{fs::find_candidate_dirs, manifest::Manifest},
        Result,
    },
    globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder},
    log::{debug, warn},
    serde::Deserialize,
    std::{
        collections::{HashMap, HashSet},
        fs, io,
        path::{Path, PathBuf},
    },
};

pub const WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkspaceConfig {
    /// Ordered package globs; `!`-prefixed entries exclude.
    #[serde(default)]
    pub packages: Option<Vec<String>>,
}

/// Result of looking for a workspace config at a root.
#[derive(Debug)]
pub enum WorkspaceProbe {
    Present(WorkspaceConfig),
    Absent,
    Invalid(ReleaseError),
}

impl WorkspaceProbe {
    pub fn load(root: &Path) -> Self {
        let path = root.join(WORKSPACE_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::Absent,
            Err(e) => return Self::Invalid(ReleaseError::io(path, e)),
        };
        // an empty file is a workspace with no explicit globs
        match serde_yaml::from_str::<Option<WorkspaceConfig>>(&content) {
            Ok(config) => Self::Present(config.unwrap_or_default()),
            Err(source) => Self::Invalid(ReleaseError::Config { path, source }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceResolver {
    root: PathBuf,
    default_glob: String,
}

impl WorkspaceResolver {
    /// `root` should be absolute; it is canonicalized on [`Self::resolve`].
    pub fn new(root: impl Into<PathBuf>, options: &ReleaseOptions) -> Self {
        Self {
            root: root.into(),
            default_glob: options.default_glob(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_monorepo(&self) -> bool {
        self.root.join(WORKSPACE_FILE).is_file()
    }

    pub fn resolve(&self) -> Result<Vec<Package>> {
        let root = self
            .root
            .canonicalize()
            .map_err(|e| ReleaseError::io(&self.root, e))?;

        let packages = match WorkspaceProbe::load(&root) {
            WorkspaceProbe::Absent => {
                let manifest = Manifest::read(&root)?;
                debug!("no {WORKSPACE_FILE}, treating {} as a single package", root.display());
                vec![Package::new(manifest.name(), root)]
            }
            WorkspaceProbe::Invalid(err) => return Err(err),
            WorkspaceProbe::Present(config) => {
                let globs = config
                    .packages
                    .unwrap_or_else(|| vec![self.default_glob.clone()]);
                self.expand(&root, &globs)?
            }
        };

        ensure_unique_names(&packages)?;
        Ok(packages)
    }

    fn expand(&self, root: &Path, globs: &[String]) -> Result<Vec<Package>> {
        let (includes, excludes) = compile_globs(globs)?;
        let candidates = find_candidate_dirs(root)?;

        let mut seen = HashSet::new();
        let mut packages = vec![];
        for (pattern, matcher) in &includes {
            let mut matched = 0usize;
            for relative in &candidates {
                if !matcher.is_match(relative) || excludes.is_match(relative) {
                    continue;
                }
                if !seen.insert(relative) {
                    continue;
                }
                let dir = root.join(relative);
                if !Manifest::exists_in(&dir) {
                    debug!("skipping {}: no package.json", relative.display());
                    continue;
                }
                match Manifest::read(&dir) {
                    Ok(manifest) => {
                        matched = matched.saturating_add(1);
                        packages.push(Package::new(manifest.name(), dir));
                    }
                    Err(err) => warn!("skipping {}: {err}", relative.display()),
                }
            }
            debug!("glob '{pattern}' matched {matched} package(s)");
        }
        Ok(packages)
    }
}

fn normalize_pattern(pattern: &str) -> &str {
    let pattern = pattern.trim();
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    pattern.trim_end_matches('/')
}

fn build_glob(pattern: &str) -> Result<globset::Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ReleaseError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

type IncludeMatchers = Vec<(String, GlobMatcher)>;

fn compile_globs(globs: &[String]) -> Result<(IncludeMatchers, GlobSet)> {
    let mut includes = vec![];
    let mut excludes = GlobSetBuilder::new();
    for raw in globs {
        match raw.trim().strip_prefix('!') {
            Some(negated) => {
                excludes.add(build_glob(normalize_pattern(negated))?);
            }
            None => {
                let pattern = normalize_pattern(raw);
                includes.push((pattern.to_string(), build_glob(pattern)?.compile_matcher()));
            }
        }
    }
    let excludes = excludes.build().map_err(|source| ReleaseError::InvalidGlob {
        pattern: globs.join(", "),
        source,
    })?;
    Ok((includes, excludes))
}

fn ensure_unique_names(packages: &[Package]) -> Result<()> {
    let mut by_name: HashMap<&str, &Path> = HashMap::new();
    for package in packages {
        if let Some(first) = by_name.insert(&package.name, &package.path) {
            return Err(ReleaseError::DuplicatePackage {
                name: package.name.clone(),
                first: first.to_path_buf(),
                second: package.path.clone(),
            });
        }
    }
    Ok(())
}
