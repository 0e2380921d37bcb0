use {
    super::{print_dry_run_notice, GlobalArgs},
    crate::{
        error::ReleaseError,
        pipeline::{ReleasePipeline, Stage},
        types::{Package, ReleaseOptions, StageReport, VersionChange},
        utils::manifest::Manifest,
        Result,
    },
    clap::Args,
    log::info,
    semver::{Prerelease, Version},
    std::{fmt, str::FromStr},
};

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// One of: major, premajor, minor, preminor, patch, prepatch, prerelease
    pub kind: String,

    /// Identifier for pre-release bumps, e.g. `beta` for 1.2.4-beta.0
    #[arg(long)]
    pub preid: Option<String>,

    #[arg(short, long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BumpKind {
    /// x.y.z -> x+1.0.0
    Major,
    /// x.y.z -> x+1.0.0-0
    PreMajor,
    /// x.y.z -> x.y+1.0
    Minor,
    /// x.y.z -> x.y+1.0-0
    PreMinor,
    /// x.y.z -> x.y.z+1
    Patch,
    /// x.y.z -> x.y.z+1-0
    PrePatch,
    /// x.y.z-<pre>.n -> x.y.z-<pre>.n+1, or x.y.z -> x.y.z+1-0
    PreRelease,
}

impl BumpKind {
    const ALL: [(&'static str, BumpKind); 7] = [
        ("major", Self::Major),
        ("premajor", Self::PreMajor),
        ("minor", Self::Minor),
        ("preminor", Self::PreMinor),
        ("patch", Self::Patch),
        ("prepatch", Self::PrePatch),
        ("prerelease", Self::PreRelease),
    ];

    pub fn as_str(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

impl FromStr for BumpKind {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| ReleaseError::InvalidBumpKind(s.to_string()))
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated bump request: the kind plus an optional pre-release identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bump {
    pub kind: BumpKind,
    pub preid: Option<String>,
}

impl Bump {
    pub fn new(kind: BumpKind) -> Self {
        Self { kind, preid: None }
    }

    /// Parses and validates both parts up front, before anything is read or written.
    pub fn parse(kind: &str, preid: Option<&str>) -> Result<Self> {
        let kind = kind.parse()?;
        let preid = match preid.map(str::trim) {
            None | Some("") => None,
            Some(id) => {
                Prerelease::new(id).map_err(|_| ReleaseError::InvalidPrereleaseId(id.to_string()))?;
                if id.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ReleaseError::InvalidPrereleaseId(id.to_string()));
                }
                Some(id.to_string())
            }
        };
        Ok(Self { kind, preid })
    }

    pub fn apply(&self, current: &Version) -> Result<Version> {
        bump_version(self.kind, current, self.preid.as_deref())
    }
}

fn base_prerelease(preid: Option<&str>) -> Result<Prerelease> {
    let text = match preid {
        Some(id) => format!("{id}.0"),
        None => "0".to_string(),
    };
    Prerelease::new(&text).map_err(|_| ReleaseError::InvalidPrereleaseId(text))
}

fn increment_prerelease(pre: &Prerelease, preid: Option<&str>) -> Result<Prerelease> {
    let mut parts: Vec<String> = pre.as_str().split('.').map(str::to_string).collect();

    if let Some(id) = preid {
        let continues = parts.first().map(String::as_str) == Some(id)
            && parts.get(1).is_some_and(|n| n.parse::<u64>().is_ok());
        if !continues {
            return base_prerelease(Some(id));
        }
    }

    match parts
        .iter_mut()
        .rev()
        .find_map(|part| part.parse::<u64>().ok().map(|n| (part, n)))
    {
        Some((part, n)) => *part = n.saturating_add(1).to_string(),
        None => parts.push("0".to_string()),
    }

    let text = parts.join(".");
    Prerelease::new(&text).map_err(|_| ReleaseError::InvalidPrereleaseId(text))
}

/// npm-style version increment. Build metadata is always dropped.
pub fn bump_version(kind: BumpKind, current: &Version, preid: Option<&str>) -> Result<Version> {
    let mut new_version = current.clone();
    new_version.build = semver::BuildMetadata::EMPTY;
    let is_pre = !current.pre.is_empty();

    match kind {
        BumpKind::Major => {
            // 2.0.0-0 -> 2.0.0
            if !(is_pre && current.minor == 0 && current.patch == 0) {
                new_version.major = new_version.major.saturating_add(1);
            }
            new_version.minor = 0;
            new_version.patch = 0;
            new_version.pre = Prerelease::EMPTY;
        }
        BumpKind::Minor => {
            if !(is_pre && current.patch == 0) {
                new_version.minor = new_version.minor.saturating_add(1);
            }
            new_version.patch = 0;
            new_version.pre = Prerelease::EMPTY;
        }
        BumpKind::Patch => {
            if !is_pre {
                new_version.patch = new_version.patch.saturating_add(1);
            }
            new_version.pre = Prerelease::EMPTY;
        }
        BumpKind::PreMajor => {
            new_version.major = new_version.major.saturating_add(1);
            new_version.minor = 0;
            new_version.patch = 0;
            new_version.pre = base_prerelease(preid)?;
        }
        BumpKind::PreMinor => {
            new_version.minor = new_version.minor.saturating_add(1);
            new_version.patch = 0;
            new_version.pre = base_prerelease(preid)?;
        }
        BumpKind::PrePatch => {
            new_version.patch = new_version.patch.saturating_add(1);
            new_version.pre = base_prerelease(preid)?;
        }
        BumpKind::PreRelease => {
            if is_pre {
                new_version.pre = increment_prerelease(&current.pre, preid)?;
            } else {
                new_version.patch = new_version.patch.saturating_add(1);
                new_version.pre = base_prerelease(preid)?;
            }
        }
    }

    Ok(new_version)
}

/// Plans every package's new version first, then writes the manifests unless this
/// is a dry run. A manifest that cannot be read or parsed aborts before anything
/// is written.
pub fn apply(
    packages: &[Package],
    bump: &Bump,
    options: &ReleaseOptions,
) -> Result<Vec<VersionChange>> {
    let mut planned = Vec::with_capacity(packages.len());
    for package in packages {
        let manifest = Manifest::read(&package.path)?;
        let old_version = manifest.version()?;
        let new_version = bump.apply(&old_version)?;
        planned.push((package, manifest, old_version, new_version));
    }

    let mut changes = Vec::with_capacity(planned.len());
    for (package, mut manifest, old_version, new_version) in planned {
        info!("Updating {} from {old_version} to {new_version}", package.name);
        if !options.dry_run {
            manifest.set_version(&new_version);
            manifest.write()?;
        }
        changes.push(VersionChange {
            name: package.name.clone(),
            old_version,
            new_version,
            applied: !options.dry_run,
        });
    }

    Ok(changes)
}

pub fn run(args: CommandArgs, global: &GlobalArgs) -> Result<StageReport> {
    let bump = Bump::parse(&args.kind, args.preid.as_deref())?;
    let options = global.release_options(args.dry_run);
    print_dry_run_notice(&options);

    let report = ReleasePipeline::new(global.root()?, options.clone()).run(Stage::Version(bump))?;
    if let StageReport::Version(changes) = &report {
        for change in changes {
            println!(
                "{}: {} -> {}",
                change.name, change.old_version, change.new_version
            );
        }
        if !options.dry_run {
            println!("Version update completed. Remember to commit these changes if needed.");
        }
    }
    Ok(report)
}
