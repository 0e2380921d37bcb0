//! Conventional-commits changelog rendered from `git tag` and `git log`.

use {
    super::process::run_command,
    crate::{
        types::{ChangelogGenerator, ChangelogRequest, ChangelogStream},
        Result,
    },
    chrono::{Local, NaiveDate},
    log::debug,
    regex::Regex,
    semver::Version,
    std::{fmt::Write, path::Path, sync::LazyLock},
};

static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^)]+)\))?(?P<breaking>!)?: (?P<description>.+)$",
    )
    .expect("valid regex")
});

static BREAKING_FOOTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^BREAKING[ -]CHANGE: (?P<note>.+)$").expect("valid regex")
});

// %H hash, %cs committer date, %s subject, %b body
const LOG_FORMAT: &str = "--format=%H%x1f%cs%x1f%s%x1f%b%x1e";

/// Visible sections, in the order the conventionalcommits preset renders them.
const SECTIONS: [(&str, &str); 4] = [
    ("feat", "Features"),
    ("fix", "Bug Fixes"),
    ("perf", "Performance Improvements"),
    ("revert", "Reverts"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub hash: String,
    pub kind: String,
    pub scope: Option<String>,
    pub description: String,
    /// Present when the commit is marked with `!` or a `BREAKING CHANGE` footer.
    pub breaking: Option<String>,
}

pub fn parse_conventional(hash: &str, subject: &str, body: &str) -> Option<ConventionalCommit> {
    let caps = CONVENTIONAL_REGEX.captures(subject.trim())?;
    let description = caps.name("description")?.as_str().trim().to_string();

    let footer_note = BREAKING_FOOTER_REGEX
        .captures(body)
        .and_then(|c| c.name("note"))
        .map(|m| m.as_str().trim().to_string());
    let breaking = match (footer_note, caps.name("breaking").is_some()) {
        (Some(note), _) => Some(note),
        (None, true) => Some(description.clone()),
        (None, false) => None,
    };

    Some(ConventionalCommit {
        hash: hash.to_string(),
        kind: caps.name("type")?.as_str().to_lowercase(),
        scope: caps.name("scope").map(|m| m.as_str().to_string()),
        description,
        breaking,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReleaseTag {
    name: String,
    version: Version,
}

impl ReleaseTag {
    fn parse(name: &str, skip_unstable: bool) -> Option<Self> {
        let version = Version::parse(name.strip_prefix('v').unwrap_or(name)).ok()?;
        if skip_unstable && !version.pre.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            version,
        })
    }
}

/// One rendered release: commits in `from..to`, or everything reachable from `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReleaseRange {
    title: String,
    from: Option<String>,
    to: String,
    /// `None` means the date of the newest commit in the range.
    date: Option<NaiveDate>,
}

impl ReleaseRange {
    fn rev_spec(&self) -> String {
        match &self.from {
            Some(from) => format!("{from}..{}", self.to),
            None => self.to.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConventionalChangelog {
    date: Option<NaiveDate>,
}

impl ConventionalChangelog {
    /// Fixes the date printed for the unreleased section.
    pub fn with_date(date: NaiveDate) -> Self {
        Self { date: Some(date) }
    }

    fn release_tags(dir: &Path, skip_unstable: bool) -> Result<Vec<ReleaseTag>> {
        let output = run_command("git", &["tag", "--list"], dir)?;
        let mut tags: Vec<_> = output
            .stdout
            .lines()
            .filter_map(|line| ReleaseTag::parse(line.trim(), skip_unstable))
            .collect();
        tags.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(tags)
    }

    fn plan_ranges(&self, request: &ChangelogRequest, tags: &[ReleaseTag]) -> Vec<ReleaseRange> {
        let current = request
            .version
            .as_deref()
            .and_then(|v| Version::parse(v).ok());
        let mut ranges = vec![];

        let current_is_tagged = matches!(
            (tags.first(), &current),
            (Some(latest), Some(current)) if latest.version == *current
        );
        if !current_is_tagged {
            ranges.push(ReleaseRange {
                title: request
                    .version
                    .clone()
                    .unwrap_or_else(|| "Unreleased".to_string()),
                from: tags.first().map(|t| t.name.clone()),
                to: "HEAD".to_string(),
                date: Some(self.date.unwrap_or_else(|| Local::now().date_naive())),
            });
        }
        for (i, tag) in tags.iter().enumerate() {
            ranges.push(ReleaseRange {
                title: tag.version.to_string(),
                from: tags.get(i.saturating_add(1)).map(|t| t.name.clone()),
                to: tag.name.clone(),
                date: None,
            });
        }

        if request.release_count > 0 {
            ranges.truncate(request.release_count);
        }
        ranges
    }
}

fn render_release(dir: &Path, range: &ReleaseRange) -> Result<String> {
    let log = run_command("git", &["log", LOG_FORMAT, &range.rev_spec()], dir)?;

    let mut newest_date = None;
    let mut commits = vec![];
    for record in log.stdout.split('\x1e') {
        let mut fields = record.trim_matches(['\n', '\r']).split('\x1f');
        let (Some(hash), Some(date), Some(subject)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        let body = fields.next().unwrap_or_default();
        if newest_date.is_none() {
            newest_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        }
        if let Some(commit) = parse_conventional(hash, subject, body) {
            commits.push(commit);
        }
    }

    let mut out = format!("## {}", range.title);
    if let Some(date) = range.date.or(newest_date) {
        let _ = write!(out, " ({})", date.format("%Y-%m-%d"));
    }
    out.push_str("\n\n");

    let breaking: Vec<_> = commits
        .iter()
        .filter_map(|c| c.breaking.as_deref().map(|note| (c, note)))
        .collect();
    if !breaking.is_empty() {
        out.push_str("### ⚠ BREAKING CHANGES\n\n");
        for (commit, note) in breaking {
            render_line(&mut out, commit.scope.as_deref(), note, None);
        }
        out.push('\n');
    }

    for (kind, heading) in SECTIONS {
        let mut section = commits.iter().filter(|c| c.kind == kind).peekable();
        if section.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "### {heading}\n");
        for commit in section {
            render_line(
                &mut out,
                commit.scope.as_deref(),
                &commit.description,
                Some(&commit.hash),
            );
        }
        out.push('\n');
    }
    Ok(out)
}

fn render_line(out: &mut String, scope: Option<&str>, text: &str, hash: Option<&str>) {
    out.push_str("* ");
    if let Some(scope) = scope {
        let _ = write!(out, "**{scope}:** ");
    }
    out.push_str(text);
    if let Some(hash) = hash {
        let short = hash.get(..7).unwrap_or(hash);
        let _ = write!(out, " ({short})");
    }
    out.push('\n');
}

impl ChangelogGenerator for ConventionalChangelog {
    fn generate(&self, request: &ChangelogRequest) -> Result<ChangelogStream<'_>> {
        debug!(
            "rendering {:?} changelog for {} ({} release(s))",
            request.preset, request.package_name, request.release_count
        );
        let dir = request.package_dir.clone();
        let tags = Self::release_tags(&dir, request.skip_unstable)?;
        let ranges = self.plan_ranges(request, &tags);

        Ok(Box::new(
            ranges
                .into_iter()
                .map(move |range| render_release(&dir, &range)),
        ))
    }
}
