use {
    super::{print_batch, print_dry_run_notice, GlobalArgs},
    crate::{
        pipeline::{ReleasePipeline, Stage},
        types::{Outcome, Package, ReleaseOptions, StageReport, TagPublisher, TagResult},
        utils::manifest::Manifest,
        Result,
    },
    clap::Args,
    log::{error, info},
    std::collections::HashMap,
};

#[derive(Args, Debug)]
pub struct CommandArgs {
    #[arg(short, long)]
    pub dry_run: bool,
}

pub fn tag_name(version: &str) -> String {
    format!("v{version}")
}

fn tag_package(
    package: &Package,
    tag_name: &str,
    publisher: &dyn TagPublisher,
    options: &ReleaseOptions,
) -> Result<Outcome> {
    if options.dry_run {
        info!("Would tag {} as {tag_name}", package.name);
        return Ok(Outcome::Planned);
    }
    publisher.create_tag(&package.path, tag_name)?;
    publisher.push_tag(&package.path, tag_name)?;
    info!("Pushed tag: {tag_name}");
    Ok(Outcome::Applied)
}

/// Tags every package as `v<version>` and pushes the tag. Failures are recorded
/// per package and never stop the batch.
pub fn apply(
    packages: &[Package],
    publisher: &dyn TagPublisher,
    options: &ReleaseOptions,
) -> Vec<TagResult> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut results = Vec::with_capacity(packages.len());

    for package in packages {
        let version = Manifest::read(&package.path).and_then(|m| m.version());
        let (tag_name, outcome) = match version {
            Err(err) => (String::new(), Outcome::Failed(err.to_string())),
            Ok(version) => {
                let tag = tag_name(&version.to_string());
                let outcome = if let Some(owner) = claimed.get(&tag) {
                    Outcome::Failed(format!("tag {tag} already used by {owner} in this run"))
                } else {
                    claimed.insert(tag.clone(), &package.name);
                    tag_package(package, &tag, publisher, options)
                        .unwrap_or_else(|err| Outcome::Failed(err.to_string()))
                };
                (tag, outcome)
            }
        };

        if let Outcome::Failed(reason) = &outcome {
            error!("Failed to tag {}: {reason}", package.name);
        }
        results.push(TagResult {
            name: package.name.clone(),
            tag_name,
            outcome,
        });
    }

    results
}

pub fn run(args: CommandArgs, global: &GlobalArgs) -> Result<StageReport> {
    let options = global.release_options(args.dry_run);
    print_dry_run_notice(&options);

    let report = ReleasePipeline::new(global.root()?, options).run(Stage::Tag)?;
    if let StageReport::Tag(results) = &report {
        for result in results {
            println!("{} {}: {}", result.name, result.tag_name, result.outcome);
        }
    }
    print_batch(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{testing::FakeTagPublisher, utils::manifest::MANIFEST_FILE},
        pretty_assertions::assert_eq,
        std::{fs, path::Path},
    };

    fn write_package(root: &Path, dir: &str, name: &str, version: &str) -> Package {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(MANIFEST_FILE),
            format!(r#"{{"name": "{name}", "version": "{version}"}}"#),
        )
        .unwrap();
        Package::new(name, dir)
    }

    #[test]
    fn test_tag_name_from_version() {
        let root_dir = tempfile::tempdir().unwrap();
        let packages = vec![write_package(root_dir.path(), "a", "a", "1.3.0")];
        let publisher = FakeTagPublisher::default();

        let results = apply(&packages, &publisher, &ReleaseOptions::default());

        assert_eq!(
            results,
            vec![TagResult {
                name: "a".to_string(),
                tag_name: "v1.3.0".to_string(),
                outcome: Outcome::Applied,
            }]
        );
        assert_eq!(publisher.created(), vec!["v1.3.0"]);
        assert_eq!(publisher.pushed(), vec!["v1.3.0"]);
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let root_dir = tempfile::tempdir().unwrap();
        let packages = vec![
            write_package(root_dir.path(), "a", "a", "1.0.0"),
            write_package(root_dir.path(), "b", "b", "2.0.0"),
        ];
        let publisher = FakeTagPublisher::default();

        let results = apply(&packages, &publisher, &ReleaseOptions::default().dry_run(true));

        assert!(publisher.created().is_empty());
        assert!(publisher.pushed().is_empty());
        let planned: Vec<_> = results
            .iter()
            .map(|r| (r.tag_name.as_str(), &r.outcome))
            .collect();
        assert_eq!(
            planned,
            vec![("v1.0.0", &Outcome::Planned), ("v2.0.0", &Outcome::Planned)]
        );
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let root_dir = tempfile::tempdir().unwrap();
        let packages = vec![
            write_package(root_dir.path(), "a", "a", "1.0.0"),
            write_package(root_dir.path(), "b", "b", "2.0.0"),
            write_package(root_dir.path(), "c", "c", "3.0.0"),
        ];
        let publisher = FakeTagPublisher::failing_push("v2.0.0");

        let results = apply(&packages, &publisher, &ReleaseOptions::default());

        assert_eq!(results[0].outcome, Outcome::Applied);
        assert!(results[1].outcome.is_failure());
        assert_eq!(results[2].outcome, Outcome::Applied);
        assert_eq!(publisher.pushed(), vec!["v1.0.0", "v3.0.0"]);
    }

    #[test]
    fn test_shared_version_is_reported_not_fatal() {
        let root_dir = tempfile::tempdir().unwrap();
        let packages = vec![
            write_package(root_dir.path(), "a", "a", "1.0.0"),
            write_package(root_dir.path(), "b", "b", "1.0.0"),
        ];

        for options in [ReleaseOptions::default(), ReleaseOptions::default().dry_run(true)] {
            let publisher = FakeTagPublisher::default();
            let results = apply(&packages, &publisher, &options);

            assert!(!results[0].outcome.is_failure());
            assert_eq!(
                results[1].outcome,
                Outcome::Failed("tag v1.0.0 already used by a in this run".to_string())
            );
            assert!(publisher.created().len() <= 1);
        }
    }

    #[test]
    fn test_unreadable_manifest_is_a_package_failure() {
        let root_dir = tempfile::tempdir().unwrap();
        let broken = root_dir.path().join("broken");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(MANIFEST_FILE), r#"{"name": "broken", "version": "x"}"#).unwrap();
        let packages = vec![
            Package::new("broken", broken),
            write_package(root_dir.path(), "ok", "ok", "0.1.0"),
        ];
        let publisher = FakeTagPublisher::default();

        let results = apply(&packages, &publisher, &ReleaseOptions::default());

        assert!(results[0].outcome.is_failure());
        assert_eq!(results[1].outcome, Outcome::Applied);
    }
}
