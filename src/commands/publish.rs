use {
    super::{print_batch, print_dry_run_notice, GlobalArgs},
    crate::{
        pipeline::{ReleasePipeline, Stage},
        types::{
            Outcome, Package, PublishResult, RegistryPublisher, ReleaseOptions, StageReport,
            WorkingTree,
        },
        utils::manifest::Manifest,
        Result,
    },
    clap::Args,
    log::{debug, error, info, warn},
};

#[derive(Args, Debug)]
pub struct CommandArgs {
    #[arg(short, long)]
    pub dry_run: bool,
}

fn publish_package(
    package: &Package,
    manifest: &Manifest,
    registry: &dyn RegistryPublisher,
    working_tree: &dyn WorkingTree,
    options: &ReleaseOptions,
) -> PublishResult {
    let version = manifest.raw_version().unwrap_or_default().to_string();
    let mut result = PublishResult {
        name: package.name.clone(),
        version,
        published: false,
        outcome: Outcome::Planned,
        revert_error: None,
    };

    if manifest.is_private() {
        info!("Skipping {}: marked private", package.name);
        result.outcome = Outcome::Skipped("private".to_string());
        return result;
    }

    info!("Publishing {}@{}", package.name, result.version);
    if options.dry_run {
        return result;
    }

    match registry.publish(&package.path) {
        Ok(output) => {
            if !output.stdout.is_empty() {
                debug!("{}", output.stdout);
            }
            info!("Successfully published {}@{}", package.name, result.version);
            result.published = true;
            result.outcome = Outcome::Applied;

            if let Err(err) = working_tree.restore_file(manifest.path()) {
                warn!(
                    "Published {} but could not restore {}: {err}",
                    package.name,
                    manifest.path().display()
                );
                result.revert_error = Some(err.to_string());
            }
        }
        Err(err) => {
            error!("Failed to publish {}: {err}", package.name);
            result.outcome = Outcome::Failed(err.to_string());
        }
    }
    result
}

/// Publishes each package in order. A failed publish is recorded and the batch
/// moves on; after a successful publish the package's `package.json` is restored
/// to its committed state.
pub fn apply(
    packages: &[Package],
    registry: &dyn RegistryPublisher,
    working_tree: &dyn WorkingTree,
    options: &ReleaseOptions,
) -> Vec<PublishResult> {
    packages
        .iter()
        .map(|package| match Manifest::read(&package.path) {
            Ok(manifest) => publish_package(package, &manifest, registry, working_tree, options),
            Err(err) => {
                error!("Failed to publish {}: {err}", package.name);
                PublishResult {
                    name: package.name.clone(),
                    version: String::new(),
                    published: false,
                    outcome: Outcome::Failed(err.to_string()),
                    revert_error: None,
                }
            }
        })
        .collect()
}

pub fn run(args: CommandArgs, global: &GlobalArgs) -> Result<StageReport> {
    let options = global.release_options(args.dry_run);
    print_dry_run_notice(&options);

    let report = ReleasePipeline::new(global.root()?, options).run(Stage::Publish)?;
    if let StageReport::Publish(results) = &report {
        for result in results {
            println!("{}@{}: {}", result.name, result.version, result.outcome);
            if let Some(err) = &result.revert_error {
                println!("  warning: package.json was not restored: {err}");
            }
        }
    }
    print_batch(&report);
    Ok(report)
}
