use {
    super::{print_dry_run_notice, GlobalArgs},
    crate::{
        error::ReleaseError,
        pipeline::{ReleasePipeline, Stage},
        types::{
            ChangelogGenerator, ChangelogPreset, ChangelogRequest, ChangelogResult, Package,
            ReleaseOptions, StageReport,
        },
        utils::{fs::write_atomic, manifest::Manifest},
        Result,
    },
    clap::Args,
    log::info,
};

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

#[derive(Args, Debug)]
pub struct CommandArgs {
    #[arg(short, long)]
    pub dry_run: bool,
}

pub fn request_for(target: &Package, manifest: &Manifest) -> ChangelogRequest {
    ChangelogRequest {
        package_name: target.name.clone(),
        package_dir: target.path.clone(),
        manifest_path: manifest.path().to_path_buf(),
        version: manifest.raw_version().map(str::to_string),
        preset: ChangelogPreset::ConventionalCommits,
        release_count: 1,
        skip_unstable: true,
    }
}

/// Generates the latest release's changelog for `target` and replaces its
/// `CHANGELOG.md` in one write. The generator's output is collected in full
/// first; an error anywhere in the stream leaves the existing file untouched.
pub fn apply(
    target: &Package,
    generator: &dyn ChangelogGenerator,
    options: &ReleaseOptions,
) -> Result<ChangelogResult> {
    info!("Generating changelog for {}", target.name);

    let manifest = Manifest::read_unnamed(&target.path)?;
    let request = request_for(target, &manifest);
    let content = generator.generate(&request)?.collect::<Result<String>>()?;
    if content.trim().is_empty() {
        return Err(ReleaseError::ExternalCommand {
            command: "changelog generator".to_string(),
            reason: "produced no output".to_string(),
        });
    }

    let path = target.path.join(CHANGELOG_FILE);
    if !options.dry_run {
        write_atomic(&path, &content)?;
        info!("Changelog generated for {}", target.name);
    }

    Ok(ChangelogResult {
        name: target.name.clone(),
        path,
        content,
        written: !options.dry_run,
    })
}

pub fn run(args: CommandArgs, global: &GlobalArgs) -> Result<StageReport> {
    let options = global.release_options(args.dry_run);
    print_dry_run_notice(&options);

    let report = ReleasePipeline::new(global.root()?, options).run(Stage::Changelog)?;
    if let StageReport::Changelog(result) = &report {
        if result.written {
            println!("Wrote {}", result.path.display());
        } else {
            println!("Would write {}:\n", result.path.display());
            print!("{}", result.content);
        }
    }
    Ok(report)
}
