use {
    super::GlobalArgs,
    crate::{
        pipeline::{ReleasePipeline, Stage},
        types::{Package, StageReport},
        utils::manifest::Manifest,
        Result,
    },
    clap::Args,
    std::path::Path,
};

#[derive(Args, Debug)]
pub struct CommandArgs {}

/// Human-readable listing: one `- name (path)` line per member of a monorepo,
/// or the root manifest for a single-package repo.
pub fn render(packages: &[Package], monorepo: bool, root: &Path) -> Result<String> {
    if monorepo {
        let mut out = String::new();
        for package in packages {
            let shown = package.path.strip_prefix(root).unwrap_or(&package.path);
            out.push_str(&format!("- {} ({})\n", package.name, shown.display()));
        }
        return Ok(out);
    }

    let mut out = String::from("Root package.json:\n");
    for package in packages {
        out.push_str(&Manifest::read(&package.path)?.to_json_string()?);
    }
    Ok(out)
}

pub fn run(_args: CommandArgs, global: &GlobalArgs) -> Result<StageReport> {
    let root = global.root()?;
    let report = ReleasePipeline::new(&root, global.release_options(false)).run(Stage::List)?;
    if let StageReport::List { packages, monorepo } = &report {
        let canonical = root.canonicalize().unwrap_or(root);
        print!("{}", render(packages, *monorepo, &canonical)?);
    }
    Ok(report)
}
