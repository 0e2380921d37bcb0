use {
    anyhow::Result,
    clap::{error::ErrorKind, Parser, Subcommand},
    log::{error, LevelFilter},
    monorel::{
        commands::{self, GlobalArgs},
        error::{ReleaseError, EXIT_FATAL},
    },
};

#[derive(Parser)]
#[command(
    name = "monorel",
    about = "Release automation for npm packages and pnpm workspaces",
    version
)]
struct Monorel {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List the packages a release would cover")]
    List(commands::list::CommandArgs),
    #[command(about = "Bump the version of every package")]
    Version(commands::version::CommandArgs),
    #[command(about = "Create and push a v<version> tag per package")]
    Tag(commands::tag::CommandArgs),
    #[command(about = "Publish every package with pnpm")]
    Publish(commands::publish::CommandArgs),
    #[command(about = "Regenerate the root CHANGELOG.md")]
    Changelog(commands::changelog::CommandArgs),
}

fn main() {
    let monorel = match Monorel::try_parse() {
        Ok(monorel) => monorel,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_FATAL,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let level = if monorel.global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match try_main(monorel) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!("Error: {err}");
            for (i, cause) in err.chain().skip(1).enumerate() {
                error!("  {}: {}", i.saturating_add(1), cause);
            }
            let code = err
                .downcast_ref::<ReleaseError>()
                .map_or(EXIT_FATAL, ReleaseError::exit_code);
            std::process::exit(code);
        }
    }
}

fn try_main(monorel: Monorel) -> Result<i32> {
    let global = &monorel.global;
    let report = match monorel.command {
        Commands::List(args) => commands::list::run(args, global)?,
        Commands::Version(args) => commands::version::run(args, global)?,
        Commands::Tag(args) => commands::tag::run(args, global)?,
        Commands::Publish(args) => commands::publish::run(args, global)?,
        Commands::Changelog(args) => commands::changelog::run(args, global)?,
    };
    Ok(report.exit_code())
}
