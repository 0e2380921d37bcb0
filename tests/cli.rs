//! End-to-end tests for the `monorel` binary against copies of the fixtures.

use {
    assert_cmd::Command,
    predicates::prelude::*,
    pretty_assertions::assert_eq,
    std::{fs, path::Path},
    tempfile::TempDir,
    walkdir::WalkDir,
};

fn fixture(name: &str) -> TempDir {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let temp = tempfile::tempdir().unwrap();
    for entry in WalkDir::new(&source).min_depth(1) {
        let entry = entry.unwrap();
        let target = temp.path().join(entry.path().strip_prefix(&source).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
    temp
}

fn monorel(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("monorel").unwrap();
    cmd.env_remove("MONOREL_PACKAGES_DIR")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn test_list_monorepo() {
    let temp = fixture("pnpm-workspace");

    monorel(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout("- web (apps/web)\n- @acme/core (libs/core)\n")
        .stdout(predicate::str::contains("empty").not());
}

#[test]
fn test_list_single_package() {
    let temp = fixture("single-package");

    monorel(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Root package.json:"))
        .stdout(predicate::str::contains("\"name\": \"solo\""));
}

#[test]
fn test_version_dry_run_leaves_manifests_alone() {
    let temp = fixture("pnpm-workspace");
    let before = read(temp.path(), "apps/web/package.json");

    monorel(temp.path())
        .args(["version", "minor", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web: 1.2.3 -> 1.3.0"))
        .stdout(predicate::str::contains("@acme/core: 2.0.0 -> 2.1.0"));

    assert_eq!(read(temp.path(), "apps/web/package.json"), before);
}

#[test]
fn test_version_writes_and_preserves_layout() {
    let temp = fixture("single-package");

    monorel(temp.path())
        .args(["version", "prerelease", "--preid", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("solo: 0.3.0 -> 0.3.1-beta.0"));

    assert_eq!(
        read(temp.path(), "package.json"),
        "{\n\t\"name\": \"solo\",\n\t\"version\": \"0.3.1-beta.0\",\n\t\"license\": \"MIT\"\n}\n"
    );
}

#[test]
fn test_invalid_bump_kind_is_fatal() {
    let temp = fixture("pnpm-workspace");
    let before = read(temp.path(), "libs/core/package.json");

    monorel(temp.path())
        .args(["version", "huge"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("huge"));

    assert_eq!(read(temp.path(), "libs/core/package.json"), before);
}

#[test]
fn test_unknown_subcommand_exits_one() {
    let temp = fixture("single-package");

    monorel(temp.path()).arg("deploy").assert().code(1);
}

#[test]
fn test_tag_dry_run_reports_tags() {
    let temp = fixture("pnpm-workspace");

    monorel(temp.path())
        .args(["tag", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web v1.2.3: planned"))
        .stdout(predicate::str::contains("@acme/core v2.0.0: planned"))
        .stdout(predicate::str::contains("2 succeeded / 0 failed"));
}

#[test]
fn test_publish_dry_run_skips_registry() {
    let temp = fixture("pnpm-workspace");

    monorel(temp.path())
        .args(["publish", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web@1.2.3: planned"))
        .stdout(predicate::str::contains("@acme/core@2.0.0: planned"));
}

#[test]
fn test_broken_workspace_config_is_fatal() {
    let temp = fixture("pnpm-workspace");
    fs::write(temp.path().join("pnpm-workspace.yaml"), "packages: [\"apps/*\"\n").unwrap();

    monorel(temp.path())
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pnpm-workspace.yaml"));
}

#[test]
fn test_packages_dir_env_sets_default_glob() {
    let temp = fixture("pnpm-workspace");
    fs::write(temp.path().join("pnpm-workspace.yaml"), "").unwrap();

    monorel(temp.path())
        .env("MONOREL_PACKAGES_DIR", "libs")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("- @acme/core (libs/core)"))
        .stdout(predicate::str::contains("web").not());
}
