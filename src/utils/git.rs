use {
    super::process::{run_command, run_idempotent},
    crate::{
        error::ReleaseError,
        types::{CommandOutput, TagPublisher, WorkingTree},
        Result,
    },
    std::path::Path,
};

const RESTORE_ATTEMPTS: u32 = 3;

/// Tagging and manifest restore through the system `git`.
#[derive(Debug, Clone)]
pub struct GitCli {
    remote: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("origin")
    }
}

impl GitCli {
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
        }
    }
}

impl TagPublisher for GitCli {
    fn create_tag(&self, repo_dir: &Path, tag_name: &str) -> Result<CommandOutput> {
        run_command("git", &["tag", tag_name], repo_dir)
    }

    // never retried: a push that timed out may still have landed
    fn push_tag(&self, repo_dir: &Path, tag_name: &str) -> Result<CommandOutput> {
        run_command("git", &["push", &self.remote, tag_name], repo_dir)
    }
}

impl WorkingTree for GitCli {
    fn restore_file(&self, path: &Path) -> Result<()> {
        let (Some(dir), Some(file)) = (path.parent(), path.file_name()) else {
            return Err(ReleaseError::ExternalCommand {
                command: "git checkout".to_string(),
                reason: format!("'{}' is not a file path", path.display()),
            });
        };
        let file = file.to_string_lossy();
        run_idempotent("git", &["checkout", "--", &file], dir, RESTORE_ATTEMPTS)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {super::*, pretty_assertions::assert_eq, std::fs};

    /// Initializes a repository with one commit containing `package.json`.
    pub(crate) fn init_repo(dir: &Path) {
        let git = |args: &[&str]| {
            let mut full = vec![
                "-c",
                "user.name=monorel",
                "-c",
                "user.email=monorel@example.com",
            ];
            full.extend_from_slice(args);
            run_command("git", &full, dir).unwrap();
        };
        git(&["init", "-q"]);
        fs::write(
            dir.join("package.json"),
            "{\n  \"name\": \"root\",\n  \"version\": \"1.0.0\"\n}\n",
        )
        .unwrap();
        git(&["add", "package.json"]);
        git(&["commit", "-q", "-m", "chore: initial commit"]);
    }

    #[test]
    fn test_create_tag_and_duplicate() {
        let repo = tempfile::tempdir().unwrap();
        init_repo(repo.path());
        let git = GitCli::default();

        git.create_tag(repo.path(), "v1.0.0").unwrap();
        let tags = run_command("git", &["tag", "--list"], repo.path()).unwrap();
        assert_eq!(tags.stdout, "v1.0.0");

        let err = git.create_tag(repo.path(), "v1.0.0").unwrap_err();
        assert!(err.to_string().contains("already exists"), "{err}");
    }

    #[test]
    fn test_push_without_remote_fails() {
        let repo = tempfile::tempdir().unwrap();
        init_repo(repo.path());
        let git = GitCli::default();

        git.create_tag(repo.path(), "v1.0.0").unwrap();
        assert!(matches!(
            git.push_tag(repo.path(), "v1.0.0").unwrap_err(),
            ReleaseError::ExternalCommand { .. }
        ));
    }

    #[test]
    fn test_restore_file_reverts_only_that_file() {
        let repo = tempfile::tempdir().unwrap();
        init_repo(repo.path());
        let manifest = repo.path().join("package.json");
        fs::write(&manifest, "{\"name\": \"root\", \"version\": \"2.0.0\"}").unwrap();
        fs::write(repo.path().join("notes.txt"), "untracked").unwrap();

        GitCli::default().restore_file(&manifest).unwrap();

        assert_eq!(
            fs::read_to_string(&manifest).unwrap(),
            "{\n  \"name\": \"root\",\n  \"version\": \"1.0.0\"\n}\n"
        );
        assert_eq!(
            fs::read_to_string(repo.path().join("notes.txt")).unwrap(),
            "untracked"
        );
    }
}
