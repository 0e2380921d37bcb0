//! Recording fakes for the collaborator traits.

use {
    crate::{
        error::ReleaseError,
        types::{
            ChangelogGenerator, ChangelogRequest, ChangelogStream, CommandOutput,
            RegistryPublisher, TagPublisher, WorkingTree,
        },
        Result,
    },
    std::{
        cell::RefCell,
        path::{Path, PathBuf},
    },
};

fn failure(command: &str) -> ReleaseError {
    ReleaseError::ExternalCommand {
        command: command.to_string(),
        reason: "exit status 1: simulated failure".to_string(),
    }
}

#[derive(Default)]
pub struct FakeTagPublisher {
    fail_push_for: Option<String>,
    created: RefCell<Vec<String>>,
    pushed: RefCell<Vec<String>>,
}

impl FakeTagPublisher {
    pub fn failing_push(tag_name: &str) -> Self {
        Self {
            fail_push_for: Some(tag_name.to_string()),
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    pub fn pushed(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }
}

impl TagPublisher for FakeTagPublisher {
    fn create_tag(&self, _repo_dir: &Path, tag_name: &str) -> Result<CommandOutput> {
        if self.created.borrow().iter().any(|t| t == tag_name) {
            return Err(failure(&format!("git tag {tag_name}")));
        }
        self.created.borrow_mut().push(tag_name.to_string());
        Ok(CommandOutput::default())
    }

    fn push_tag(&self, _repo_dir: &Path, tag_name: &str) -> Result<CommandOutput> {
        if self.fail_push_for.as_deref() == Some(tag_name) {
            return Err(failure(&format!("git push origin {tag_name}")));
        }
        self.pushed.borrow_mut().push(tag_name.to_string());
        Ok(CommandOutput::default())
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    fail_for: Option<PathBuf>,
    attempted: RefCell<Vec<PathBuf>>,
}

impl FakeRegistry {
    pub fn failing_for(package_dir: &Path) -> Self {
        Self {
            fail_for: Some(package_dir.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn attempted(&self) -> Vec<PathBuf> {
        self.attempted.borrow().clone()
    }
}

impl RegistryPublisher for FakeRegistry {
    fn publish(&self, package_dir: &Path) -> Result<CommandOutput> {
        self.attempted.borrow_mut().push(package_dir.to_path_buf());
        if self.fail_for.as_deref() == Some(package_dir) {
            return Err(failure("pnpm publish --no-git-checks"));
        }
        Ok(CommandOutput {
            stdout: "+ published".to_string(),
            stderr: String::new(),
        })
    }
}

#[derive(Default)]
pub struct FakeWorkingTree {
    fail: bool,
    restored: RefCell<Vec<PathBuf>>,
}

impl FakeWorkingTree {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn restored(&self) -> Vec<PathBuf> {
        self.restored.borrow().clone()
    }
}

impl WorkingTree for FakeWorkingTree {
    fn restore_file(&self, path: &Path) -> Result<()> {
        if self.fail {
            return Err(failure("git checkout --"));
        }
        self.restored.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

pub struct FakeChangelog {
    chunks: Vec<String>,
    fail_at_end: bool,
    requests: RefCell<Vec<ChangelogRequest>>,
}

impl FakeChangelog {
    pub fn chunks(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            fail_at_end: false,
            requests: RefCell::default(),
        }
    }

    /// Yields `chunks`, then an error.
    pub fn failing_after(chunks: &[&str]) -> Self {
        Self {
            fail_at_end: true,
            ..Self::chunks(chunks)
        }
    }

    pub fn requests(&self) -> Vec<ChangelogRequest> {
        self.requests.borrow().clone()
    }
}

impl ChangelogGenerator for FakeChangelog {
    fn generate(&self, request: &ChangelogRequest) -> Result<ChangelogStream<'_>> {
        self.requests.borrow_mut().push(request.clone());
        let chunks = self.chunks.iter().cloned().map(Ok);
        let tail = self
            .fail_at_end
            .then(|| Err(failure("git log")))
            .into_iter();
        Ok(Box::new(chunks.chain(tail)))
    }
}
