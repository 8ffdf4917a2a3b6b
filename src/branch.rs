//! Current branch lookup for `{branch}` substitution in macros

use std::path::PathBuf;

use git2::{Repository, RepositoryOpenFlags};
use log::debug;

/// Value used when neither a branch name nor a revision can be read
pub const FALLBACK_BRANCH: &str = "HEAD";

pub trait BranchResolver {
    /// Name of the checked-out branch. Never fails: detached heads resolve to
    /// a short revision id, anything else to [`FALLBACK_BRANCH`].
    fn current_branch(&self) -> String;
}

/// Resolves the branch of the repository containing a directory
#[derive(Debug, Clone)]
pub struct GitBranchResolver {
    cwd: PathBuf,
    ceilings: Vec<PathBuf>,
}

impl GitBranchResolver {
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        GitBranchResolver {
            cwd: cwd.into(),
            ceilings: Vec::new(),
        }
    }

    /// Stop repository discovery before entering `dir` or any of its parents
    #[must_use]
    pub fn with_ceiling(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ceilings.push(dir.into());
        self
    }

    fn lookup(&self) -> Result<String, git2::Error> {
        let repo = Repository::open_ext(
            &self.cwd,
            RepositoryOpenFlags::CROSS_FS,
            self.ceilings.iter(),
        )?;

        // A symbolic HEAD names the branch even before its first commit
        let head_ref = repo.find_reference("HEAD")?;
        if let Some(target) = head_ref.symbolic_target()
            && let Some(branch) = target.strip_prefix("refs/heads/")
        {
            return Ok(branch.to_string());
        }

        let commit = repo.head()?.peel_to_commit()?;
        let short_id = commit.as_object().short_id()?;
        short_id
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| git2::Error::from_str("Short revision id is not valid UTF-8"))
    }
}

impl BranchResolver for GitBranchResolver {
    fn current_branch(&self) -> String {
        match self.lookup() {
            Ok(branch) if !branch.is_empty() => {
                debug!("Current branch: {branch}");
                branch
            }
            Ok(_) => FALLBACK_BRANCH.to_string(),
            Err(e) => {
                debug!(
                    "Unable to resolve branch in {}: {e}",
                    self.cwd.display()
                );
                FALLBACK_BRANCH.to_string()
            }
        }
    }
}
