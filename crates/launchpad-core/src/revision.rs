use anyhow::{Context, Result};
use git2::Repository;
use std::path::Path;

/// Resolve the HEAD commit of the repository at `repo_dir`.
///
/// The frontend build is stamped with this value; a mismatch against the
/// stored marker is what triggers a rebuild.
pub fn latest_commit(repo_dir: &Path) -> Result<String> {
    let repo = Repository::open(repo_dir)
        .with_context(|| format!("failed to open repository at {}", repo_dir.display()))?;
    let head = repo.head().context("failed to resolve HEAD")?;
    let oid = head
        .target()
        .context("HEAD is not a direct reference to a commit")?;
    Ok(oid.to_string())
}

/// Read the stored revision marker. Any I/O error counts as "no marker":
/// an unreadable marker must trigger a rebuild, not a crash.
pub fn read_marker(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Overwrite the marker with the revision that produced the current build.
pub fn write_marker(path: &Path, revision: &str) -> Result<()> {
    std::fs::write(path, revision)
        .with_context(|| format!("failed to write marker {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: init a repo with a single empty commit, return (dir, oid).
    fn repo_with_commit() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let sig = git2::Signature::now("test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let oid = {
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap()
        };
        (dir, oid.to_string())
    }

    #[test]
    fn latest_commit_resolves_head() {
        let (dir, oid) = repo_with_commit();
        assert_eq!(latest_commit(dir.path()).unwrap(), oid);
    }

    #[test]
    fn latest_commit_fails_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        assert!(latest_commit(dir.path()).is_err());
    }

    #[test]
    fn latest_commit_fails_on_unborn_head() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        assert!(latest_commit(dir.path()).is_err());
    }

    #[test]
    fn read_marker_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        std::fs::write(&path, "abc123\n").unwrap();
        assert_eq!(read_marker(&path).as_deref(), Some("abc123"));
    }

    #[test]
    fn read_marker_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_marker(&dir.path().join("version.txt")).is_none());
    }

    #[test]
    fn read_marker_empty_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        std::fs::write(&path, "  \n").unwrap();
        assert!(read_marker(&path).is_none());
    }

    #[test]
    fn write_then_read_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        write_marker(&path, "def456").unwrap();
        assert_eq!(read_marker(&path).as_deref(), Some("def456"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "def456");
    }
}
