use std::fs;
use std::path::Path;

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;
use vibe_git::{GitError, GitRepository, Identity, VersionControl};

/// Helper: a fresh repository whose HEAD starts on `branch`.
fn init_repo(branch: &str) -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(branch);
    let repo = Repository::init_opts(dir.path(), &opts).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test Author").unwrap();
        config.set_str("user.email", "author@example.com").unwrap();
    }
    (dir, repo)
}

fn write_file(dir: &TempDir, path: &str, content: &str) {
    let full = dir.path().join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

fn stage(repo: &Repository, path: &str) {
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(path)).unwrap();
    index.write().unwrap();
}

fn stage_removal(dir: &TempDir, repo: &Repository, path: &str) {
    fs::remove_file(dir.path().join(path)).unwrap();
    let mut index = repo.index().unwrap();
    index.remove_path(Path::new(path)).unwrap();
    index.write().unwrap();
}

fn commit(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test Author", "author@example.com").unwrap();
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => vec![],
    };
    let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

fn commit_file(dir: &TempDir, repo: &Repository, path: &str, content: &str, message: &str) -> Oid {
    write_file(dir, path, content);
    stage(repo, path);
    commit(repo, message)
}

fn checkout_new_branch(repo: &Repository, name: &str) {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch(name, &head, false).unwrap();
    repo.set_head(&format!("refs/heads/{}", name)).unwrap();
}

fn open(dir: &TempDir) -> GitRepository {
    GitRepository::discover(dir.path()).unwrap()
}

// ============================================================
// Staged diff
// ============================================================

#[test]
fn test_added_files_produce_only_additions() {
    let (dir, repo) = init_repo("main");
    write_file(&dir, "notes.txt", "first\nsecond\nthird\n");
    stage(&repo, "notes.txt");

    let vcs = open(&dir);
    assert!(vcs.has_staged_changes().unwrap());

    let diff = vcs.staged_diff().unwrap();
    let additions: Vec<&str> = diff.lines().filter(|l| l.starts_with('+')).collect();
    assert_eq!(additions, vec!["+first", "+second", "+third"]);
    assert!(!diff.lines().any(|l| l.starts_with('-')));
    assert!(diff.starts_with("diff --git a/notes.txt b/notes.txt\nnew file\n"));
}

#[test]
fn test_modified_file_uses_presence_diff() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "abc.txt", "a\nb\nc\n", "Initial");

    write_file(&dir, "abc.txt", "a\nb\nd\n");
    stage(&repo, "abc.txt");

    let diff = open(&dir).staged_diff().unwrap();
    assert_eq!(diff, "diff --git a/abc.txt b/abc.txt\n-c\n+d\n\n");
}

#[test]
fn test_deleted_file_lists_old_lines() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "old.txt", "bye\nfor now\n", "Initial");
    stage_removal(&dir, &repo, "old.txt");

    let diff = open(&dir).staged_diff().unwrap();
    assert_eq!(
        diff,
        "diff --git a/old.txt b/old.txt\ndeleted file\n-bye\n-for now\n\n"
    );
}

#[test]
fn test_unstaged_and_untracked_changes_are_ignored() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "tracked.txt", "v1\n", "Initial");

    write_file(&dir, "tracked.txt", "v2\n");
    write_file(&dir, "scratch.txt", "untracked\n");

    let vcs = open(&dir);
    assert!(!vcs.has_staged_changes().unwrap());
    assert_eq!(vcs.staged_diff().unwrap(), "");
}

#[test]
fn test_staged_diff_only_includes_index_content() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "app.rs", "fn main() {}\n", "Initial");

    write_file(&dir, "app.rs", "fn main() { run(); }\n");
    stage(&repo, "app.rs");
    // Later worktree edit that is not staged
    write_file(&dir, "app.rs", "fn main() { run(); cleanup(); }\n");

    let diff = open(&dir).staged_diff().unwrap();
    assert!(diff.contains("+fn main() { run(); }\n"));
    assert!(!diff.contains("cleanup"));
}

// ============================================================
// Branch resolution
// ============================================================

#[test]
fn test_current_branch_and_detached_head() {
    let (dir, repo) = init_repo("main");
    let first = commit_file(&dir, &repo, "a.txt", "a\n", "Initial");
    checkout_new_branch(&repo, "feature/login");

    assert_eq!(open(&dir).current_branch().unwrap(), "feature/login");

    repo.set_head_detached(first).unwrap();
    assert!(matches!(
        open(&dir).current_branch(),
        Err(GitError::DetachedHead)
    ));
}

#[test]
fn test_default_branch_prefers_local_main() {
    let (dir, repo) = init_repo("main");
    let tip = commit_file(&dir, &repo, "a.txt", "a\n", "Initial");
    repo.remote("origin", "https://github.com/acme/widgets.git")
        .unwrap();
    repo.reference("refs/remotes/origin/master", tip, true, "test")
        .unwrap();

    assert_eq!(open(&dir).default_branch().unwrap(), "main");
}

#[test]
fn test_default_branch_local_master() {
    let (dir, repo) = init_repo("master");
    commit_file(&dir, &repo, "a.txt", "a\n", "Initial");

    assert_eq!(open(&dir).default_branch().unwrap(), "master");
}

#[test]
fn test_default_branch_from_remote_refs() {
    let (dir, repo) = init_repo("topic");
    let tip = commit_file(&dir, &repo, "a.txt", "a\n", "Initial");
    repo.remote("origin", "git@github.com:acme/widgets.git")
        .unwrap();
    repo.reference("refs/remotes/origin/master", tip, true, "test")
        .unwrap();

    assert_eq!(open(&dir).default_branch().unwrap(), "master");

    repo.reference("refs/remotes/origin/main", tip, true, "test")
        .unwrap();
    assert_eq!(open(&dir).default_branch().unwrap(), "main");
}

#[test]
fn test_default_branch_missing() {
    let (dir, repo) = init_repo("topic");
    commit_file(&dir, &repo, "a.txt", "a\n", "Initial");

    assert!(matches!(
        open(&dir).default_branch(),
        Err(GitError::NoDefaultBranch)
    ));
}

#[test]
fn test_commits_ahead_stops_before_base_tip() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "base.txt", "base\n", "Base commit");
    checkout_new_branch(&repo, "feature");

    let h1 = commit_file(&dir, &repo, "one.txt", "1\n", "Add one\n\nLonger body");
    let h2 = commit_file(&dir, &repo, "two.txt", "2\n", "Add two");
    let h3 = commit_file(&dir, &repo, "three.txt", "3\n", "Add three");

    let commits = open(&dir).commits_ahead("main").unwrap();
    let hashes: Vec<&str> = commits.iter().map(|c| c.short_hash.as_str()).collect();
    let expected: Vec<String> = [h3, h2, h1]
        .iter()
        .map(|oid| oid.to_string()[..7].to_string())
        .collect();

    assert_eq!(hashes, expected);
    assert_eq!(commits[2].first_line, "Add one");
    assert_eq!(commits[0].to_string(), format!("{} Add three", expected[0]));
}

#[test]
fn test_commits_ahead_uses_remote_tracking_base() {
    let (dir, repo) = init_repo("feature");
    let base = commit_file(&dir, &repo, "base.txt", "base\n", "Base commit");
    repo.reference("refs/remotes/origin/main", base, true, "test")
        .unwrap();
    commit_file(&dir, &repo, "work.txt", "work\n", "Do work");

    let commits = open(&dir).commits_ahead("main").unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].first_line, "Do work");
}

#[test]
fn test_commits_ahead_unknown_base() {
    let (dir, repo) = init_repo("feature");
    commit_file(&dir, &repo, "a.txt", "a\n", "Initial");

    match open(&dir).commits_ahead("develop") {
        Err(GitError::BaseBranchNotFound(name)) => assert_eq!(name, "develop"),
        other => panic!("expected BaseBranchNotFound, got {:?}", other),
    }
}

#[test]
fn test_commits_ahead_tolerates_unrelated_base() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "a.txt", "a\n", "First");
    commit_file(&dir, &repo, "b.txt", "b\n", "Second");

    // A base tip that is not in HEAD's history
    let blob_tree = repo.find_tree(repo.index().unwrap().write_tree().unwrap()).unwrap();
    let sig = Signature::now("Other", "other@example.com").unwrap();
    let orphan = repo
        .commit(None, &sig, &sig, "Orphan", &blob_tree, &[])
        .unwrap();
    repo.reference("refs/heads/elsewhere", orphan, true, "test")
        .unwrap();

    let commits = open(&dir).commits_ahead("elsewhere").unwrap();
    assert_eq!(commits.len(), 2);
}

#[test]
fn test_branch_diff_is_tree_to_tree() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "lib.rs", "fn a() {}\n", "Initial");
    checkout_new_branch(&repo, "feature");
    commit_file(&dir, &repo, "lib.rs", "fn a() {}\nfn b() {}\n", "Add b");
    commit_file(&dir, &repo, "new.rs", "fn c() {}\n", "Add c");

    let diff = open(&dir).branch_diff("main").unwrap();
    assert!(diff.contains("diff --git a/lib.rs b/lib.rs"));
    assert!(diff.contains("+fn b() {}"));
    assert!(diff.contains("diff --git a/new.rs b/new.rs"));
    assert!(diff.contains("@@"));
    assert!(diff.find("lib.rs").unwrap() < diff.find("new.rs").unwrap());
}

#[test]
fn test_needs_push_tracks_remote_ref() {
    let (dir, repo) = init_repo("feature");
    let tip = commit_file(&dir, &repo, "a.txt", "a\n", "Initial");

    assert!(open(&dir).needs_push().unwrap());

    repo.reference("refs/remotes/origin/feature", tip, true, "test")
        .unwrap();
    assert!(!open(&dir).needs_push().unwrap());

    commit_file(&dir, &repo, "b.txt", "b\n", "More");
    assert!(open(&dir).needs_push().unwrap());
}

// ============================================================
// Writes
// ============================================================

#[test]
fn test_commit_uses_repo_identity() {
    let (dir, repo) = init_repo("main");
    commit_file(&dir, &repo, "a.txt", "a\n", "Initial");
    write_file(&dir, "b.txt", "b\n");
    stage(&repo, "b.txt");

    let vcs = open(&dir).with_fallback_identity(Identity {
        name: "Fallback".into(),
        email: "fallback@example.com".into(),
    });
    let short = vcs.commit("Add b").unwrap();

    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(short.len(), 7);
    assert!(head.id().to_string().starts_with(&short));
    assert_eq!(head.message(), Some("Add b"));
    assert_eq!(head.author().name(), Some("Test Author"));
    assert_eq!(head.parent_count(), 1);
    assert!(!vcs.has_staged_changes().unwrap());
}

#[test]
fn test_first_commit_has_no_parent() {
    let (dir, repo) = init_repo("main");
    write_file(&dir, "a.txt", "a\n");
    stage(&repo, "a.txt");

    open(&dir).commit("Initial commit").unwrap();

    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.parent_count(), 0);
}

#[test]
fn test_remote_url() {
    let (dir, repo) = init_repo("main");
    assert!(matches!(open(&dir).remote_url(), Err(GitError::NoRemote(_))));

    repo.remote("origin", "https://github.com/acme/widgets").unwrap();
    assert_eq!(
        open(&dir).remote_url().unwrap(),
        "https://github.com/acme/widgets"
    );
}

#[test]
fn test_discover_outside_repository() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        GitRepository::discover(dir.path()),
        Err(GitError::NoRepository(_))
    ));
}

#[test]
fn test_token_push_to_ssh_remote_asks_for_https() {
    let (dir, repo) = init_repo("feature");
    commit_file(&dir, &repo, "a.txt", "a\n", "Initial");
    repo.remote("origin", "git@github.com:acme/widgets.git").unwrap();

    match open(&dir).push("tok") {
        Err(GitError::TokenPushNeedsHttps { remote, url }) => {
            assert_eq!(remote, "origin");
            assert_eq!(url, "git@github.com:acme/widgets.git");
        }
        other => panic!("expected TokenPushNeedsHttps, got {other:?}"),
    }
}
