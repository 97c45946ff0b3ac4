use crate::common::command::{
    commit_all, mgit_commit, read_branch, read_head, read_index, repository_dir,
    run_mgit_command,
};
use crate::common::file::{FileSpec, read_file, snapshot_files, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

/// `main` has three commits; `feature` points at the second one.
#[fixture]
pub fn repository_with_branches(repository_dir: TempDir) -> TempDir {
    let dir = repository_dir.path();
    run_mgit_command(dir, &["init"]).assert().success();

    write_file(FileSpec::new(dir.join("file1.txt"), "initial content 1".to_string()));
    write_file(FileSpec::new(dir.join("file2.txt"), "initial content 2".to_string()));
    commit_all(dir, "Initial commit");

    write_file(FileSpec::new(dir.join("file1.txt"), "modified content 1".to_string()));
    write_file(FileSpec::new(
        dir.join("nested").join("file3.txt"),
        "new content 3".to_string(),
    ));
    commit_all(dir, "Second commit");

    run_mgit_command(dir, &["branch", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.join("file2.txt"), "modified content 2".to_string()));
    std::fs::remove_file(dir.join("nested").join("file3.txt")).unwrap();
    run_mgit_command(dir, &["add", "."]).assert().success();
    mgit_commit(dir, "Third commit").assert().success();

    repository_dir
}

#[rstest]
fn checkout_branch_successfully(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    assert!(!dir.join("nested").exists());

    run_mgit_command(dir, &["checkout", "feature"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Switched to branch 'feature'"));

    assert_eq!(read_head(dir), "ref: refs/heads/feature");
    assert_eq!(read_file(&dir.join("file1.txt")), "modified content 1");
    assert_eq!(read_file(&dir.join("file2.txt")), "initial content 2");
    assert_eq!(
        read_file(&dir.join("nested").join("file3.txt")),
        "new content 3"
    );

    // the index mirrors the checked out tree
    let tree = run_mgit_command(dir, &["ls-tree", "feature"]).output().unwrap();
    assert_eq!(read_index(dir), String::from_utf8(tree.stdout).unwrap());
}

#[rstest]
fn checkout_round_trip_restores_files(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    let on_main = snapshot_files(dir);

    run_mgit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    let on_feature = snapshot_files(dir);
    assert_ne!(on_main, on_feature);

    run_mgit_command(dir, &["checkout", "main"])
        .assert()
        .success();
    assert_eq!(snapshot_files(dir), on_main);
    assert!(!dir.join("nested").exists());

    run_mgit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    assert_eq!(snapshot_files(dir), on_feature);
}

#[rstest]
fn checkout_current_branch_reports_already_on(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    let main_sha = read_branch(dir, "main");

    run_mgit_command(dir, &["checkout", "main"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Already on 'main'"));

    assert_eq!(read_branch(dir, "main"), main_sha);
}

#[rstest]
fn checkout_keeps_untracked_files(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    write_file(FileSpec::new(dir.join("notes.txt"), "mine".to_string()));

    run_mgit_command(dir, &["checkout", "feature"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("notes.txt")), "mine");
}

#[rstest]
fn checkout_unknown_revision_fails(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();

    run_mgit_command(dir, &["checkout", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch or commit 'nope' not found"));

    assert_eq!(read_head(dir), "ref: refs/heads/main");
}
