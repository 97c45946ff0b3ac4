use crate::common::command::{commit_all, read_head, repository_dir, run_mgit_command};
use crate::common::file::{FileSpec, read_file, snapshot_files, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

#[fixture]
fn repository_with_staged_change(repository_dir: TempDir) -> TempDir {
    let dir = repository_dir.path();
    run_mgit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "one".to_string()));
    commit_all(dir, "first");
    run_mgit_command(dir, &["branch", "other"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.join("a.txt"), "two".to_string()));
    commit_all(dir, "second");

    write_file(FileSpec::new(dir.join("a.txt"), "staged".to_string()));
    run_mgit_command(dir, &["add", "a.txt"]).assert().success();

    repository_dir
}

#[rstest]
fn checkout_with_staged_changes_is_refused(repository_with_staged_change: TempDir) {
    let dir = repository_with_staged_change.path();
    let files_before = snapshot_files(dir);
    let index_before = std::fs::read_to_string(dir.join(".mgit/index")).unwrap();

    run_mgit_command(dir, &["checkout", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot switch with staged changes"));

    assert_eq!(snapshot_files(dir), files_before);
    assert_eq!(read_head(dir), "ref: refs/heads/main");
    assert_eq!(
        std::fs::read_to_string(dir.join(".mgit/index")).unwrap(),
        index_before
    );
}

#[rstest]
fn forced_checkout_discards_staged_changes(repository_with_staged_change: TempDir) {
    let dir = repository_with_staged_change.path();

    run_mgit_command(dir, &["checkout", "--force", "other"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "one");
    assert_eq!(read_head(dir), "ref: refs/heads/other");
}
