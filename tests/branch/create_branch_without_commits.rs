use crate::common::command::{repository_dir, run_mgit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn create_branch_without_commits(repository_dir: TempDir) {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_mgit_command(repository_dir.path(), &["branch", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "branch 'main' does not have any commits yet",
        ));

    assert!(!repository_dir.path().join(".mgit/refs/heads/dev").exists());
}
