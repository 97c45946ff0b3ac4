use crate::common::command::{repository_dir, run_mgit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn reinit_fails(repository_dir: TempDir) {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("error: repository already initialized"));
}
