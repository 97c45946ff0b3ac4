use crate::common::command::{
    get_head_commit_sha, init_repository_dir, read_branch, read_head, run_mgit_command,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn create_branch_copies_head_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head_sha = get_head_commit_sha(init_repository_dir.path())?;

    run_mgit_command(init_repository_dir.path(), &["branch", "feature/login"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Created branch 'feature/login'"));

    assert_eq!(read_branch(init_repository_dir.path(), "feature/login"), head_sha);
    // HEAD is unchanged
    assert_eq!(read_head(init_repository_dir.path()), "ref: refs/heads/main");

    Ok(())
}

#[rstest]
fn create_duplicate_branch_fails(init_repository_dir: TempDir) {
    run_mgit_command(init_repository_dir.path(), &["branch", "dev"])
        .assert()
        .success();

    run_mgit_command(init_repository_dir.path(), &["branch", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch 'dev' already exists"));
}

#[rstest]
#[case("bad..name")]
#[case("ends/")]
#[case("trailing.lock")]
#[case("with space")]
#[case("HEAD")]
fn create_branch_with_invalid_name_fails(init_repository_dir: TempDir, #[case] name: &str) {
    run_mgit_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));
}

#[rstest]
fn create_branch_while_detached_uses_the_detached_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head_sha = get_head_commit_sha(init_repository_dir.path())?;
    run_mgit_command(init_repository_dir.path(), &["checkout", &head_sha])
        .assert()
        .success();

    run_mgit_command(init_repository_dir.path(), &["branch", "rescue"])
        .assert()
        .success();

    assert_eq!(read_branch(init_repository_dir.path(), "rescue"), head_sha);

    Ok(())
}
