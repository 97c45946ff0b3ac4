use crate::common::command::{repository_dir, run_mgit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn init_creates_unborn_repository(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Initialized empty mgit repository in",
        ))
        .stdout(predicate::str::contains(dir_absolute_path));

    let metadata = repository_dir.path().join(".mgit");
    assert!(metadata.join("objects").is_dir());
    assert!(metadata.join("refs").join("heads").is_dir());
    assert_eq!(std::fs::read_to_string(metadata.join("index"))?, "");
    assert_eq!(
        std::fs::read_to_string(metadata.join("HEAD"))?,
        "ref: refs/heads/main"
    );

    Ok(())
}

#[rstest]
fn init_at_explicit_path(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let target = repository_dir.path().join("project");

    run_mgit_command(repository_dir.path(), &["init", "project"])
        .assert()
        .success();

    assert!(target.join(".mgit").join("HEAD").is_file());

    Ok(())
}

#[rstest]
fn commands_outside_a_repository_fail(repository_dir: TempDir) {
    run_mgit_command(repository_dir.path(), &["log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an mgit repository"));
}
