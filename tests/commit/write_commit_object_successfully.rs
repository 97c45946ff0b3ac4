use crate::common::command::{
    AUTHOR_DATE, AUTHOR_NAME, get_head_commit_sha, init_repository_dir, mgit_commit, read_branch,
    read_head, repository_dir, run_mgit_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn root_commit_advances_the_bound_branch(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello".to_string(),
    ));
    run_mgit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    mgit_commit(repository_dir.path(), "first")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[main \(root-commit\) [0-9a-f]{7}\] first\n$")?);

    // HEAD stays symbolic; only the branch file moved
    assert_eq!(read_head(repository_dir.path()), "ref: refs/heads/main");
    let commit_sha = read_branch(repository_dir.path(), "main");
    assert_eq!(commit_sha.len(), 40);

    let blob_sha = run_mgit_command(repository_dir.path(), &["hash-object", "a.txt"])
        .output()?
        .stdout;
    let blob_sha = String::from_utf8(blob_sha)?.trim().to_string();

    let commit = run_mgit_command(repository_dir.path(), &["cat-file", &commit_sha]).output()?;
    let commit = String::from_utf8(commit.stdout)?;
    let tree_sha = commit
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("tree "))
        .unwrap()
        .to_string();
    assert_eq!(
        commit,
        format!("tree {tree_sha}\nauthor {AUTHOR_NAME} {AUTHOR_DATE}\n\nfirst")
    );

    run_mgit_command(repository_dir.path(), &["cat-file", &tree_sha])
        .assert()
        .success()
        .stdout(format!("{blob_sha} a.txt\n"));

    Ok(())
}

#[rstest]
fn second_commit_records_its_parent(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let parent_sha = get_head_commit_sha(init_repository_dir.path())?;

    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "changed".to_string(),
    ));
    run_mgit_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();
    mgit_commit(init_repository_dir.path(), "Second commit\n\nwith a body")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[main [0-9a-f]{7}\] Second commit\n$")?);

    let commit_sha = get_head_commit_sha(init_repository_dir.path())?;
    let commit = run_mgit_command(init_repository_dir.path(), &["cat-file", &commit_sha])
        .output()?
        .stdout;
    let commit = String::from_utf8(commit)?;

    assert!(commit.contains(&format!("\nparent {parent_sha}\n")));
    assert!(commit.ends_with("\n\nSecond commit\n\nwith a body"));

    Ok(())
}

#[rstest]
fn empty_message_is_rejected(init_repository_dir: TempDir) {
    mgit_commit(init_repository_dir.path(), "   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty commit message"));
}
