use crate::common::command::{init_repository_dir, run_mgit_command};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn ls_tree_lists_every_tracked_file(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    let output = run_mgit_command(dir, &["ls-tree"]).output()?;
    assert!(output.status.success());
    let listing = String::from_utf8(output.stdout)?;

    let paths = listing
        .lines()
        .map(|line| line.split_once(' ').map(|(_, path)| path).unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(paths, vec!["1.txt", "a/2.txt", "a/b/3.txt"]);

    let blob_sha = listing
        .lines()
        .next()
        .and_then(|line| line.split(' ').next())
        .unwrap_or_default();
    run_mgit_command(dir, &["cat-file", blob_sha])
        .assert()
        .success()
        .stdout("one");

    Ok(())
}

#[rstest]
fn ls_tree_by_branch_matches_head(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    let head = run_mgit_command(dir, &["ls-tree", "HEAD"]).output().unwrap();
    let main = run_mgit_command(dir, &["ls-tree", "main"]).output().unwrap();

    assert_eq!(head.stdout, main.stdout);
}
