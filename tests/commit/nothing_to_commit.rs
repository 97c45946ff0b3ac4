use crate::common::command::{
    count_objects, get_head_commit_sha, init_repository_dir, mgit_commit, repository_dir,
    run_mgit_command,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn unchanged_tree_writes_nothing(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head_before = get_head_commit_sha(init_repository_dir.path())?;
    let objects_before = count_objects(init_repository_dir.path());

    run_mgit_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();
    mgit_commit(init_repository_dir.path(), "Again")
        .assert()
        .success()
        .stdout("nothing to commit\n");

    assert_eq!(get_head_commit_sha(init_repository_dir.path())?, head_before);
    assert_eq!(count_objects(init_repository_dir.path()), objects_before);

    Ok(())
}

#[rstest]
fn empty_index_on_unborn_branch(repository_dir: TempDir) {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    mgit_commit(repository_dir.path(), "Nothing here")
        .assert()
        .success()
        .stdout("nothing to commit\n");

    assert!(
        !repository_dir
            .path()
            .join(".mgit/refs/heads/main")
            .exists()
    );
    assert_eq!(count_objects(repository_dir.path()), 0);
}
