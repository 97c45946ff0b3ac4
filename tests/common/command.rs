use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_DATE: &str = "1672574400"; // 2023-01-01 12:00:00 +0000

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    run_mgit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    mgit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_mgit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("mgit").expect("Failed to find mgit binary");
    cmd.env_remove("MGIT_API_URL");
    cmd.env_remove("MGIT_AUTHOR_NAME");
    cmd.env_remove("MGIT_AUTHOR_DATE");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn mgit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_mgit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("MGIT_AUTHOR_NAME", AUTHOR_NAME),
        ("MGIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

/// Stage everything and commit it.
pub fn commit_all(dir: &Path, message: &str) {
    run_mgit_command(dir, &["add", "."]).assert().success();
    mgit_commit(dir, message).assert().success();
}

/// Current HEAD commit hash, following a symbolic HEAD to its branch.
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".mgit").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".mgit").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

pub fn read_head(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".mgit").join("HEAD")).expect("Failed to read HEAD")
}

pub fn read_index(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".mgit").join("index")).expect("Failed to read index")
}

pub fn read_branch(dir: &Path, branch: &str) -> String {
    std::fs::read_to_string(dir.join(".mgit").join("refs").join("heads").join(branch))
        .expect("Failed to read branch")
        .trim()
        .to_string()
}

pub fn count_objects(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir.join(".mgit").join("objects"))
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}
