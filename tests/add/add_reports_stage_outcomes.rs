use crate::common::command::{repository_dir, run_mgit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn add_reports_stage_outcomes(repository_dir: TempDir) {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file = repository_dir.path().join("a.txt");
    write_file(FileSpec::new(file.clone(), "first".to_string()));

    run_mgit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success()
        .stdout("added a.txt\n");

    run_mgit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success()
        .stdout("unchanged a.txt\n");

    write_file(FileSpec::new(file, "second".to_string()));

    run_mgit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success()
        .stdout("updated a.txt\n");
}
