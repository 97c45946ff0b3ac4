use crate::common::command::{count_objects, repository_dir, run_mgit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

const HELLO_SHA: &str = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";

#[rstest]
fn hash_object_without_write_stores_nothing(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_mgit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("hello.txt"), "hello".to_string()));

    run_mgit_command(dir, &["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout(format!("{HELLO_SHA}\n"));

    assert_eq!(count_objects(dir), 0);
}

#[rstest]
fn hash_object_with_write_stores_blob(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_mgit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("hello.txt"), "hello".to_string()));

    run_mgit_command(dir, &["hash-object", "-w", "hello.txt"])
        .assert()
        .success()
        .stdout(format!("{HELLO_SHA}\n"));

    assert!(
        dir.join(".mgit")
            .join("objects")
            .join(&HELLO_SHA[..2])
            .join(&HELLO_SHA[2..])
            .is_file()
    );
    assert_eq!(count_objects(dir), 1);
}
