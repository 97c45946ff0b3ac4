use crate::common::command::{read_index, repository_dir, run_mgit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn add_files_from_nested_directories_to_index(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("b.txt"),
        "bee".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("nested").join("c.txt"),
        "sea".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join(".mgitignore"),
        "secret.txt\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("secret.txt"),
        "hidden".to_string(),
    ));

    run_mgit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let paths = read_index(repository_dir.path())
        .lines()
        .map(|line| line.split_once(' ').unwrap().1.to_string())
        .collect::<Vec<_>>();
    assert_eq!(paths, vec![".mgitignore", "a/nested/c.txt", "b.txt"]);

    // every staged blob is stored under its hash
    for line in read_index(repository_dir.path()).lines() {
        let (oid, _) = line.split_once(' ').unwrap();
        let object_path = repository_dir
            .path()
            .join(".mgit")
            .join("objects")
            .join(&oid[..2])
            .join(&oid[2..]);
        assert!(object_path.is_file(), "missing object {oid}");
    }

    Ok(())
}

#[rstest]
fn add_from_a_subdirectory_stages_repository_relative_paths(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mgit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("src").join("main.txt"),
        "main".to_string(),
    ));

    run_mgit_command(&repository_dir.path().join("src"), &["add", "main.txt"])
        .assert()
        .success()
        .stdout("added src/main.txt\n");

    Ok(())
}
