#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use fake::Fake;
use fake::faker::internet::en::FreeEmail;
use fake::faker::lorem::en::{Word, Words};
use fake::faker::name::en::Name;

/// A `kit` command running inside the given repository directory
pub fn kit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kit").expect("kit binary not built");
    cmd.current_dir(dir.path());
    cmd
}

pub fn init_repo() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    kit(&dir).arg("init").assert().success();
    dir
}

pub fn write_file(dir: &TempDir, name: &str, content: &str) {
    dir.child(name)
        .write_str(content)
        .expect("Failed to write file");
}

pub fn random_file(dir: &TempDir) -> (String, String) {
    let name = format!("{}.txt", Word().fake::<String>());
    let content = Words(5..10).fake::<Vec<String>>().join(" ");
    write_file(dir, &name, &content);
    (name, content)
}

/// Run `kit commit -m <message>` with a random author identity.
pub fn commit(dir: &TempDir, message: &str) -> String {
    let author_name = Name().fake::<String>().replace(" ", "_");
    let author_email = FreeEmail().fake::<String>();

    let output = kit(dir)
        .envs(vec![
            ("GIT_AUTHOR_NAME", author_name.as_str()),
            ("GIT_AUTHOR_EMAIL", author_email.as_str()),
        ])
        .arg("commit")
        .arg("-m")
        .arg(message)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).expect("commit output is not UTF-8")
}

/// Digest the current branch tip points at
pub fn head_oid(dir: &TempDir) -> String {
    let content = std::fs::read_to_string(dir.path().join(".kit/refs/heads/master"))
        .expect("Failed to read branch reference");
    content.trim().to_string()
}

pub fn cat_file(dir: &TempDir, oid: &str) -> String {
    let output = kit(dir)
        .arg("cat-file")
        .arg("-p")
        .arg(oid)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).expect("cat-file output is not UTF-8")
}

/// Extract the root tree digest from a commit's cat-file output
pub fn tree_oid_of(commit_content: &str) -> String {
    commit_content
        .lines()
        .find_map(|line| line.strip_prefix("tree "))
        .expect("commit has no tree line")
        .to_string()
}
