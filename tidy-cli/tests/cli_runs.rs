//! End-to-end runs of the `tidytool` binary with scripted stdin.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const LIST: &str = "id,path\n1,alpha/a.cbz\n2,alpha/b.cbz\n3,beta/z.cbz\n";

fn tidytool(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tidytool").expect("tidytool binary");
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("XDG_CACHE_HOME", home.join(".cache"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// `root/alpha/{a.cbz, c.cbz}` against [`LIST`]: b.cbz missing, c.cbz extra.
fn gallery(workspace: &TempDir) -> (PathBuf, PathBuf) {
    let root = workspace.path().join("galleries");
    fs::create_dir_all(root.join("alpha")).unwrap();
    fs::write(root.join("alpha").join("a.cbz"), b"a").unwrap();
    fs::write(root.join("alpha").join("c.cbz"), b"c").unwrap();
    let list = workspace.path().join("list.csv");
    fs::write(&list, LIST).unwrap();
    (root, list)
}

fn write_snapshot(path: &Path, entries: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, body) in entries {
        zip.start_file(format!("metadata-master/{name}"), SimpleFileOptions::default())
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

// ---------------------------------------------------------------------------
// verify
// ---------------------------------------------------------------------------

#[test]
fn verify_lists_then_deletes_extras() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (root, list) = gallery(&workspace);

    tidytool(home.path())
        .arg("verify")
        .arg("--manifest-file")
        .arg(&list)
        .arg("--root")
        .arg(&root)
        .write_stdin("y\ns\nd\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("List: 3 files in 2 collections"))
        .stdout(predicate::str::contains("Collection directories found locally: 1 of 2"))
        .stdout(predicate::str::contains("1 of 2"))
        .stdout(predicate::str::contains("MISSING:").and(predicate::str::contains("b.cbz")))
        .stdout(predicate::str::contains("alpha (1 extra gallery)"))
        .stdout(predicate::str::contains("EXTRA:"))
        .stdout(predicate::str::contains("DELETED:"));

    assert!(!root.join("alpha").join("c.cbz").exists());
    assert!(root.join("alpha").join("a.cbz").exists());
}

#[test]
fn verify_moves_extras_under_destination() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (root, list) = gallery(&workspace);
    let dest = workspace.path().join("quarantine");

    tidytool(home.path())
        .arg("verify")
        .arg("--manifest-file")
        .arg(&list)
        .arg("--root")
        .arg(&root)
        .write_stdin(format!("n\nm\n{}\n", dest.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("MOVED:"));

    assert_eq!(fs::read(dest.join("alpha").join("c.cbz")).unwrap(), b"c");
    assert!(!root.join("alpha").join("c.cbz").exists());
}

#[test]
fn verify_asks_for_root_until_collections_found() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (root, list) = gallery(&workspace);
    let empty = workspace.path().join("empty");
    fs::create_dir(&empty).unwrap();

    tidytool(home.path())
        .arg("verify")
        .arg("--manifest-file")
        .arg(&list)
        .write_stdin(format!("{}\n{}\nn\nn\n", empty.display(), root.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("No collection directories were found"))
        .stdout(predicate::str::contains("like 'alpha'"));

    assert!(root.join("alpha").join("c.cbz").exists(), "'n' must leave files alone");
}

#[test]
fn verify_json_reports_without_prompting() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (root, list) = gallery(&workspace);

    let output = tidytool(home.path())
        .arg("verify")
        .arg("--manifest-file")
        .arg(&list)
        .arg("--root")
        .arg(&root)
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["collections_found"], 1);
    assert_eq!(json["collections_expected"], 2);
    assert_eq!(json["report"]["collections"]["alpha"]["missing"][0], "b.cbz");
    assert!(json["report"]["extra"]["alpha/c.cbz"].is_string());
}

#[test]
fn verify_declined_download_exits_cleanly() {
    let home = TempDir::new().unwrap();
    tidytool(home.path())
        .arg("verify")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download cancelled"));
}

#[test]
fn verify_root_without_collections_fails() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (_, list) = gallery(&workspace);

    tidytool(home.path())
        .arg("verify")
        .arg("--manifest-file")
        .arg(&list)
        .arg("--root")
        .arg(workspace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no collection directories were found"));
}

#[test]
fn verify_empty_list_fails() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let list = workspace.path().join("list.csv");
    fs::write(&list, "id,path\n1,notapath\n").unwrap();

    tidytool(home.path())
        .arg("verify")
        .arg("--manifest-file")
        .arg(&list)
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty list of files"));
}

#[test]
fn closed_stdin_fails_instead_of_looping() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (_, list) = gallery(&workspace);

    tidytool(home.path())
        .arg("verify")
        .arg("--manifest-file")
        .arg(&list)
        .assert()
        .failure()
        .stderr(predicate::str::contains("input closed"));
}

// ---------------------------------------------------------------------------
// companions
// ---------------------------------------------------------------------------

#[test]
fn companions_writes_pairs_and_deletes_orphans() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (root, _) = gallery(&workspace);
    fs::write(root.join("alpha").join("a.yaml"), "stale").unwrap();
    fs::write(root.join("alpha").join("stray.yaml"), "orphan").unwrap();

    let snapshot = workspace.path().join("master.zip");
    write_snapshot(
        &snapshot,
        &[
            ("indexes/list.csv", LIST),
            ("alpha/a.yaml", "title: a\n"),
            ("alpha/c.yaml", "title: c\n"),
        ],
    );

    tidytool(home.path())
        .arg("companions")
        .arg("--snapshot-file")
        .arg(&snapshot)
        .arg("--root")
        .arg(&root)
        .write_stdin("y\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 cbz and 2 yaml file(s)"))
        .stdout(predicate::str::contains("WRITTEN:"))
        .stdout(predicate::str::contains("There is 1 unknown yaml file"))
        .stdout(predicate::str::contains("DELETED:"));

    assert_eq!(
        fs::read_to_string(root.join("alpha").join("a.yaml")).unwrap(),
        "title: a\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("alpha").join("c.yaml")).unwrap(),
        "title: c\n"
    );
    assert!(!root.join("alpha").join("stray.yaml").exists());
}

#[test]
fn companions_stale_snapshot_aborts_untouched() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let (root, _) = gallery(&workspace);

    let snapshot = workspace.path().join("master.zip");
    write_snapshot(
        &snapshot,
        &[("indexes/list.csv", LIST), ("alpha/a.yaml", "title: a\n")],
    );

    tidytool(home.path())
        .arg("companions")
        .arg("--snapshot-file")
        .arg(&snapshot)
        .arg("--root")
        .arg(&root)
        .write_stdin("y\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("snapshot has no entry 'alpha/c.yaml'"));

    assert!(!root.join("alpha").join("a.yaml").exists());
}

#[test]
fn companions_declined_cache_download_is_fatal() {
    let home = TempDir::new().unwrap();

    tidytool(home.path())
        .arg("companions")
        .write_stdin("n\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("not found. Download it now?"))
        .stderr(predicate::str::contains("operation cancelled"));

    assert!(home.path().join(".cache").join("TidyTool").is_dir());
}

#[test]
fn menu_quit_pauses_before_exit() {
    let home = TempDir::new().unwrap();
    tidytool(home.path())
        .write_stdin("q\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Press Enter to exit"));
}
