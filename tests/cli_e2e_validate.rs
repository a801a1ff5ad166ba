//! End-to-end tests for the `cv-forge validate` command.

mod common;
use common::prelude::*;

#[test]
fn test_validate_manifest_and_parts() {
    let fixture = TestFixture::new().with_minimal_project();

    fixture
        .command()
        .arg("validate")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("experience (work.json) matches 'work'"));
}

#[test]
fn test_validate_invalid_part_exits_1() {
    let fixture = TestFixture::new()
        .with_minimal_project()
        .with_file("data/work.json", r#"{"work": [{"title": "no name"}]}"#);

    fixture
        .command()
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("/0"));
}

#[test]
fn test_validate_unmatched_part_is_skipped() {
    let fixture = TestFixture::new()
        .with_minimal_project()
        .with_file(
            "data/cv.de.json",
            r#"{"basics": {"name": "A"}, "parts": {"hobbies": "hobbies.json"}}"#,
        )
        .with_file("data/hobbies.json", r#"{"anything": 1}"#);

    fixture
        .command()
        .arg("validate")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("skipped"));
}

#[test]
fn test_validate_single_file() {
    let fixture = TestFixture::new()
        .with_minimal_project()
        .with_file("good.json", r#"{"basics": {"name": "A"}}"#)
        .with_file("bad.json", r#"{"basics": {"email": "not-an-email"}}"#);

    fixture
        .command()
        .args(["validate", "--file=good.json"])
        .assert()
        .code(0);

    fixture
        .command()
        .args(["validate", "--file=bad.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("/basics"));
}

#[test]
fn test_validate_unparsable_file_exits_2() {
    let fixture = TestFixture::new()
        .with_minimal_project()
        .with_file("broken.json", "{ not json");

    fixture
        .command()
        .args(["validate", "--file", "broken.json"])
        .assert()
        .code(2);
}

#[test]
fn test_validate_missing_schema_exits_2() {
    let fixture = TestFixture::new()
        .with_file("data/cv.de.json", r#"{"parts": {}}"#);

    fixture
        .command()
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Schema error"));
}

#[test]
fn test_validate_custom_schema_and_manifest() {
    let fixture = TestFixture::new()
        .with_file("schemas/strict.json", r#"{"type": "object", "required": ["id"]}"#)
        .with_file("m.json", r#"{"id": 1}"#);

    fixture
        .command()
        .args(["validate", "--schema", "schemas/strict.json", "--manifest", "m.json"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no 'parts' object"));
}
