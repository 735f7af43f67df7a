// ==============================================================================
// CLI Integration Tests: Exercise the `bidl` Binary via Subprocess
// ==============================================================================
//
// These tests run the compiled `bidl` binary as a subprocess using
// `assert_cmd`, verifying exit codes and stdout/stderr content. They
// complement the library-level tests in `integration.rs` by exercising the
// full CLI surface: argument parsing, file I/O, and error reporting as a
// user would actually see them.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn bidl_cmd() -> Command {
    Command::cargo_bin("bidl").expect("bidl binary should build")
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn compile_happy_path_prints_json_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "com/x/IFoo.aidl",
        "package com.x;\ninterface IFoo { void a(); int b(in String s); }\n",
    );

    bidl_cmd()
        .arg("compile")
        .arg(dir.path().join("com/x/IFoo.aidl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"IFoo\""))
        .stdout(predicate::str::contains("\"id\": 0"))
        .stdout(predicate::str::contains("\"id\": 1"));
}

#[test]
fn compile_writes_output_to_the_given_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "com/x/IFoo.aidl", "package com.x;\ninterface IFoo { void a(); }\n");
    let out_path = dir.path().join("out.json");

    bidl_cmd()
        .arg("compile")
        .arg(dir.path().join("com/x/IFoo.aidl"))
        .arg(&out_path)
        .assert()
        .success();

    let contents = fs::read_to_string(&out_path).unwrap();
    assert!(contents.contains("\"name\": \"IFoo\""));
}

#[test]
fn compile_resolves_imports_via_import_dir_flag() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "src/com/x/IFoo.aidl",
        "package com.x;\nimport com.z.Bar;\ninterface IFoo { void a(in Bar b); }\n",
    );
    write(dir.path(), "imports/com/z/Bar.aidl", "package com.z;\nparcelable Bar;\n");

    bidl_cmd()
        .arg("compile")
        .arg("-I")
        .arg(dir.path().join("imports"))
        .arg(dir.path().join("src/com/x/IFoo.aidl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("com.z.Bar"));
}

#[test]
fn compile_fails_with_nonzero_exit_on_filename_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "com/y/IFoo.aidl", "package com.x;\ninterface IFoo { void a(); }\n");

    bidl_cmd()
        .arg("compile")
        .arg(dir.path().join("com/y/IFoo.aidl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("should be declared in a file called"));
}

#[test]
fn compile_accepts_a_preprocessed_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "com/x/IFoo.aidl",
        "package com.x;\nimport com.z.Bar;\ninterface IFoo { void a(in Bar b); }\n",
    );
    write(dir.path(), "preprocessed.aidl", "parcelable com.z.Bar;\n");

    bidl_cmd()
        .arg("compile")
        .arg("-p")
        .arg(dir.path().join("preprocessed.aidl"))
        .arg(dir.path().join("com/x/IFoo.aidl"))
        .assert()
        .success();
}

#[test]
fn compile_with_no_input_prints_usage_and_exits_nonzero() {
    bidl_cmd().arg("compile").assert().failure();
}

#[test]
fn unknown_subcommand_exits_nonzero() {
    bidl_cmd().arg("bogus").assert().failure().code(2);
}

#[test]
fn managed_flag_accepts_a_map_container() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "com/x/IFoo.aidl",
        "package com.x;\ninterface IFoo { Map<String,String> a(); }\n",
    );

    bidl_cmd()
        .arg("compile")
        .arg("--managed")
        .arg(dir.path().join("com/x/IFoo.aidl"))
        .assert()
        .success();

    bidl_cmd()
        .arg("compile")
        .arg(dir.path().join("com/x/IFoo.aidl"))
        .assert()
        .failure();
}
