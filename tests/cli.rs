mod common;

use assert_cmd::Command;
use common::{MetadataStub, POD_MANIFEST, POD_UUID};
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn help_needs_no_environment() {
    for flag in ["help", "--help", "-help", "-h"] {
        Command::cargo_bin("mdc")
            .unwrap()
            .env_remove("AC_METADATA_URL")
            .env_remove("AC_APP_NAME")
            .arg(flag)
            .assert()
            .success()
            .stderr(contains("Usage:"));
    }
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let stub = MetadataStub::start();
    stub.cmd().arg("bogus").assert().code(1).stderr(contains("Usage:"));
    stub.cmd().arg("annotation").assert().code(1).stderr(contains("Usage:"));
    assert_eq!(stub.requests(), 0);
}

#[test]
fn uuid_is_trimmed() {
    let stub = MetadataStub::start();
    stub.serve("pod/uuid", 200, &format!("\n{}\n", POD_UUID));

    stub.cmd()
        .arg("uuid")
        .assert()
        .success()
        .stdout(format!("{}\n", POD_UUID));
}

#[test]
fn app_annotation_with_and_without_default() {
    let stub = MetadataStub::start();
    stub.serve("apps/reduce-worker/annotations", 200, r#"[{"name":"foo","value":"baz"}]"#);

    stub.cmd().args(["app-annotation", "foo"]).assert().success().stdout("baz\n");
    stub.cmd()
        .args(["app-annotation", "bar", "quux"])
        .assert()
        .success()
        .stdout("quux\n");
    stub.cmd()
        .args(["app-annotation", "bar"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(contains("app annotation bar not found"));
}

#[test]
fn pod_annotation_lookup() {
    let stub = MetadataStub::start();
    stub.serve("pod/annotations", 200, r#"[{"name":"ip-address","value":"10.1.2.3"}]"#);

    stub.cmd()
        .args(["annotation", "ip-address"])
        .assert()
        .success()
        .stdout("10.1.2.3\n");
    stub.cmd()
        .args(["annotation", "IP-ADDRESS", "none"])
        .assert()
        .success()
        .stdout("none\n");
}

#[test]
fn dash_leading_default_is_printed() {
    let stub = MetadataStub::start();
    stub.serve("pod/annotations", 200, "[]");
    stub.serve("apps/reduce-worker/annotations", 200, "[]");

    stub.cmd()
        .args(["annotation", "missing", "-1"])
        .assert()
        .success()
        .stdout("-1\n");
    stub.cmd()
        .args(["--debug", "app-annotation", "flags", "--verbose"])
        .assert()
        .success()
        .stdout("--verbose\n");
}

#[test]
fn missing_metadata_url_makes_no_requests() {
    let stub = MetadataStub::start();
    stub.serve("pod/uuid", 200, POD_UUID);

    stub.cmd()
        .env_remove("AC_METADATA_URL")
        .arg("uuid")
        .assert()
        .code(1)
        .stdout("")
        .stderr(contains("FATAL: No AC_METADATA_URL environment variable"));
    stub.cmd()
        .env("AC_APP_NAME", "")
        .arg("uuid")
        .assert()
        .code(1)
        .stderr(contains("FATAL: No AC_APP_NAME environment variable"));
    assert_eq!(stub.requests(), 0);
}

#[test]
fn server_error_is_reported_with_body() {
    let stub = MetadataStub::start();
    stub.serve("pod/manifest", 500, "internal error");

    stub.cmd()
        .arg("manifest")
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("ERROR: GET pod/manifest").and(contains("internal error")));
}

#[test]
fn manifest_is_printed_verbatim() {
    let stub = MetadataStub::start();
    stub.serve("pod/manifest", 200, POD_MANIFEST);

    stub.cmd()
        .arg("manifest")
        .assert()
        .success()
        .stdout(format!("{}\n", POD_MANIFEST));
}

#[test]
fn missing_image_id_is_fatal() {
    let stub = MetadataStub::start();

    stub.cmd()
        .arg("image-id")
        .assert()
        .code(1)
        .stderr(contains("GET apps/reduce-worker/image/id"));
}

#[test]
fn expand_and_render() {
    let stub = MetadataStub::start();
    stub.serve("pod/uuid", 200, POD_UUID);
    stub.serve("pod/manifest", 200, POD_MANIFEST);
    stub.serve("apps/reduce-worker/image/id", 200, "sha512-abc\n");

    stub.cmd()
        .args(["expand", "{{ UUID() }} {{ PodManifest().apps[0].image.name }}"])
        .assert()
        .success()
        .stdout(format!("{} example.com/reduce-worker", POD_UUID));

    stub.cmd()
        .args(["render", "-"])
        .write_stdin("{{ AppName() }}@{{ AppImageID() }}\n")
        .assert()
        .success()
        .stdout("reduce-worker@sha512-abc\n");
}

#[test]
fn template_errors_fail() {
    let stub = MetadataStub::start();
    stub.serve("pod/annotations", 200, "[]");

    stub.cmd()
        .args(["expand", "{{ MustPodAnnotation('missing') }}"])
        .assert()
        .code(1)
        .stderr(contains("pod annotation missing not found"));
    stub.cmd()
        .args(["expand", "{% if %}"])
        .assert()
        .code(1)
        .stderr(contains("ERROR: template error"));
}
