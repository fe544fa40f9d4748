use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use tempfile::TempDir;

fn devflags(cache: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("devflags"));
    cmd.env_remove("RUST_LOG")
        .arg("--cache-dir")
        .arg(cache.path());
    cmd
}

#[test]
fn toggles_set_then_list() {
    let cache = TempDir::new().unwrap();

    devflags(&cache)
        .args(["toggles", "set", "always-show-alt-text-entry-point", "true"])
        .assert()
        .success()
        .stdout(contains("always-show-alt-text-entry-point: true"));

    devflags(&cache)
        .args(["toggles", "list"])
        .assert()
        .success()
        .stdout(contains("always-show-alt-text-entry-point: true"))
        .stdout(contains("send-analytics-to-wmf-labs: false"));
}

#[test]
fn show_without_cache_reports_nothing_fresh() {
    let cache = TempDir::new().unwrap();

    devflags(&cache)
        .arg("show")
        .assert()
        .success()
        .stdout(contains("no fresh feature config cached"));
}

#[test]
fn get_fetches_once_then_serves_from_disk() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/config")
            .query_param("action", "raw");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"version":7,"ios":[{"yir":{"isEnabled":false}}]}"#);
    });
    let cache = TempDir::new().unwrap();

    for _ in 0..2 {
        devflags(&cache)
            .arg("--endpoint")
            .arg(server.url("/config"))
            .args(["get", "ios.0.yir.isEnabled"])
            .assert()
            .success()
            .stdout(contains("false"));
    }

    mock.assert();
}

#[test]
fn bad_endpoint_fails() {
    let cache = TempDir::new().unwrap();

    devflags(&cache)
        .args(["--endpoint", "not a url", "refresh"])
        .assert()
        .failure()
        .stderr(contains("Failed to create request"));
}
