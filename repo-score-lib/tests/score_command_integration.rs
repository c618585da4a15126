//! End-to-end tests for the scoring command against wiremock GitHub and npm backends

use camino::Utf8PathBuf;
use repo_score_lib::{Host, run};
use serde_json::{Value, json};
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default)]
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    fn output(&self) -> String {
        String::from_utf8(self.output_buf.clone()).expect("output should be UTF-8")
    }

    fn errors(&self) -> String {
        String::from_utf8(self.error_buf.clone()).expect("error output should be UTF-8")
    }

    fn records(&self) -> Vec<Value> {
        self.output()
            .lines()
            .map(|line| serde_json::from_str(line).expect("each output line should be a JSON object"))
            .collect()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

/// Host whose output stream is closed, like stdout piped into a process that exited
#[derive(Debug, Default)]
struct ClosedOutputHost {
    error_buf: Vec<u8>,
}

#[derive(Debug)]
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }
}

impl Host for ClosedOutputHost {
    fn output(&mut self) -> impl Write {
        ClosedPipe
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

struct Fixture {
    _dir: tempfile::TempDir,
    base: Utf8PathBuf,
}

impl Fixture {
    fn new(urls: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp path");
        std::fs::write(base.join("urls.txt"), urls).expect("write URL file");
        std::fs::write(base.join("repo-score.toml"), "max_concurrent_requests = 2\n").expect("write config");
        Self { _dir: dir, base }
    }

    fn args(&self, server: &MockServer, extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            "repo-score".to_string(),
            self.base.join("urls.txt").to_string(),
            "--config".to_string(),
            self.base.join("repo-score.toml").to_string(),
            "--github-api-url".to_string(),
            server.uri(),
            "--npm-registry-url".to_string(),
            server.uri(),
            "--github-token".to_string(),
            "test-token".to_string(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        args
    }
}

/// Mount a repository that is 30 days old with 165 commits, one open and three closed
/// issues, and two contributors of whom one authored the majority of commits.
async fn mount_repo(server: &MockServer, owner: &str, repo: &str, readme: String, license: Option<&str>, commits: u64) {
    let base = format!("/repos/{owner}/{repo}");

    Mock::given(method("GET"))
        .and(path(base.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-31T00:00:00Z",
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{base}/readme")))
        .respond_with(ResponseTemplate::new(200).set_body_string(readme))
        .mount(server)
        .await;

    let license = match license {
        Some(name) => ResponseTemplate::new(200).set_body_json(json!({"license": {"name": name}})),
        None => ResponseTemplate::new(404),
    };
    Mock::given(method("GET")).and(path(format!("{base}/license"))).respond_with(license).mount(server).await;

    Mock::given(method("GET"))
        .and(path(format!("{base}/commits")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"sha": "abc"}]))
                .insert_header("link", format!("<{}{base}/commits?per_page=1&page={commits}>; rel=\"last\"", server.uri()).as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{base}/contributors")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"login": "A", "contributions": 30},
            {"login": "B", "contributions": 20},
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{base}/issues")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"state": "open"},
            {"state": "closed"},
            {"state": "closed"},
            {"state": "closed"},
            {"state": "open", "pull_request": {}},
        ])))
        .mount(server)
        .await;
}

fn words(count: usize) -> String {
    "word ".repeat(count)
}

fn score(record: &Value, key: &str) -> f64 {
    record[key].as_f64().unwrap_or_else(|| panic!("missing numeric field {key} in {record}"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[tokio::test]
async fn test_scores_repository_end_to_end() {
    let server = MockServer::start().await;
    mount_repo(&server, "acme", "widget", words(13_750), Some("MIT License"), 165).await;

    let fixture = Fixture::new("https://github.com/acme/widget\n");
    let mut host = TestHost::default();
    run(&mut host, fixture.args(&server, &[])).await.expect("scoring should succeed");

    let records = host.records();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["URL"], "https://github.com/acme/widget");
    assert_close(score(record, "RampUp"), 0.5);
    assert_close(score(record, "Correctness"), 0.75);
    assert_close(score(record, "BusFactor"), 1.0);
    assert_close(score(record, "ResponsiveMaintainer"), 0.5);
    assert_close(score(record, "License"), 1.0);
    assert_close(score(record, "NetScore"), 0.6875);

    for key in [
        "NetScore_Latency",
        "RampUp_Latency",
        "Correctness_Latency",
        "BusFactor_Latency",
        "ResponsiveMaintainer_Latency",
        "License_Latency",
    ] {
        assert!(score(record, key) >= 0.0);
    }

    assert!(host.errors().is_empty(), "unexpected diagnostics: {}", host.errors());
}

#[tokio::test]
async fn test_output_keys_are_ordered() {
    let server = MockServer::start().await;
    mount_repo(&server, "acme", "widget", words(600), Some("MIT License"), 10).await;

    let fixture = Fixture::new("https://github.com/acme/widget\n");
    let mut host = TestHost::default();
    run(&mut host, fixture.args(&server, &[])).await.expect("scoring should succeed");

    let output = host.output();
    let line = output.lines().next().expect("one record");
    let keys = [
        "\"URL\"",
        "\"NetScore\"",
        "\"RampUp\"",
        "\"Correctness\"",
        "\"BusFactor\"",
        "\"ResponsiveMaintainer\"",
        "\"License\"",
        "\"NetScore_Latency\"",
        "\"RampUp_Latency\"",
        "\"Correctness_Latency\"",
        "\"BusFactor_Latency\"",
        "\"ResponsiveMaintainer_Latency\"",
        "\"License_Latency\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| line.find(k).unwrap_or_else(|| panic!("missing {k} in {line}"))).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "keys out of order: {line}");
}

#[tokio::test]
async fn test_license_found_in_readme() {
    let server = MockServer::start().await;
    let readme = format!("{}\n\n## License\n\nReleased under the mit license.", words(600));
    mount_repo(&server, "acme", "widget", readme, None, 10).await;

    let fixture = Fixture::new("https://github.com/acme/widget\n");
    let mut host = TestHost::default();
    run(&mut host, fixture.args(&server, &[])).await.expect("scoring should succeed");

    assert_close(score(&host.records()[0], "License"), 1.0);
}

#[tokio::test]
async fn test_other_license_gates_net_score() {
    let server = MockServer::start().await;
    mount_repo(&server, "acme", "widget", words(13_750), Some("Apache License 2.0"), 165).await;

    let fixture = Fixture::new("https://github.com/acme/widget\n");
    let mut host = TestHost::default();
    run(&mut host, fixture.args(&server, &[])).await.expect("scoring should succeed");

    let record = &host.records()[0];
    assert_close(score(record, "License"), 0.0);
    assert_close(score(record, "NetScore"), 0.0);
    assert_close(score(record, "RampUp"), 0.5);
}

#[tokio::test]
async fn test_npm_and_github_entries_keep_input_order() {
    let server = MockServer::start().await;
    mount_repo(&server, "acme", "widget", words(13_750), Some("MIT License"), 165).await;
    mount_repo(&server, "acme", "gadget", words(600), Some("MIT License"), 10).await;

    Mock::given(method("GET"))
        .and(path("/widget"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repository": {"type": "git", "url": "git+https://github.com/acme/widget.git"}
        })))
        .mount(&server)
        .await;

    let fixture = Fixture::new(
        "https://github.com/acme/gadget\n\n# comment\nhttps://www.npmjs.com/package/widget\nhttps://gitlab.com/acme/thing\n",
    );
    let mut host = TestHost::default();
    run(&mut host, fixture.args(&server, &[])).await.expect("scoring should succeed");

    let urls: Vec<_> = host.records().iter().map(|r| r["URL"].as_str().expect("URL").to_string()).collect();
    assert_eq!(urls, ["https://github.com/acme/gadget", "https://www.npmjs.com/package/widget"]);

    let errors = host.errors();
    assert!(errors.contains("Skipping unsupported entry"), "{errors}");
    assert!(errors.contains("gitlab.com"), "{errors}");
}

#[tokio::test]
async fn test_unreachable_repository_fails_after_writing_the_rest() {
    let server = MockServer::start().await;
    mount_repo(&server, "acme", "widget", words(600), Some("MIT License"), 10).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fixture = Fixture::new("https://github.com/acme/ghost\nhttps://github.com/acme/widget\n");
    let mut host = TestHost::default();
    let err = run(&mut host, fixture.args(&server, &[])).await.expect_err("a missing repository should fail the run");
    assert!(err.to_string().contains("could not be scored"), "{err}");

    let records = host.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["URL"], "https://github.com/acme/widget");

    let errors = host.errors();
    assert!(errors.contains("Unable to score 1 package(s)"), "{errors}");
    assert!(errors.contains("https://github.com/acme/ghost"), "{errors}");
}

#[tokio::test]
async fn test_miscalibrated_scores() {
    let server = MockServer::start().await;
    // 660 commits in one month is twice the calibrated maximum
    mount_repo(&server, "acme", "busy", words(600), Some("MIT License"), 660).await;

    let fixture = Fixture::new("https://github.com/acme/busy\n");

    let mut host = TestHost::default();
    run(&mut host, fixture.args(&server, &[])).await.expect("miscalibration is only reported by default");
    let record = &host.records()[0];
    assert_close(score(record, "ResponsiveMaintainer"), 2.0);
    assert_close(score(record, "NetScore"), 2.0);

    let mut host = TestHost::default();
    let err = run(&mut host, fixture.args(&server, &["--error-if-miscalibrated"]))
        .await
        .expect_err("miscalibration should fail the run when requested");
    assert!(err.to_string().contains("calibrated range"), "{err}");
    assert_eq!(host.records().len(), 1);
}

#[tokio::test]
async fn test_weights_from_config() {
    let server = MockServer::start().await;
    mount_repo(&server, "acme", "widget", words(13_750), Some("MIT License"), 165).await;

    let fixture = Fixture::new("https://github.com/acme/widget\n");
    std::fs::write(
        fixture.base.join("repo-score.toml"),
        "[weights]\nramp_up = 1\ncorrectness = 0\nbus_factor = 0\nresponsiveness = 0\n",
    )
    .expect("write config");

    let mut host = TestHost::default();
    run(&mut host, fixture.args(&server, &[])).await.expect("scoring should succeed");
    assert_close(score(&host.records()[0], "NetScore"), 0.5);
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    let fixture = Fixture::new("https://github.com/acme/widget\n");
    std::fs::write(fixture.base.join("repo-score.toml"), "max_concurrent_requests = 0\n").expect("write config");

    let mut host = TestHost::default();
    let _ = run(&mut host, fixture.args(&server, &[])).await.expect_err("invalid config should fail");
    assert!(host.output_buf.is_empty());
}

#[tokio::test]
async fn test_failed_record_write_fails_the_run() {
    let server = MockServer::start().await;
    mount_repo(&server, "acme", "widget", words(600), Some("MIT License"), 10).await;

    let fixture = Fixture::new("https://github.com/acme/widget\n");
    let mut host = ClosedOutputHost::default();
    let err = run(&mut host, fixture.args(&server, &[])).await.expect_err("a closed output stream should fail the run");
    assert!(err.to_string().contains("writing records"), "{err:#}");
}
