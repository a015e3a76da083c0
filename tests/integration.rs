use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

const NEWS_CSV: &str = "\
url,title,text,topic,tags,date
https://example.com/1,Parliament passes budget,The budget vote passed late on Tuesday.,Politics,\"budget,parliament\",2024-03-05
https://example.com/2,Budget vote delayed again,Opposition parties forced a delay to the budget vote.,Politics,\"budget;vote\",01/02/2024
https://example.com/3,Derby ends in a draw,Both teams scored twice in the derby.,Sport,\"football derby\",2024-02-20 18:30
https://example.com/4,Chip maker unveils new processor,The processor doubles battery life.,Tech,\"chips,hardware\",not-a-date
https://example.com/5,Museum reopens after renovation,Visitors returned to the museum galleries.,Culture & Arts,museum,
";

fn nlens_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_nlens"))
}

fn setup_test_env_with(csv: Option<&str>, port: u16) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    if let Some(csv) = csv {
        fs::write(data_dir.join("news.csv"), csv).unwrap();
    }

    let config_content = format!(
        r#"[data]
path = "{}/data/news.csv"
max_rows = 1000
max_text_len = 2000

[index]
max_features = 2000

[retrieval]
related_top_k = 3

[server]
bind = "127.0.0.1:{}"
"#,
        root.display(),
        port
    );

    let config_path = config_dir.join("nlens.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn setup_test_env() -> (TempDir, PathBuf) {
    setup_test_env_with(Some(NEWS_CSV), 5000)
}

fn command(config_path: &Path) -> Command {
    let mut cmd = Command::new(nlens_binary());
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .env_remove("NEWS_CSV_PATH")
        .env_remove("NEWS_NROWS")
        .env_remove("NEWS_MAX_TEXT")
        .env_remove("NEWS_TFIDF_FEATS")
        .env("RUST_LOG", "warn");
    cmd
}

fn run_nlens(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let output = command(config_path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run nlens binary: {}", e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, stderr, success) = run_nlens(&config_path, &["stats"]);
    assert!(success, "stats failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Articles:    5"), "got: {}", stdout);
    assert!(stdout.contains("Dated:       3 / 5"), "got: {}", stdout);
}

#[test]
fn test_missing_data_source_serves_placeholder() {
    let (_tmp, config_path) = setup_test_env_with(None, 5000);
    let (stdout, stderr, success) = run_nlens(&config_path, &["get", "0"]);
    assert!(success, "get failed: stderr={}", stderr);
    assert!(stdout.contains("Welcome to News Lens"));
    assert!(stdout.contains("topic_key: default"));
}

#[test]
fn test_explicit_missing_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_nlens(&tmp.path().join("absent.toml"), &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"), "got: {}", stderr);
}

#[test]
fn test_invalid_config_is_fatal() {
    let (tmp, config_path) = setup_test_env();
    let bad = tmp.path().join("config/bad.toml");
    fs::write(&bad, "[index]\nmax_features = 0\n").unwrap();
    let (_, stderr, success) = run_nlens(&bad, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("max_features"), "got: {}", stderr);
    drop(config_path);
}

#[test]
fn test_data_source_directory_is_fatal() {
    let (tmp, config_path) = setup_test_env_with(None, 5000);
    fs::create_dir_all(tmp.path().join("data/news.csv")).unwrap();
    let (_, stderr, success) = run_nlens(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("directory"), "got: {}", stderr);
}

#[test]
fn test_list_date_desc_undated_last() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["list"]);
    assert!(success);
    let order: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .filter(|t| t.parse::<usize>().is_ok())
        .collect();
    // 2024-03-05, 2024-02-20, 2024-02-01, then undated in corpus order.
    assert_eq!(order, vec!["0", "2", "1", "3", "4"]);
    assert!(stdout.contains("5 of 5 articles"));
}

#[test]
fn test_list_unknown_sort_is_error() {
    let (_tmp, config_path) = setup_test_env();
    let (_, stderr, success) = run_nlens(&config_path, &["list", "--sort", "sideways"]);
    assert!(!success);
    assert!(stderr.contains("Unknown sort order"));
}

#[test]
fn test_list_by_topic() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["list", "--topic", "politics"]);
    assert!(success);
    assert!(stdout.contains("2 of 2 articles"));
    assert!(stdout.contains("Parliament passes budget"));
}

#[test]
fn test_list_by_topic_with_sort() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["list", "--topic", "politics"]);
    assert!(success);
    let parliament = stdout.find("Parliament passes budget").unwrap();
    let delayed = stdout.find("Budget vote delayed again").unwrap();
    assert!(parliament < delayed, "default is newest first: {}", stdout);

    let (stdout, _, success) = run_nlens(
        &config_path,
        &["list", "--topic", "politics", "--sort", "title_asc"],
    );
    assert!(success);
    let parliament = stdout.find("Parliament passes budget").unwrap();
    let delayed = stdout.find("Budget vote delayed again").unwrap();
    assert!(delayed < parliament, "title_asc puts Budget first: {}", stdout);
}

#[test]
fn test_topics() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["topics"]);
    assert!(success);
    let topics: Vec<&str> = stdout.lines().collect();
    assert_eq!(topics, vec!["Culture & Arts", "Politics", "Sport", "Tech"]);
}

#[test]
fn test_get_article() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["get", "3"]);
    assert!(success);
    assert!(stdout.contains("Chip maker unveils new processor"));
    assert!(stdout.contains("topic_key: tech"));
    assert!(stdout.contains("not-a-date (unparsed)"));
}

#[test]
fn test_get_missing_article() {
    let (_tmp, config_path) = setup_test_env();
    let (_, stderr, success) = run_nlens(&config_path, &["get", "99"]);
    assert!(!success);
    assert!(stderr.contains("article not found: 99"), "got: {}", stderr);
}

#[test]
fn test_related_excludes_self() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["related", "0", "--explain"]);
    assert!(success);
    assert!(stdout.starts_with("1. ["));
    assert!(stdout.contains("#1 Budget vote delayed again"));
    assert!(!stdout.contains("#0 "));
    assert!(stdout.contains("similarity:"));
    // related_top_k = 3 from config.
    assert_eq!(stdout.lines().filter(|l| l.contains(". [")).count(), 3);
}

#[test]
fn test_related_missing_article() {
    let (_tmp, config_path) = setup_test_env();
    let (_, stderr, success) = run_nlens(&config_path, &["related", "42"]);
    assert!(!success);
    assert!(stderr.contains("article not found"));
}

#[test]
fn test_search_substring() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["search", "BUDGET"]);
    assert!(success);
    assert!(stdout.contains("mode: substring  (2 results)"), "got: {}", stdout);
}

#[test]
fn test_search_similarity_fallback() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["search", "museum visitors galleries today"]);
    assert!(success);
    assert!(stdout.contains("mode: similarity  (5 results)"), "got: {}", stdout);
}

#[test]
fn test_analytics_json() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_nlens(&config_path, &["analytics", "--json"]);
    assert!(success);
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["topics"]["Politics"], 2);
    assert_eq!(v["timeline"]["2024-02"], 2);
    assert_eq!(v["timeline"]["2024-03"], 1);
    assert_eq!(v["top_tags"]["budget"], 2);
    assert_eq!(v["keyword_source"], "tags");
}

#[test]
fn test_analytics_deterministic() {
    let (_tmp, config_path) = setup_test_env();
    let (a, _, _) = run_nlens(&config_path, &["analytics", "--json"]);
    let (b, _, _) = run_nlens(&config_path, &["analytics", "--json"]);
    assert_eq!(a, b);
}

// ============ HTTP server ============

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn start_server(config_path: &Path) -> std::process::Child {
    command(config_path)
        .arg("serve")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to start server: {}", e))
}

fn wait_for_server(port: u16) {
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        std::thread::sleep(std::time::Duration::from_millis(100));
        if let Ok(resp) = reqwest::blocking::get(&url) {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

struct Server {
    child: std::process::Child,
    port: u16,
    _tmp: TempDir,
}

impl Server {
    fn start() -> Server {
        let port = find_free_port();
        let (tmp, config_path) = setup_test_env_with(Some(NEWS_CSV), port);
        let child = start_server(&config_path);
        wait_for_server(port);
        Server {
            child,
            port,
            _tmp: tmp,
        }
    }

    fn get(&self, path: &str) -> reqwest::blocking::Response {
        reqwest::blocking::get(format!("http://127.0.0.1:{}{}", self.port, path)).unwrap()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.child.kill().ok();
        self.child.wait().ok();
    }
}

#[test]
fn test_server_endpoints() {
    let server = Server::start();

    let resp = server.get("/health");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());

    let body: serde_json::Value = server.get("/articles?per_page=2&page=2").json().unwrap();
    assert_eq!(body["sort"], "date_desc");
    assert_eq!(body["pagination"]["pages"], 3);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);
    assert_eq!(body["articles"][0]["id"], 1);

    let body: serde_json::Value = server.get("/articles?page=99&sort=title_asc").json().unwrap();
    assert_eq!(body["sort"], "title_asc");
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["articles"][0]["title"], "Budget vote delayed again");

    let body: serde_json::Value = server.get("/articles?topic=SPORT").json().unwrap();
    assert_eq!(body["pagination"]["total"], 1);

    let body: serde_json::Value = server.get("/articles/4").json().unwrap();
    assert_eq!(body["topic"], "Culture & Arts");
    assert_eq!(body["topic_key"], "default");
    assert!(body["date_parsed"].is_null());

    let body: serde_json::Value = server.get("/topics").json().unwrap();
    assert_eq!(body["topics"].as_array().unwrap().len(), 4);

    let body: serde_json::Value = server.get("/analytics").json().unwrap();
    assert_eq!(body["topics"]["Sport"], 1);
}

#[test]
fn test_server_not_found() {
    let server = Server::start();

    for path in ["/articles/99", "/articles/abc", "/articles/99/related"] {
        let resp = server.get(path);
        assert_eq!(resp.status(), 404, "path {}", path);
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["error"]["code"], "not_found");
    }
}

#[test]
fn test_server_related_and_search() {
    let server = Server::start();

    let body: serde_json::Value = server.get("/articles/0/related").json().unwrap();
    let related = body["related"].as_array().unwrap();
    assert_eq!(related.len(), 3);
    assert_eq!(related[0]["id"], 1);
    assert!(related.iter().all(|r| r["id"] != 0));
    assert!(related[0].get("explain").is_none());

    let body: serde_json::Value = server.get("/articles/0/related?k=1&explain=true").json().unwrap();
    assert_eq!(body["related"].as_array().unwrap().len(), 1);
    assert!(body["related"][0]["explain"]["similarity"].is_number());

    let resp = server.get("/articles/0/related?k=0");
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = server.get("/search?q=derby").json().unwrap();
    assert_eq!(body["mode"], "substring");
    assert_eq!(body["total"], 1);
    assert_eq!(body["articles"][0]["id"], 2);

    let body: serde_json::Value = server.get("/search?q=").json().unwrap();
    assert_eq!(body["mode"], "all");
    assert_eq!(body["total"], 5);
}
