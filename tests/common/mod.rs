#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Tiny HTTP/1.1 server on 127.0.0.1 with fixed routes.
pub struct FixtureServer {
    pub port: u16,
}

impl FixtureServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
        let port = listener.local_addr().expect("local addr").port();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                thread::spawn(move || handle(stream, port));
            }
        });
        Self { port }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

fn read_request_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    while !buf.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(1) => buf.push(byte[0]),
            _ => break,
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn html(title: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{}</title></head><body>ok</body></html>",
        title
    )
}

fn handle(mut stream: TcpStream, port: u16) {
    let head = read_request_head(&mut stream);
    let mut parts = head.split_whitespace();
    let method = parts.next().unwrap_or("GET").to_string();
    let path = parts.next().unwrap_or("/").to_string();

    let (status, headers, body): (&str, Vec<String>, String) = match path.as_str() {
        "/ok" => ("200 OK", vec![], html("Official Page")),
        "/niss" => ("200 OK", vec![], html("NISS")),
        "/head-not-allowed" if method == "HEAD" => {
            ("405 Method Not Allowed", vec![], String::new())
        }
        "/head-not-allowed" => ("200 OK", vec![], html("Via GET")),
        "/moved" => (
            "301 Moved Permanently",
            vec![format!("Location: http://127.0.0.1:{}/ok", port)],
            String::new(),
        ),
        "/offsite" => (
            "302 Found",
            vec![format!("Location: http://localhost:{}/ok", port)],
            String::new(),
        ),
        "/slow" => {
            thread::sleep(Duration::from_secs(3));
            ("200 OK", vec![], html("Slow"))
        }
        _ => ("404 Not Found", vec![], "not found".to_string()),
    };

    let mut response = format!(
        concat!(
            "HTTP/1.1 {}\r\n",
            "Content-Type: text/html; charset=utf-8\r\n",
            "Content-Length: {}\r\n",
            "Connection: close\r\n",
        ),
        status,
        body.len()
    );
    for h in headers {
        response.push_str(&h);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    if method != "HEAD" {
        response.push_str(&body);
    }
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Isolated HOME plus a registry whose only country allowlists the fixture
/// server.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub registry: PathBuf,
    pub server: FixtureServer,
    cargo_home: PathBuf,
    rustup_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let server = FixtureServer::start();
        let registry = tmp.path().join("registry.toml");
        fs::write(&registry, fixture_registry(&server)).expect("write registry");

        let orig_home = std::env::var("HOME").unwrap_or_default();
        let cargo_home = PathBuf::from(&orig_home).join(".cargo");
        let rustup_home = PathBuf::from(&orig_home).join(".rustup");

        Self {
            _tmp: tmp,
            home,
            registry,
            server,
            cargo_home,
            rustup_home,
        }
    }

    /// Command without a registry override (built-in registry).
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("linkguard");
        cmd.env("HOME", &self.home)
            .env("CARGO_HOME", &self.cargo_home)
            .env("RUSTUP_HOME", &self.rustup_home)
            .env_remove("LINKGUARD_REGISTRY")
            .env_remove("LINKGUARD_TIMEOUT_MS")
            .env_remove("HTTP_PROXY")
            .env_remove("http_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy")
            .env("NO_PROXY", "127.0.0.1,localhost");
        cmd
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--registry")
            .arg(&self.registry)
            .args(["--timeout-ms", "1000"]);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        self.run_json_with_stdin(args, "")
    }

    pub fn run_json_with_stdin(&self, args: &[&str], stdin: &str) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .write_stdin(stdin.to_string())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn url(&self, path: &str) -> String {
        self.server.url(path)
    }
}

fn fixture_registry(server: &FixtureServer) -> String {
    format!(
        r#"
[global]
hosts = []

[[countries]]
key = "testland"
label = "Testland"
aliases = ["terra teste"]
hosts = ["127.0.0.1"]
fallback = "{fallback}"

[[countries.rules]]
terms = ["niss", "seguranca social"]
url = "{niss}"
label = "Solicitar NISS"

[[countries.rules]]
terms = ["broken portal"]
url = "{missing}"
label = "Portal"
"#,
        fallback = server.url("/ok"),
        niss = server.url("/niss"),
        missing = server.url("/missing"),
    )
}

pub fn checklist_json(items: Value) -> String {
    serde_json::json!({
        "checklist": {
            "id": "chk-1",
            "title": "Visto de trabalho",
            "introduction": "Passos",
            "disclaimer": "Confirme nos sites oficiais.",
            "categories": [
                { "category": "Documentos", "items": items }
            ]
        }
    })
    .to_string()
}
