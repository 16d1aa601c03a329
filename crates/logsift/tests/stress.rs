use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serial_test::serial;
use testkit::{serilog_line, write_log_file};

const FILES: usize = 8;
const LINES_PER_FILE: usize = 2_000;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_logsift")
}

fn spawn_server(log_dir: &Path) -> (Child, u16) {
    let port = free_port();
    let child = Command::new(bin())
        .env("LOGSIFT_CONFIG", log_dir.join("no-config.toml"))
        .arg("--log-dir")
        .arg(log_dir)
        .arg("serve")
        .arg("--http-addr")
        .arg(format!("127.0.0.1:{port}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn logsift serve");
    (child, port)
}

fn build_log_dir(dir: &Path) {
    for file in 0..FILES {
        let mut lines = (0..LINES_PER_FILE)
            .map(|i| {
                let level = if i % 10 == 0 { "Error" } else { "Information" };
                let ts = format!("2024-05-01T{:02}:{:02}:{:02}Z", file, (i / 60) % 60, i % 60);
                serilog_line(&ts, level, &format!("loadtest file={{File}} idx={{Idx}} {i}"))
            })
            .collect::<Vec<_>>();
        lines.push("{\"Timestamp\":\"2024-05-01T00:00:00Z\",\"Lev".to_string());
        write_log_file(dir, &format!("log-{file:02}.json"), &lines).expect("write log file");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_queries_agree() {
    let temp = tempfile::tempdir().expect("tempdir");
    build_log_dir(temp.path());
    let (mut child, port) = spawn_server(temp.path());

    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{port}/api/filter-logs/level-logs?level=Error");

    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        assert!(child.try_wait().expect("try_wait").is_none(), "logsift exited early");
        if client.get(&url).send().await.is_ok() {
            break;
        }
        assert!(Instant::now() < deadline, "query server did not become ready");
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let started = Instant::now();
    let mut tasks = Vec::new();
    for _ in 0..16 {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            let res = client.get(&url).send().await.expect("send query");
            assert!(res.status().is_success());
            res.text().await.expect("read body")
        }));
    }

    let mut bodies = Vec::new();
    for task in tasks {
        bodies.push(task.await.expect("join query task"));
    }

    let expected = FILES * LINES_PER_FILE / 10;
    let first: serde_json::Value = serde_json::from_str(&bodies[0]).expect("json body");
    assert_eq!(first["logs"].as_array().expect("logs array").len(), expected);
    assert!(bodies.iter().all(|b| *b == bodies[0]));

    eprintln!(
        "16 concurrent queries over {} lines in {:?}",
        FILES * LINES_PER_FILE,
        started.elapsed()
    );

    let _ = child.kill();
    let _ = child.wait();
}
