use assert_cmd::prelude::CommandCargoExt;
use std::io::Read;
use std::net::{TcpListener, UdpSocket};
use std::process::Command;
use std::thread;

/// Blocking loopback sink on one port, TCP and UDP both drained.
fn spawn_sink() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let udp = UdpSocket::bind(("127.0.0.1", port)).unwrap();

    thread::spawn(move || {
        let mut buf = vec![0u8; 65536];
        loop {
            let _ = udp.recv_from(&mut buf);
        }
    });

    thread::spawn(move || {
        for stream in listener.incoming() {
            if let Ok(mut stream) = stream {
                thread::spawn(move || {
                    let mut buf = vec![0u8; 65536];
                    while matches!(stream.read(&mut buf), Ok(n) if n > 0) {}
                });
            }
        }
    });

    port
}

#[test]
fn test_run_prints_one_line_per_worker_then_completion() {
    let port = spawn_sink();

    let output = Command::cargo_bin("surge-gen")
        .unwrap()
        .args(["127.0.0.1", &port.to_string(), "1", "1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "Traffic generation completed.");
    assert_eq!(lines.iter().filter(|l| l.contains("[UDP]")).count(), 1);
    assert_eq!(lines.iter().filter(|l| l.contains("[TCP]")).count(), 1);
    for line in &lines[..2] {
        assert!(line.starts_with("Worker 0 ["));
        assert!(line.contains("KB, tariff: $"));
    }
}

#[test]
fn test_invalid_arguments_exit_one() {
    // Zero port fails validation after parsing.
    let output = Command::cargo_bin("surge-gen")
        .unwrap()
        .args(["127.0.0.1", "0", "1", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    // Non-numeric duration fails parsing.
    let output = Command::cargo_bin("surge-gen")
        .unwrap()
        .args(["127.0.0.1", "9000", "abc", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    // Missing arguments entirely.
    let output = Command::cargo_bin("surge-gen").unwrap().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_expired_gate_refuses_to_run() {
    let port = spawn_sink();

    let output = Command::cargo_bin("surge-gen")
        .unwrap()
        .args([
            "--expires",
            "2001-01-01",
            "127.0.0.1",
            &port.to_string(),
            "1",
            "1",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expired"));
}

#[test]
fn test_helper_output_is_surfaced_to_the_operator() {
    let port = spawn_sink();

    let output = Command::cargo_bin("surge-gen")
        .unwrap()
        .args([
            "127.0.0.1",
            &port.to_string(),
            "1",
            "1",
            "echo",
            "run",
            "complete",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("run complete"));
}

#[test]
fn test_helper_launch_failure_still_exits_zero() {
    let port = spawn_sink();

    let output = Command::cargo_bin("surge-gen")
        .unwrap()
        .args(["127.0.0.1", &port.to_string(), "1", "1", "/no/such/helper.py"])
        .output()
        .unwrap();

    assert!(output.status.success());
}
