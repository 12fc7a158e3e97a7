#![cfg(feature = "api")]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

struct ChildGuard {
    child: Child,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn bridge_preset_is_served_over_http() {
    let port = allocate_port();
    let addr = format!("127.0.0.1:{port}");
    let _child = spawn_api_process(port);

    wait_for_server(&addr, Duration::from_secs(8));

    let (status, body) = http_get(&addr, "/networks").expect("/networks request should succeed");
    assert_eq!(status, 200);
    let report: Value = serde_json::from_str(&body).expect("report should be JSON");
    assert_eq!(report.get("scenario").and_then(Value::as_str), Some("bridge"));
    assert_eq!(report.get("clean_networks").and_then(Value::as_u64), Some(1));
    let networks = report
        .get("networks")
        .and_then(Value::as_array)
        .expect("networks should be an array");
    assert_eq!(networks.len(), 1);
    let id = networks[0]
        .get("id")
        .and_then(Value::as_str)
        .expect("network id should be a string")
        .to_string();

    let (status, body) =
        http_get(&addr, &format!("/networks/{id}")).expect("network request should succeed");
    assert_eq!(status, 200);
    let detail: Value = serde_json::from_str(&body).expect("detail should be JSON");
    let members = detail
        .get("members")
        .and_then(Value::as_array)
        .expect("members should be an array");
    assert_eq!(members.len(), 5);

    let (status, body) = http_get(&addr, "/cells/2/0").expect("cell request should succeed");
    assert_eq!(status, 200);
    let cell: Value = serde_json::from_str(&body).expect("cell should be JSON");
    assert_eq!(cell.get("kind").and_then(Value::as_str), Some("wire"));
    assert_eq!(cell.get("tier").and_then(Value::as_str), Some("high"));
    assert_eq!(cell.get("powered").and_then(Value::as_bool), Some(true));
    assert_eq!(cell.get("network").and_then(Value::as_str), Some(id.as_str()));

    let (status, _) = http_get(&addr, "/cells/7/7").expect("empty cell request should succeed");
    assert_eq!(status, 404);

    let (status, _) = http_get(&addr, "/networks/0v0").expect("unknown network request");
    assert_eq!(status, 404);
}

fn allocate_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port bind should succeed");
    let port = listener
        .local_addr()
        .expect("local_addr should be available")
        .port();
    drop(listener);
    port
}

fn spawn_api_process(port: u16) -> ChildGuard {
    let child = Command::new(env!("CARGO_BIN_EXE_powernet"))
        .args(["--preset", "bridge", "--serve", "--port", &port.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("powernet process should spawn");

    ChildGuard { child }
}

fn wait_for_server(addr: &str, timeout: Duration) {
    let start = Instant::now();
    loop {
        if let Ok((status, _)) = http_get(addr, "/networks") {
            if status == 200 {
                return;
            }
        }

        if start.elapsed() >= timeout {
            panic!("timed out waiting for API server on {addr}");
        }

        thread::sleep(Duration::from_millis(50));
    }
}

fn http_get(addr: &str, path: &str) -> Result<(u16, String), String> {
    let mut stream = TcpStream::connect(addr).map_err(|err| format!("connect: {err}"))?;
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .map_err(|err| format!("write: {err}"))?;

    let mut raw = String::new();
    stream
        .read_to_string(&mut raw)
        .map_err(|err| format!("read: {err}"))?;

    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| "invalid HTTP response".to_string())?;
    let status_code = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| "missing status code".to_string())?
        .parse::<u16>()
        .map_err(|err| format!("invalid status code: {err}"))?;

    Ok((status_code, body.to_string()))
}
