use std::env;
use std::error::Error;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, UdpSocket};

/// Loopback sink for manual runs: accepts TCP connections and UDP datagrams
/// on the same port and discards everything it receives.
///
/// Usage: `cargo run --example sink_server [port]` (default 9000), then point
/// surge-gen at 127.0.0.1 on that port.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let port: u16 = env::args()
        .nth(1)
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(9000);

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let udp = UdpSocket::bind(("127.0.0.1", port)).await?;

    println!("🕳️  Sink listening on 127.0.0.1:{port} (TCP + UDP)");

    let udp_task = tokio::spawn(async move {
        let mut buf = vec![0u8; 65536];
        let mut datagrams: u64 = 0;
        loop {
            if udp.recv_from(&mut buf).await.is_ok() {
                datagrams += 1;
                if datagrams % 10_000 == 0 {
                    println!("UDP: {datagrams} datagrams drained");
                }
            }
        }
    });

    let tcp_task = tokio::spawn(async move {
        loop {
            if let Ok((mut stream, peer)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 65536];
                    let mut total: u64 = 0;
                    loop {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => total += n as u64,
                        }
                    }
                    println!("TCP: drained {total} bytes from {peer}");
                });
            }
        }
    });

    let _ = tokio::join!(udp_task, tcp_task);
    Ok(())
}
