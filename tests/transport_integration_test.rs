//! Bridge runs over the real stream and socket transports.

mod common;

use common::{request_payload, Script, ScriptedProvider, Step};
use graph_bridge::application::{Bridge, RunStatus};
use graph_bridge::domain::models::{AgentConfig, ChannelConfig, Envelope};
use graph_bridge::infrastructure::transport::{frame, SocketTransport, StreamTransport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_stdio_style_run_over_duplex() {
    let (host_end, bridge_end) = tokio::io::duplex(4096);
    let (bridge_read, bridge_write) = tokio::io::split(bridge_end);

    let script = Script::new(
        vec![
            Step::call("addNode", r#"{"signature":"math-plugin.binary"}"#),
            Step::final_answer("Added one node."),
        ],
        Default::default(),
    );
    let bridge = Bridge::new(ScriptedProvider::new(script), AgentConfig::default());

    let host = tokio::spawn(async move {
        let (host_read, mut host_write) = tokio::io::split(host_end);
        let mut lines = BufReader::new(host_read).lines();

        let request = request_payload("add two numbers", &["math-plugin.binary: adds two numbers"]);
        host_write.write_all(frame(&request).as_bytes()).await.unwrap();

        let mut received = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            let envelope: Envelope = serde_json::from_str(&line).unwrap();
            let terminal = envelope.is_terminal();
            received.push(envelope);
            if terminal {
                break;
            }
            host_write
                .write_all(frame("{\"status\":\"success\"}").as_bytes())
                .await
                .unwrap();
        }
        received
    });

    let mut transport = StreamTransport::with_streams(
        BufReader::new(bridge_read),
        bridge_write,
        &ChannelConfig::default(),
    );
    let status = bridge.run(&mut transport).await.unwrap();
    drop(transport);

    let received = host.await.unwrap();
    assert_eq!(status, RunStatus::Completed);
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].kind(), "function");
    assert!(matches!(&received[1], Envelope::Response { message, .. } if message == "Added one node."));
}

#[tokio::test]
async fn test_socket_run_reports_unsupported_receive() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let host = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(socket).lines();
        let mut received = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            received.push(serde_json::from_str::<Envelope>(&line).unwrap());
        }
        received
    });

    let script = Script::default();
    let bridge = Bridge::new(ScriptedProvider::new(script.clone()), AgentConfig::default());
    let mut transport = SocketTransport::connect("127.0.0.1", port).await.unwrap();

    let status = bridge.run(&mut transport).await.unwrap();
    drop(transport);

    let received = host.await.unwrap();
    assert_eq!(status, RunStatus::Failed);
    assert_eq!(script.calls(), 0);
    assert_eq!(received.len(), 1);
    assert!(
        matches!(&received[0], Envelope::Error { error, .. } if error.starts_with("Unsupported operation"))
    );
}
