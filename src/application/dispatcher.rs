//! Synchronous host command dispatch.

use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use crate::domain::errors::TransportError;
use crate::domain::models::{
    AddEdgeArgs, AddNodeArgs, GraphCommand, RemoveByIdArgs, UpdateInputValueArgs,
    UpdateInputValuesArgs,
};
use crate::domain::ports::Transport;

/// Turns graph commands into `function` envelopes and waits for the host's answer.
///
/// The dispatcher holds the only mutable borrow of the transport for the duration of
/// a run, so at most one call is ever outstanding. Host replies are returned verbatim,
/// including failure reports, and nothing is retried here.
pub struct CommandDispatcher<'t> {
    transport: &'t mut dyn Transport,
    dispatched: usize,
}

impl<'t> CommandDispatcher<'t> {
    pub fn new(transport: &'t mut dyn Transport) -> Self {
        Self {
            transport,
            dispatched: 0,
        }
    }

    /// Number of commands sent so far.
    pub const fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Send one command and block until the host answers with a frame.
    #[instrument(skip_all, fields(tool = command.name(), seq = self.dispatched + 1))]
    pub async fn dispatch(&mut self, command: &GraphCommand) -> Result<String, TransportError> {
        let envelope = command.to_envelope();
        info!("dispatching command to host");
        self.transport.send(&envelope).await?;
        self.dispatched += 1;

        let reply = self.transport.receive().await?;
        debug!(reply = %reply.trim_end(), "host replied");
        Ok(reply)
    }

    pub async fn add_node(&mut self, signature: &str) -> Result<String, TransportError> {
        self.dispatch(&GraphCommand::AddNode(AddNodeArgs {
            signature: signature.to_string(),
        }))
        .await
    }

    pub async fn remove_node(&mut self, id: &str) -> Result<String, TransportError> {
        self.dispatch(&GraphCommand::RemoveNode(RemoveByIdArgs { id: id.to_string() }))
            .await
    }

    /// Connect an output anchor to an input anchor.
    pub async fn add_edge(&mut self, output: &str, input: &str) -> Result<String, TransportError> {
        self.dispatch(&GraphCommand::AddEdge(AddEdgeArgs {
            output: output.to_string(),
            input: input.to_string(),
        }))
        .await
    }

    pub async fn remove_edge(&mut self, id: &str) -> Result<String, TransportError> {
        self.dispatch(&GraphCommand::RemoveEdge(RemoveByIdArgs { id: id.to_string() }))
            .await
    }

    pub async fn update_input_value(
        &mut self,
        node_id: &str,
        input_value_id: &str,
        new_input_value: f64,
    ) -> Result<String, TransportError> {
        self.dispatch(&GraphCommand::UpdateInputValue(UpdateInputValueArgs {
            node_id: node_id.to_string(),
            input_value_id: input_value_id.to_string(),
            new_input_value,
        }))
        .await
    }

    pub async fn update_input_values(
        &mut self,
        node_id: &str,
        changed_input_values: BTreeMap<String, f64>,
    ) -> Result<String, TransportError> {
        self.dispatch(&GraphCommand::UpdateInputValues(UpdateInputValuesArgs {
            node_id: node_id.to_string(),
            changed_input_values,
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ChannelConfig;
    use crate::infrastructure::transport::StreamTransport;
    use tokio::io::BufReader;

    fn channel() -> ChannelConfig {
        ChannelConfig {
            receive_timeout_secs: 0,
            strict_framing: false,
        }
    }

    #[tokio::test]
    async fn test_dispatch_sends_then_returns_reply_verbatim() {
        let host_reply = "{\"status\":\"success\",\"data\":{\"inputs\":[\"a\",\"b\"],\"outputs\":[\"c\"]}}\nend of transmission\n";
        let mut written = Vec::new();
        {
            let mut transport = StreamTransport::with_streams(
                BufReader::new(host_reply.as_bytes()),
                &mut written,
                &channel(),
            );
            let mut dispatcher = CommandDispatcher::new(&mut transport);

            let reply = dispatcher.add_node("math-plugin.binary").await.unwrap();
            assert_eq!(
                reply,
                "{\"status\":\"success\",\"data\":{\"inputs\":[\"a\",\"b\"],\"outputs\":[\"c\"]}}\n"
            );
            assert_eq!(dispatcher.dispatched(), 1);
        }

        let sent: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(sent["type"], "function");
        assert_eq!(sent["name"], "addNode");
        assert_eq!(sent["args"]["signature"], "math-plugin.binary");
    }

    #[tokio::test]
    async fn test_host_failure_is_plain_reply() {
        let host_reply = "{\"status\":\"error\",\"message\":\"no such node\"}\nend of transmission\n";
        let mut transport = StreamTransport::with_streams(
            BufReader::new(host_reply.as_bytes()),
            tokio::io::sink(),
            &channel(),
        );
        let mut dispatcher = CommandDispatcher::new(&mut transport);

        let reply = dispatcher.remove_node("missing").await.unwrap();
        assert!(reply.contains("no such node"));
    }

    #[tokio::test]
    async fn test_closed_channel_propagates() {
        let mut transport =
            StreamTransport::with_streams(tokio::io::empty(), tokio::io::sink(), &channel());
        let mut dispatcher = CommandDispatcher::new(&mut transport);

        let err = dispatcher.remove_edge("e1").await.unwrap_err();
        assert!(matches!(err, TransportError::ChannelClosed));
        assert_eq!(dispatcher.dispatched(), 1);
    }

    #[tokio::test]
    async fn test_update_input_values_envelope() {
        let mut written = Vec::new();
        {
            let mut transport = StreamTransport::with_streams(
                BufReader::new("ok\nend of transmission\n".as_bytes()),
                &mut written,
                &channel(),
            );
            let mut dispatcher = CommandDispatcher::new(&mut transport);
            let values = BTreeMap::from([("slider1".to_string(), 5.9)]);
            dispatcher.update_input_values("n1", values).await.unwrap();
        }

        let sent: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(sent["name"], "updateInputValues");
        assert_eq!(sent["args"]["changedInputValues"]["slider1"], 5.9);
    }
}
