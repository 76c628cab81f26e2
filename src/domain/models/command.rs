//! The closed set of graph mutations the model may request.
//!
//! Every tool the reasoning engine sees maps to exactly one [`GraphCommand`] variant.
//! Arguments are decoded into a typed record and validated before anything is sent
//! to the host; adding an operation means adding a variant here.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::domain::errors::CommandError;
use crate::domain::models::Envelope;

/// Arguments of `addNode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNodeArgs {
    pub signature: String,
}

/// Arguments of `removeNode` and `removeEdge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveByIdArgs {
    pub id: String,
}

/// Arguments of `addEdge`: an output anchor connected to an input anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddEdgeArgs {
    pub output: String,
    pub input: String,
}

/// Arguments of `updateInputValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInputValueArgs {
    pub node_id: String,
    pub input_value_id: String,
    pub new_input_value: f64,
}

/// Arguments of `updateInputValues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInputValuesArgs {
    pub node_id: String,
    pub changed_input_values: BTreeMap<String, f64>,
}

/// A validated host-side graph mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphCommand {
    AddNode(AddNodeArgs),
    RemoveNode(RemoveByIdArgs),
    AddEdge(AddEdgeArgs),
    RemoveEdge(RemoveByIdArgs),
    UpdateInputValue(UpdateInputValueArgs),
    UpdateInputValues(UpdateInputValuesArgs),
}

/// Provider-neutral description of one tool offered to the reasoning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

impl GraphCommand {
    /// Tool names in catalog order.
    pub const TOOL_NAMES: [&'static str; 6] = [
        "addNode",
        "removeNode",
        "addEdge",
        "removeEdge",
        "updateInputValue",
        "updateInputValues",
    ];

    /// Decode a model-issued call into a command.
    ///
    /// `arguments` is the raw JSON text produced by the model.
    pub fn from_call(name: &str, arguments: &str) -> Result<Self, CommandError> {
        let arguments = if arguments.trim().is_empty() {
            "{}"
        } else {
            arguments
        };

        let command = match name {
            "addNode" => Self::AddNode(decode(name, arguments)?),
            "removeNode" => Self::RemoveNode(decode(name, arguments)?),
            "addEdge" => Self::AddEdge(decode(name, arguments)?),
            "removeEdge" => Self::RemoveEdge(decode(name, arguments)?),
            "updateInputValue" => Self::UpdateInputValue(decode(name, arguments)?),
            "updateInputValues" => Self::UpdateInputValues(decode(name, arguments)?),
            other => return Err(CommandError::UnknownTool(other.to_string())),
        };

        command.validate()?;
        Ok(command)
    }

    /// Wire name of the operation.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddNode(_) => "addNode",
            Self::RemoveNode(_) => "removeNode",
            Self::AddEdge(_) => "addEdge",
            Self::RemoveEdge(_) => "removeEdge",
            Self::UpdateInputValue(_) => "updateInputValue",
            Self::UpdateInputValues(_) => "updateInputValues",
        }
    }

    /// Arguments as the JSON object sent to the host, keyed by wire field names.
    pub fn args(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match self {
            Self::AddNode(args) => {
                map.insert("signature".into(), Value::from(args.signature.as_str()));
            }
            Self::RemoveNode(args) | Self::RemoveEdge(args) => {
                map.insert("id".into(), Value::from(args.id.as_str()));
            }
            Self::AddEdge(args) => {
                map.insert("output".into(), Value::from(args.output.as_str()));
                map.insert("input".into(), Value::from(args.input.as_str()));
            }
            Self::UpdateInputValue(args) => {
                map.insert("nodeId".into(), Value::from(args.node_id.as_str()));
                map.insert("inputValueId".into(), Value::from(args.input_value_id.as_str()));
                map.insert("newInputValue".into(), Value::from(args.new_input_value));
            }
            Self::UpdateInputValues(args) => {
                let changed = args
                    .changed_input_values
                    .iter()
                    .map(|(id, value)| (id.clone(), Value::from(*value)))
                    .collect();
                map.insert("nodeId".into(), Value::from(args.node_id.as_str()));
                map.insert("changedInputValues".into(), Value::Object(changed));
            }
        }
        map
    }

    /// Build the `function` envelope for this command.
    pub fn to_envelope(&self) -> Envelope {
        Envelope::Function {
            name: self.name().to_string(),
            args: self.args(),
        }
    }

    fn validate(&self) -> Result<(), CommandError> {
        let invalid = |reason: &str| CommandError::InvalidArguments {
            tool: self.name().to_string(),
            reason: reason.to_string(),
        };

        match self {
            Self::AddNode(args) if args.signature.trim().is_empty() => {
                Err(invalid("signature must not be empty"))
            }
            Self::RemoveNode(args) | Self::RemoveEdge(args) if args.id.trim().is_empty() => {
                Err(invalid("id must not be empty"))
            }
            Self::AddEdge(args) if args.output.trim().is_empty() || args.input.trim().is_empty() => {
                Err(invalid("output and input anchor ids must not be empty"))
            }
            Self::AddEdge(args) if args.output == args.input => {
                Err(invalid("an anchor cannot be connected to itself"))
            }
            Self::UpdateInputValue(args)
                if args.node_id.trim().is_empty() || args.input_value_id.trim().is_empty() =>
            {
                Err(invalid("nodeId and inputValueId must not be empty"))
            }
            Self::UpdateInputValues(args) if args.node_id.trim().is_empty() => {
                Err(invalid("nodeId must not be empty"))
            }
            Self::UpdateInputValues(args) if args.changed_input_values.is_empty() => {
                Err(invalid("changedInputValues must contain at least one entry"))
            }
            _ => Ok(()),
        }
    }

    /// The tool catalog offered to the reasoning engine, one entry per variant.
    pub fn catalog() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "addNode".to_string(),
                description: "Add a new node to the graph".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "signature": {
                            "type": "string",
                            "description": "Signature/type of the node e.g 'math-plugin.binary', 'math-plugin.unary'"
                        }
                    },
                    "required": ["signature"]
                }),
            },
            ToolDefinition {
                name: "removeNode".to_string(),
                description: "Remove a node from the graph".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Id of the node to be deleted e.g '15s2k3', '1m9j0kl'" }
                    },
                    "required": ["id"]
                }),
            },
            ToolDefinition {
                name: "addEdge".to_string(),
                description: "Adds an edge between an output anchor of a node and an input anchor of another node using their anchor ids".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "output": { "type": "string", "description": "Id of the output anchor to connect. e.g 'l40plq', 'j5nm33'" },
                        "input": { "type": "string", "description": "Id of the input anchor to connect. e.g 'az22m3', '0lpm5i'" }
                    },
                    "required": ["output", "input"]
                }),
            },
            ToolDefinition {
                name: "removeEdge".to_string(),
                description: "Removes an edge between an output anchor and an input anchor using the edge id".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Id of the edge to be removed. e.g '8kn5la', '1m9j0kl'" }
                    },
                    "required": ["id"]
                }),
            },
            ToolDefinition {
                name: "updateInputValue".to_string(),
                description: "Useful when the input value of a node has to be changed".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "nodeId": { "type": "string", "description": "Id of the node owning the input value" },
                        "inputValueId": { "type": "string", "description": "Id of the input value" },
                        "newInputValue": { "type": "number", "description": "New input value" }
                    },
                    "required": ["nodeId", "inputValueId", "newInputValue"]
                }),
            },
            ToolDefinition {
                name: "updateInputValues".to_string(),
                description: "Useful when several input values of a node have to be changed".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "nodeId": { "type": "string", "description": "Id of the node owning the input values" },
                        "changedInputValues": {
                            "type": "object",
                            "additionalProperties": { "type": "number" },
                            "description": "Map of input value ids to their new values. e.g. {'slider1': 5.9, 'input2': 3}"
                        }
                    },
                    "required": ["nodeId", "changedInputValues"]
                }),
            },
        ]
    }
}

fn decode<T: serde::de::DeserializeOwned>(tool: &str, arguments: &str) -> Result<T, CommandError> {
    serde_json::from_str(arguments).map_err(|e| CommandError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
