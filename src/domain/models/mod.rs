pub mod command;
pub mod config;
pub mod envelope;
pub mod request;

pub use command::{
    AddEdgeArgs, AddNodeArgs, GraphCommand, RemoveByIdArgs, ToolDefinition, UpdateInputValueArgs,
    UpdateInputValuesArgs,
};
pub use config::{
    AgentConfig, ChannelConfig, Config, EarlyStopping, LogFormat, LoggingConfig, ProviderConfig,
    ReplyKind, RetryConfig, RotationPolicy, TransportConfig, TransportKind,
};
pub use envelope::Envelope;
pub use request::{Request, RequestConfig};
