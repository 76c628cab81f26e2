pub mod agent_loop;
pub mod bridge;
pub mod dispatcher;
pub mod error_classifier;
pub mod prompt;

pub use agent_loop::{AgentLoop, AgentOutcome, ITERATION_LIMIT_MESSAGE};
pub use bridge::{Bridge, RunStatus};
pub use dispatcher::CommandDispatcher;
pub use error_classifier::{
    ErrorClassifier, AUTHENTICATION_ERROR_TAG, AUTHENTICATION_MESSAGE, FALLBACK_MESSAGE,
};
pub use prompt::PromptTemplate;
