pub mod cli;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod expressions;
pub mod node_registry;
pub mod order;
pub mod parameters;
pub mod stream;

pub use credentials::{AuthenticatingClient, PagarMeApi, PagarMeClient};
pub use error::NodeError;
pub use executor::{ExecutionItem, ExecutionPolicy, OrderExecutor};
pub use parameters::NodeParameters;
pub use stream::{PagarMeNode, StreamNode};
