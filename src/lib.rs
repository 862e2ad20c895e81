//! Run third-party transcoding plugins by id and report their results as a
//! uniform `{success, errors, data}` JSON envelope.

pub mod config;
pub mod error;
pub mod invoker;
pub mod params;
pub mod plugin;
pub mod process;
pub mod response;
pub mod utils;

pub use config::{Config, InvokerSettings, RuntimeMode};
pub use error::InvokeError;
pub use invoker::Invoker;
pub use response::FunctionResponse;
