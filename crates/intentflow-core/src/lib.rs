//! Core types for intentflow: intents, records, routing configuration and
//! the output topology derived from it.

pub mod config;
pub mod error;
pub mod intent;
pub mod record;
pub mod topology;

pub use config::{FallbackPolicy, RouterConfig};
pub use error::ConfigurationError;
pub use intent::{IntentSpec, ParameterSpec, ParameterType};
pub use record::Record;
pub use topology::{ChannelDescriptor, OutputTopology};
