mod auth_extractor;
mod csrf;
mod tracing_layer;
mod metrics_layer;

pub use auth_extractor::*;
pub use csrf::*;
pub use tracing_layer::*;
pub use metrics_layer::*;
