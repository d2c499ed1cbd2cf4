/// Dense (fully connected) layer
pub mod dense;
/// Per-sample values produced by the forward pass and consumed by the backward pass
pub mod forward_trace;
/// Read-only views of layer parameters
pub mod layer_weight;

pub use dense::*;
pub use forward_trace::*;
pub use layer_weight::*;
