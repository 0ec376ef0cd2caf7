//! Feed-forward network types and parameter marshaling.

pub mod activation;
pub mod feed_forward;

pub use activation::Activation;
pub use feed_forward::{FeedForwardNetwork, ForwardTrace, Layer};
