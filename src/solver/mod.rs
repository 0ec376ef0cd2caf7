//! Dense linear-system solving for the damped Gauss-Newton update.

pub mod lu;

pub use lu::LuDecomposition;
