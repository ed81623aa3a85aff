//! Daily access window evaluation.

pub mod policy;

pub use policy::{AccessWindow, WindowDecision};
