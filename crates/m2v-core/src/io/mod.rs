//! IO modules - side effects (network, filesystem)

pub mod mirror;
pub mod transport;
