pub mod network;
pub mod spec;

pub use network::{LayerTrace, Network};
pub use spec::NetworkSpec;
