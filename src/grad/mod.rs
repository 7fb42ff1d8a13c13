pub mod engine;
pub mod jacobian;
pub mod kind;

pub use engine::{output_error_gradient, NetworkGradient};
pub use jacobian::StaircaseJacobian;
pub use kind::ParameterKind;
