pub mod increment;
pub mod sgd;

pub use increment::ParameterIncrement;
pub use sgd::Sgd;
