pub mod answer;
pub mod csv;
pub mod example;
pub mod generators;
pub mod test_set;

pub use answer::AnswerFunction;
pub use example::LabeledExample;
pub use test_set::TestSet;
