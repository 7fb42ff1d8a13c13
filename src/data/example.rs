use serde::{Deserialize, Serialize};

/// One input vector paired with the output the network should produce for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub input: Vec<f64>,
    pub correct_output: Vec<f64>,
}

impl LabeledExample {
    pub fn new(input: Vec<f64>, correct_output: Vec<f64>) -> LabeledExample {
        LabeledExample { input, correct_output }
    }
}
