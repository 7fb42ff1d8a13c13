use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pure labeling functions used to synthesize bit-pattern datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerFunction {
    /// Output equals input.
    Identity,
    /// One-hot of the number of ones in the input; `input_size + 1` outputs.
    OneQuantity,
    /// First input element only.
    Projection,
}

impl AnswerFunction {
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        match self {
            AnswerFunction::Identity => input.to_vec(),
            AnswerFunction::OneQuantity => {
                let mut output = vec![0.0; input.len() + 1];
                let ones = input.iter().filter(|&&x| x == 1.0).count();
                output[ones] = 1.0;
                output
            }
            AnswerFunction::Projection => input.iter().take(1).copied().collect(),
        }
    }

    pub fn output_size(&self, input_size: usize) -> usize {
        match self {
            AnswerFunction::Identity => input_size,
            AnswerFunction::OneQuantity => input_size + 1,
            AnswerFunction::Projection => 1,
        }
    }
}

impl FromStr for AnswerFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(AnswerFunction::Identity),
            "one_quantity" => Ok(AnswerFunction::OneQuantity),
            "projection" => Ok(AnswerFunction::Projection),
            other => Err(format!("unknown answer function '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_quantity_counts_ones() {
        let out = AnswerFunction::OneQuantity.apply(&[1.0, 0.0, 1.0, 1.0]);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(out.len(), AnswerFunction::OneQuantity.output_size(4));
    }

    #[test]
    fn test_projection_and_identity() {
        assert_eq!(AnswerFunction::Projection.apply(&[0.3, 0.7]), vec![0.3]);
        assert_eq!(AnswerFunction::Identity.apply(&[0.3, 0.7]), vec![0.3, 0.7]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("one_quantity".parse::<AnswerFunction>(), Ok(AnswerFunction::OneQuantity));
        assert!("digits".parse::<AnswerFunction>().is_err());
    }
}
