//! Loader for handwritten-digit datasets stored as plain CSV.
//!
//! Format:
//! - one example per line: `label,p1,p2,...,pk`
//! - `label` is a digit in `0..=9` and becomes a one-hot vector of width 10
//! - pixels are in `[0, 255]` and are rescaled to `[0, 1]`
//! - blank lines are ignored; a first line whose label cell is not a number
//!   is treated as a header

use crate::data::example::LabeledExample;
use crate::error::{NetError, Result};

pub const DIGIT_CLASSES: usize = 10;

/// Reads and parses a digit CSV file.
pub fn load_digits(path: &str) -> Result<Vec<LabeledExample>> {
    let text = std::fs::read_to_string(path)?;
    parse_digits(&text)
}

/// Parses digit CSV text. Every row must have the same number of pixels.
pub fn parse_digits(text: &str) -> Result<Vec<LabeledExample>> {
    let mut examples = Vec::new();
    let mut pixel_count: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut cells = line.split(',').map(str::trim);
        let label_cell = cells.next().unwrap_or("");

        let label: usize = match label_cell.parse() {
            Ok(l) => l,
            Err(_) if idx == 0 => continue,
            Err(_) => {
                return Err(NetError::Dataset {
                    line: line_no,
                    message: format!("label '{}' is not a digit", label_cell),
                })
            }
        };
        if label >= DIGIT_CLASSES {
            return Err(NetError::Dataset {
                line: line_no,
                message: format!("label {} is outside 0..{}", label, DIGIT_CLASSES),
            });
        }

        let pixels = cells
            .map(|cell| {
                cell.parse::<f64>().map(|p| p / 255.0).map_err(|_| NetError::Dataset {
                    line: line_no,
                    message: format!("pixel '{}' is not a number", cell),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if pixels.is_empty() {
            return Err(NetError::Dataset {
                line: line_no,
                message: "row has no pixel values".to_string(),
            });
        }
        match pixel_count {
            Some(n) if n != pixels.len() => {
                return Err(NetError::Dataset {
                    line: line_no,
                    message: format!("expected {} pixels, found {}", n, pixels.len()),
                })
            }
            _ => pixel_count = Some(pixels.len()),
        }

        let mut one_hot = vec![0.0; DIGIT_CLASSES];
        one_hot[label] = 1.0;
        examples.push(LabeledExample::new(pixels, one_hot));
    }

    Ok(examples)
}
