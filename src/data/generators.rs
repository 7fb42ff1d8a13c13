use crate::data::answer::AnswerFunction;
use crate::data::example::LabeledExample;

/// Every bitmask of length `input_size`, labeled by `answer`.
///
/// Masks come out in counter order with bit 0 as the least significant bit,
/// starting at `1 0 0 ...` and ending with the all-zero mask.
pub fn all_bitmasks(input_size: usize, answer: AnswerFunction) -> Vec<LabeledExample> {
    all_bitmasks_except(input_size, answer, &[])
}

/// Like [`all_bitmasks`], minus any mask listed in `excluded`.
pub fn all_bitmasks_except(
    input_size: usize,
    answer: AnswerFunction,
    excluded: &[Vec<f64>],
) -> Vec<LabeledExample> {
    let count = 1usize << input_size;
    let mut bitmask = vec![0.0; input_size];
    let mut examples = Vec::with_capacity(count);

    for _ in 0..count {
        increment(&mut bitmask);
        if excluded.iter().any(|e| e == &bitmask) {
            continue;
        }
        examples.push(LabeledExample::new(bitmask.clone(), answer.apply(&bitmask)));
    }

    examples
}

/// The `input_size + 1` masks `0 0 ... 0`, `1 0 ... 0`, `1 1 0 ... 0`, ...,
/// `1 1 ... 1`.
pub fn prefix_bitmasks(input_size: usize, answer: AnswerFunction) -> Vec<LabeledExample> {
    (0..=input_size)
        .map(|ones| {
            let mask: Vec<f64> = (0..input_size)
                .map(|j| if j < ones { 1.0 } else { 0.0 })
                .collect();
            let label = answer.apply(&mask);
            LabeledExample::new(mask, label)
        })
        .collect()
}

/// The single all-ones mask.
pub fn all_ones(input_size: usize, answer: AnswerFunction) -> Vec<LabeledExample> {
    let mask = vec![1.0; input_size];
    let label = answer.apply(&mask);
    vec![LabeledExample::new(mask, label)]
}

fn increment(bitmask: &mut [f64]) {
    for bit in bitmask.iter_mut() {
        if *bit == 0.0 {
            *bit = 1.0;
            return;
        }
        *bit = 0.0;
    }
}
