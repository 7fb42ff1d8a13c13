use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::example::LabeledExample;
use crate::error::{NetError, Result};

/// Ordered queue of labeled examples that the trainer walks once per epoch.
///
/// `clear_tests_queue` rewinds the queue and, unless shuffling is disabled,
/// reorders the examples with the set's own generator.
#[derive(Debug, Clone)]
pub struct TestSet {
    examples: Vec<LabeledExample>,
    cursor: usize,
    shuffle: bool,
    rng: StdRng,
}

impl TestSet {
    /// Shuffling test set. A fixed `seed` makes the sequence of orders
    /// reproducible.
    pub fn new(examples: Vec<LabeledExample>, seed: Option<u64>) -> Result<TestSet> {
        if examples.is_empty() {
            return Err(NetError::EmptyTestSet);
        }

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut set = TestSet { examples, cursor: 0, shuffle: true, rng };
        set.examples.shuffle(&mut set.rng);
        Ok(set)
    }

    /// Test set that keeps `examples` in the given order on every pass.
    pub fn ordered(examples: Vec<LabeledExample>) -> Result<TestSet> {
        if examples.is_empty() {
            return Err(NetError::EmptyTestSet);
        }

        Ok(TestSet {
            examples,
            cursor: 0,
            shuffle: false,
            rng: StdRng::seed_from_u64(0),
        })
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn size(&self) -> usize {
        self.examples.len()
    }

    /// Examples in their current order.
    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn has_next_test(&self) -> bool {
        self.cursor < self.examples.len()
    }

    /// Next example of the current pass, `None` once the pass is exhausted.
    pub fn next_test(&mut self) -> Option<&LabeledExample> {
        let example = self.examples.get(self.cursor)?;
        self.cursor += 1;
        Some(example)
    }

    /// Up to `batch_size` consecutive examples, `None` once the pass is
    /// exhausted. The final batch may be shorter.
    pub fn next_batch(&mut self, batch_size: usize) -> Option<&[LabeledExample]> {
        if batch_size == 0 || !self.has_next_test() {
            return None;
        }

        let start = self.cursor;
        let end = (start + batch_size).min(self.examples.len());
        self.cursor = end;
        Some(&self.examples[start..end])
    }

    /// Index of the example most recently returned in this pass.
    pub fn current_test_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Rewinds to the start of the queue, reshuffling if enabled.
    pub fn clear_tests_queue(&mut self) {
        self.cursor = 0;
        if self.shuffle {
            self.examples.shuffle(&mut self.rng);
        }
    }

    /// Checks every example against a network's input and output sizes.
    pub fn check_shapes(&self, input_size: usize, output_size: usize) -> Result<()> {
        for example in &self.examples {
            if example.input.len() != input_size {
                return Err(NetError::InputSizeMismatch {
                    expected: input_size,
                    actual: example.input.len(),
                });
            }
            if example.correct_output.len() != output_size {
                return Err(NetError::OutputSizeMismatch {
                    expected: output_size,
                    actual: example.correct_output.len(),
                });
            }
        }
        Ok(())
    }
}
