use super::Updater;

/// Treats contributions as gradients and descends the accumulator.
#[derive(Debug)]
pub struct Sgd {
    learning_rate: f32,
}

impl Sgd {
    /// Creates a new `Sgd` updater.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    ///
    /// # Returns
    /// A new `Sgd` instance.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Updater for Sgd {
    fn merge(&self, contribution: &[f32], accum: &mut [f32]) {
        let lr = self.learning_rate;

        for (p, g) in accum.iter_mut().zip(contribution) {
            *p -= lr * g;
        }
    }
}
