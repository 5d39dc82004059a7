use super::Updater;

/// Overwrites the accumulator with the contribution.
///
/// This is the default: a store left unconfigured behaves as a plain
/// shared cache. Accumulation is opt-in through a custom updater.
#[derive(Debug, Default)]
pub struct Assign;

impl Updater for Assign {
    fn merge(&self, contribution: &[f32], accum: &mut [f32]) {
        accum.copy_from_slice(contribution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_overwrites() {
        let mut accum = [1., 2.];
        Assign.merge(&[3., 4.], &mut accum);
        assert_eq!(accum, [3., 4.]);
    }
}
