/// Identifies one compute device bound to a store at attach time.
///
/// The number of bound devices defines the aggregation round size: one
/// contribution per device completes a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device(pub usize);
