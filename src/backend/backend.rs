/// Group membership exposed by the substrate a store attaches to.
///
/// Membership is fixed while attached; there is no mutation API. How
/// ranks are assigned is the backend's concern.
pub trait Backend: Send + Sync {
    /// Rank of this node in its group, in `[0, group_size)`.
    fn rank(&self) -> usize;

    /// The number of nodes in this group.
    fn group_size(&self) -> usize;
}
