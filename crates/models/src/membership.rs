use std::collections::BTreeSet;

/// Changes needed to turn one membership set into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipDelta<T> {
    /// Members present in the desired set only
    pub added: Vec<T>,
    /// Members present in the current set only
    pub removed: Vec<T>,
}

impl<T> MembershipDelta<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes the delta between the `current` and `desired` member sets.
///
/// Duplicates in either input are ignored. Both output lists are sorted.
pub fn diff<T>(current: &[T], desired: &[T]) -> MembershipDelta<T>
where
    T: Ord + Copy,
{
    let current: BTreeSet<T> = current.iter().copied().collect();
    let desired: BTreeSet<T> = desired.iter().copied().collect();

    MembershipDelta {
        added: desired.difference(&current).copied().collect(),
        removed: current.difference(&desired).copied().collect(),
    }
}
