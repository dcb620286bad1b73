use super::{NodeHandle, NodeId};

/// In-place quicksort, ascending by `key`.
///
/// The last element is the pivot. Two cursors walk towards each other,
/// swapping out-of-place pairs, and the pivot is finally swapped into the
/// slot where they met. Only the smaller side is sorted recursively; the
/// larger one is handled by the loop, so the call depth stays logarithmic
/// even on already-sorted input.
pub fn quicksort_by_key<T, K, F>(mut data: &mut [T], key: F)
where
    K: Ord,
    F: Fn(&T) -> K + Copy,
{
    while data.len() >= 2 {
        let pivot = partition(data, key);
        let (lower, upper) = std::mem::take(&mut data).split_at_mut(pivot);
        let upper = &mut upper[1..];
        if lower.len() < upper.len() {
            quicksort_by_key(lower, key);
            data = upper;
        } else {
            quicksort_by_key(upper, key);
            data = lower;
        }
    }
}

/// Returns the final index of the pivot.
fn partition<T, K, F>(data: &mut [T], key: F) -> usize
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let right = data.len() - 1;
    let mut i = 0;
    let mut j = right;

    while i < j {
        while i < j && key(&data[i]) <= key(&data[right]) {
            i += 1;
        }
        while i < j && key(&data[j]) >= key(&data[right]) {
            j -= 1;
        }
        if i != j {
            data.swap(i, j);
        }
    }

    if i != right {
        data.swap(i, right);
    }
    i
}

/// A snapshot of a directory's children, sorted ascending by id.
///
/// Binary search by id is only sound on sorted input, so this type is the
/// only place it is offered. The snapshot does not follow later changes to
/// the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedChildren {
    entries: Vec<(NodeId, NodeHandle)>,
}

impl SortedChildren {
    pub(super) fn from_unsorted(mut entries: Vec<(NodeId, NodeHandle)>) -> Self {
        quicksort_by_key(&mut entries, |(id, _)| *id);
        Self { entries }
    }

    pub fn find_by_id(&self, id: NodeId) -> Option<NodeHandle> {
        self.entries
            .binary_search_by_key(&id, |(entry_id, _)| *entry_id)
            .ok()
            .map(|index| self.entries[index].1)
    }

    #[cfg(test)]
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}
