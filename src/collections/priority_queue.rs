//! FIFO-per-priority queue with a "restricted push" invariant.
//!
//! The push-relabel discharge loop always activates a node at a height
//! that's either the height just popped, or one less (see `maxflow`): a
//! node's excess either gets pushed to a neighbor at `height - 1` (which
//! therefore gets activated at that height), or the node itself gets
//! relabeled and re-pushed at its own new height, which can only have grown.
//! That restriction — every `push(e, p)` satisfies `p >= current_max - 1` —
//! means we never need a full priority heap: within one priority parity,
//! pushes arrive in non-decreasing order, so a plain stack is already
//! sorted. Two stacks (even/odd priority) and a max-of-two-tops comparison
//! give O(1) `push`/`pop`.

/// A priority queue that only ever receives pushes within one of the
/// current maximum priority (a "restricted push"). See the module docs for
/// why this allows an O(1) amortized implementation.
#[derive(Debug, Clone)]
pub struct PriorityQueueRp<T> {
    // Indexed by priority parity: stacks[0] holds even priorities,
    // stacks[1] holds odd priorities. Within a parity bucket, the
    // restricted-push invariant guarantees priorities are non-decreasing
    // from bottom to top, so each bucket is itself a monotone stack.
    stacks: [Vec<(i64, T)>; 2],
}

impl<T> Default for PriorityQueueRp<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueueRp<T> {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            stacks: [Vec::new(), Vec::new()],
        }
    }

    fn parity(priority: i64) -> usize {
        (priority.rem_euclid(2)) as usize
    }

    fn top_priority(&self, parity: usize) -> Option<i64> {
        self.stacks[parity].last().map(|&(p, _)| p)
    }

    /// The maximum priority currently present, if any.
    pub fn current_max_priority(&self) -> Option<i64> {
        match (self.top_priority(0), self.top_priority(1)) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    /// True when no elements remain.
    pub fn is_empty(&self) -> bool {
        self.stacks[0].is_empty() && self.stacks[1].is_empty()
    }

    /// Push `element` at `priority`.
    ///
    /// Debug builds assert the restricted-push invariant: `priority` must
    /// be at least `current_max_priority() - 1`. A violation here means a
    /// bug in the caller's push-relabel loop, not a recoverable condition.
    pub fn push(&mut self, element: T, priority: i64) {
        debug_assert!(
            self.current_max_priority()
                .map_or(true, |max| priority >= max - 1),
            "PriorityQueueRp: restricted-push invariant violated (priority {} < current_max - 1)",
            priority,
        );
        self.stacks[Self::parity(priority)].push((priority, element));
    }

    /// Pop an element of maximum priority. Among equal priorities, returns
    /// the most recently pushed (LIFO) — guaranteed since equal priorities
    /// share a parity bucket and that bucket is a plain stack.
    pub fn pop(&mut self) -> Option<T> {
        let parity = match (self.top_priority(0), self.top_priority(1)) {
            (Some(a), Some(b)) => {
                if a >= b {
                    0
                } else {
                    1
                }
            }
            (Some(_), None) => 0,
            (None, Some(_)) => 1,
            (None, None) => return None,
        };
        self.stacks[parity].pop().map(|(_, e)| e)
    }

    /// Drop all elements.
    pub fn clear(&mut self) {
        self.stacks[0].clear();
        self.stacks[1].clear();
    }
}
