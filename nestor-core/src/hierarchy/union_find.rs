//! Directed union-find used to resolve chains of near-duplicate systems.
//!
//! Unlike a rank-balanced forest, every union names the surviving root: the
//! absorbed side always points at the absorbing side, so the representative
//! of a merge chain is the topmost system that took part in it.

#[derive(Clone, Debug)]
pub(super) struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    pub(super) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn parent_of(&self, node: usize) -> usize {
        self.parent.get(node).copied().unwrap_or(node)
    }

    pub(super) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent_of(root) != root {
            root = self.parent_of(root);
        }

        while self.parent_of(node) != node {
            let parent = self.parent_of(node);
            if let Some(slot) = self.parent.get_mut(node) {
                *slot = root;
            }
            node = parent;
        }

        root
    }

    /// Whether `node` is still its own representative.
    pub(super) fn is_root(&mut self, node: usize) -> bool {
        self.find(node) == node
    }

    /// Merges the set of `absorbed` into the set of `into` and returns the
    /// surviving root.
    pub(super) fn absorb(&mut self, into: usize, absorbed: usize) -> usize {
        let into = self.find(into);
        let absorbed = self.find(absorbed);
        if into != absorbed
            && let Some(slot) = self.parent.get_mut(absorbed)
        {
            *slot = into;
        }
        into
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_keeps_named_root() {
        let mut sets = DisjointSet::new(4);
        assert_eq!(sets.absorb(3, 1), 3);
        assert_eq!(sets.absorb(0, 3), 0);
        assert_eq!(sets.find(1), 0);
        assert!(sets.is_root(0));
        assert!(!sets.is_root(3));
        assert!(sets.is_root(2));
    }

    #[test]
    fn chained_absorption_resolves_to_top() {
        let mut sets = DisjointSet::new(5);
        sets.absorb(3, 4);
        sets.absorb(2, 3);
        sets.absorb(1, 2);
        assert_eq!(sets.find(4), 1);
        assert_eq!(sets.absorb(4, 0), 1);
        assert_eq!(sets.find(0), 1);
    }

    #[test]
    fn out_of_range_nodes_are_singletons() {
        let mut sets = DisjointSet::new(1);
        assert_eq!(sets.find(9), 9);
    }
}
