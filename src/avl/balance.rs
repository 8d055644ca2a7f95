use super::node::{Arena, Link};

impl<K, V> Arena<K, V> {
    pub(crate) fn height(&self, link: Link) -> i8 {
        link.map_or(0, |i| self[i].height)
    }

    pub(crate) fn update_height(&mut self, link: Link) {
        if let Some(i) = link {
            let n = &self[i];
            let ht = self.height(n.left).max(self.height(n.right)) + 1;
            self[i].height = ht;
        }
    }

    // Returns the "balance factor": left height minus right height.
    pub(crate) fn balance_factor(&self, link: Link) -> i8 {
        link.map_or(0, |i| {
            let n = &self[i];
            self.height(n.left) - self.height(n.right)
        })
    }

    /// Rotates the subtree at `a` to the left and returns its new root.
    ///
    /// The caller relinks the returned node into the slot `a` occupied in
    /// its parent.
    pub(crate) fn rotate_left(&mut self, a: usize) -> usize {
        // We want the following transformation:
        //    a(x, b(y, z))   =>   b(a(x, y), z)
        // x and z retain the same parents.
        let b = match self[a].right {
            Some(b) => b,
            None => panic!("rotate_left without a right child"),
        };

        // move y from b to a
        let y = self[b].left;
        self[a].right = y;
        if let Some(y) = y {
            self[y].parent = Some(a);
        }

        // b takes a's place under a's parent
        self[b].left = Some(a);
        self[b].parent = self[a].parent;
        self[a].parent = Some(b);

        self.update_height(Some(a));
        self.update_height(Some(b));
        trace_log!(a, b, height = self[b].height, "rotate_left");
        b
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub(crate) fn rotate_right(&mut self, a: usize) -> usize {
        // We want the following transformation:
        //    a(b(x, y), z)   =>   b(x, a(y, z))
        // x and z retain the same parents.
        let b = match self[a].left {
            Some(b) => b,
            None => panic!("rotate_right without a left child"),
        };

        let y = self[b].right;
        self[a].left = y;
        if let Some(y) = y {
            self[y].parent = Some(a);
        }

        self[b].right = Some(a);
        self[b].parent = self[a].parent;
        self[a].parent = Some(b);

        self.update_height(Some(a));
        self.update_height(Some(b));
        trace_log!(a, b, height = self[b].height, "rotate_right");
        b
    }

    /// Restores the balance of the subtree at `i`, whose children are
    /// balanced and differ in height by at most 2, and returns the subtree's
    /// (possibly new) root.
    pub(crate) fn rebalance(&mut self, i: usize) -> usize {
        let bf = self.balance_factor(Some(i));

        let top = if bf > 1 {
            // left heavy; a left-right shape first becomes left-left
            if let Some(l) = self[i].left.filter(|&l| self.balance_factor(Some(l)) < 0) {
                let l = self.rotate_left(l);
                self[i].left = Some(l);
            }
            self.rotate_right(i)
        } else if bf < -1 {
            if let Some(r) = self[i].right.filter(|&r| self.balance_factor(Some(r)) > 0) {
                let r = self.rotate_right(r);
                self[i].right = Some(r);
            }
            self.rotate_left(i)
        } else {
            i
        };

        self.update_height(Some(top));
        top
    }

    /// Rebalances every node from `start` up to the root, which may change
    /// as a result and is written back to `root`.
    ///
    /// `start` must be the lowest node whose subtree changed shape.
    pub(crate) fn rebalance_path(&mut self, root: &mut Link, start: usize) {
        let mut curr = start;
        while let Some(p) = self[curr].parent {
            // the rotation may replace curr, so remember which slot it held
            let was_left = self[p].left == Some(curr);
            let top = self.rebalance(curr);
            if was_left {
                self[p].left = Some(top);
            } else {
                self[p].right = Some(top);
            }
            curr = p;
        }

        let top = self.rebalance(curr);
        trace_log!(root = top, height = self[top].height, "rebalanced to root");
        *root = Some(top);
    }
}
