use std::ops::{Index, IndexMut};

/// A structural link: the slot index of a child or parent, if any.
pub(crate) type Link = Option<usize>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) height: i8,
    pub(crate) deleted: bool,
}

impl<K, V> Node<K, V> {
    fn new(key: K, val: V) -> Self {
        Node {
            key,
            val,
            left: None,
            right: None,
            parent: None,
            height: 1,
            deleted: false,
        }
    }
}

#[derive(Clone)]
struct Slot<K, V> {
    // bumped every time the slot is vacated, so stale handles can tell; 64
    // bits so that a slot recycled by an insert/erase loop never wraps
    gen: u64,
    node: Option<Node<K, V>>,
}

/// The store that owns every node of a map, live or tombstoned.
///
/// Nodes are addressed by slot index.  A slot index is only meaningful
/// together with the slot's generation: once a node is destroyed its slot
/// may be handed to a new node, and the generation tells the two apart.
#[derive(Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    occupied: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            occupied: 0,
        }
    }

    /// Allocates a detached node of height 1 and returns its slot.
    pub(crate) fn construct(&mut self, key: K, val: V) -> usize {
        let node = Some(Node::new(key, val));
        self.occupied += 1;
        match self.free.pop() {
            Some(i) => {
                self.slots[i].node = node;
                i
            }
            None => {
                self.slots.push(Slot { gen: 0, node });
                self.slots.len() - 1
            }
        }
    }

    /// Releases a single node and hands back its contents.
    ///
    /// The caller must have unlinked the node: nothing in the tree may still
    /// point at slot `i`.
    pub(crate) fn destroy(&mut self, i: usize) -> Node<K, V> {
        let slot = &mut self.slots[i];
        let node = match slot.node.take() {
            Some(n) => n,
            None => panic!("double destroy of node slot {i}"),
        };
        slot.gen = slot.gen.wrapping_add(1);
        self.free.push(i);
        self.occupied -= 1;
        node
    }

    /// Releases every node of the subtree rooted at `root`, children before
    /// parents, and returns how many were released.
    pub(crate) fn force_destroy_subtree(&mut self, root: Link) -> usize {
        let mut destroyed = 0;
        let mut work: Vec<(usize, bool)> = root.into_iter().map(|i| (i, false)).collect();

        while let Some((i, children_done)) = work.pop() {
            if children_done {
                self.destroy(i);
                destroyed += 1;
            } else {
                work.push((i, true));
                let n = &self[i];
                work.extend(n.right.map(|r| (r, false)));
                work.extend(n.left.map(|l| (l, false)));
            }
        }

        destroyed
    }

    /// Flags the node as logically deleted without releasing it.
    pub(crate) fn mark_deleted(&mut self, i: usize) {
        self[i].deleted = true;
    }

    /// Clears all three structural links of the node.
    pub(crate) fn detach(&mut self, i: usize) {
        let n = &mut self[i];
        n.left = None;
        n.right = None;
        n.parent = None;
    }

    pub(crate) fn get(&self, i: usize) -> Option<&Node<K, V>> {
        self.slots.get(i).and_then(|s| s.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, i: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(i).and_then(|s| s.node.as_mut())
    }

    /// Current generation of slot `i`.
    pub(crate) fn gen(&self, i: usize) -> u64 {
        self.slots[i].gen
    }

    /// Looks up slot `i` if it still holds the node it held at generation
    /// `gen`.
    pub(crate) fn resolve(&self, i: usize, gen: u64) -> Option<&Node<K, V>> {
        self.slots
            .get(i)
            .filter(|s| s.gen == gen)
            .and_then(|s| s.node.as_ref())
    }

    pub(crate) fn resolve_mut(&mut self, i: usize, gen: u64) -> Option<&mut Node<K, V>> {
        self.slots
            .get_mut(i)
            .filter(|s| s.gen == gen)
            .and_then(|s| s.node.as_mut())
    }

    /// Number of slots holding a node (live or tombstoned).
    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    /// Descends left from `i` as far as possible.
    pub(crate) fn min(&self, mut i: usize) -> usize {
        while let Some(l) = self[i].left {
            i = l;
        }
        i
    }

    /// Descends right from `i` as far as possible.
    pub(crate) fn max(&self, mut i: usize) -> usize {
        while let Some(r) = self[i].right {
            i = r;
        }
        i
    }

    /// The in-order next node, or `None` at the end of the order.
    pub(crate) fn successor(&self, i: usize) -> Link {
        if let Some(r) = self[i].right {
            return Some(self.min(r));
        }

        // climb until we arrive from a left subtree
        let mut curr = i;
        while let Some(p) = self[curr].parent {
            if self.is_left_child(curr) {
                return Some(p);
            }
            curr = p;
        }
        None
    }

    /// The in-order previous node, or `None` at the start of the order.
    pub(crate) fn predecessor(&self, i: usize) -> Link {
        if let Some(l) = self[i].left {
            return Some(self.max(l));
        }

        let mut curr = i;
        while let Some(p) = self[curr].parent {
            if self.is_right_child(curr) {
                return Some(p);
            }
            curr = p;
        }
        None
    }

    pub(crate) fn is_left_child(&self, i: usize) -> bool {
        self[i].parent.is_some_and(|p| self[p].left == Some(i))
    }

    pub(crate) fn is_right_child(&self, i: usize) -> bool {
        self[i].parent.is_some_and(|p| self[p].right == Some(i))
    }
}

impl<K, V> Index<usize> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, i: usize) -> &Self::Output {
        match self.get(i) {
            Some(n) => n,
            None => panic!("dangling node link to slot {i}"),
        }
    }
}

impl<K, V> IndexMut<usize> for Arena<K, V> {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match self.get_mut(i) {
            Some(n) => n,
            None => panic!("dangling node link to slot {i}"),
        }
    }
}
