//! Structural audit of an [`AvlMap`].
//!
//! The map's operations keep the tree ordered and balanced.  The functions
//! here re-derive the tree's shape from scratch, without trusting the heights
//! the nodes store, and report the first broken invariant.  They walk the
//! whole tree and are meant for tests:
//!
//! ```
//! use avl_cursor_map::{verify, AvlMap};
//!
//! let mut m: AvlMap<u32, ()> = (0..100).map(|k| (k, ())).collect();
//! m.erase(&50);
//!
//! let mut log = String::new();
//! assert!(verify::verify(&m, &mut log));
//! assert!(log.is_empty());
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{Debug, Write};

use thiserror::Error;

use crate::{AvlMap, Compare};

/// A broken tree invariant.  Keys are rendered with their `Debug` form.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    /// The root has a parent link.
    #[error("root {key} has parent link")]
    RootHasParent {
        /// The root's key.
        key: String,
    },

    /// A link points at a slot that holds no node.
    #[error("node {key} links to a released slot")]
    Dangling {
        /// The key of the node holding the link.
        key: String,
    },

    /// A node's parent does not list it as a child.
    #[error("parent {parent} does not link back to child {child}")]
    ParentLink {
        /// The parent's key.
        parent: String,
        /// The child's key.
        child: String,
    },

    /// A child's parent link does not point at the node holding the child.
    #[error("child {child} of {parent} links to parent {found}")]
    ChildLink {
        /// The key of the node holding the child link.
        parent: String,
        /// The child's key.
        child: String,
        /// The key the child's parent link points at, or "none".
        found: String,
    },

    /// A node is reachable along two paths.
    #[error("node {key} is reachable twice")]
    Shared {
        /// The node's key.
        key: String,
    },

    /// An erased node is still linked into the tree.
    #[error("tombstoned node {key} is still linked")]
    Tombstone {
        /// The node's key.
        key: String,
    },

    /// An in-order walk met two keys that are not strictly increasing.
    #[error("keys out of order: {prev} before {next}")]
    Order {
        /// The earlier key.
        prev: String,
        /// The later key.
        next: String,
    },

    /// The subtrees of a node differ in height by more than one.
    #[error("node {key} unbalanced: left height {left}, right height {right}")]
    Balance {
        /// The node's key.
        key: String,
        /// Recomputed height of the left subtree.
        left: usize,
        /// Recomputed height of the right subtree.
        right: usize,
    },

    /// A node's stored height disagrees with its recomputed height.
    #[error("node {key} stores height {stored}, actual height {actual}")]
    Height {
        /// The node's key.
        key: String,
        /// The stored height.
        stored: usize,
        /// The recomputed height.
        actual: usize,
    },

    /// The map's entry count disagrees with the number of reachable nodes.
    #[error("map reports {reported} entries, {reachable} are reachable")]
    Count {
        /// The map's `len()`.
        reported: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
}

fn show<K: Debug>(key: &K) -> String {
    format!("{key:?}")
}

/// Checks every structural invariant of `map` and returns the first
/// violation found.
pub fn check<K, V, C>(map: &AvlMap<K, V, C>) -> Result<(), Violation>
where
    K: Debug,
    C: Compare<K>,
{
    let arena = map.arena();
    let root = match map.root() {
        Some(r) => r,
        None if map.is_empty() => return Ok(()), // *** EARLY RETURN ***
        None => {
            return Err(Violation::Count {
                reported: map.len(),
                reachable: 0,
            })
        }
    };

    let node = move |i: usize| arena.get(i);
    let key_of = move |i: usize| node(i).map_or_else(|| "<released>".to_string(), |n| show(&n.key));

    let root_node = node(root).ok_or_else(|| Violation::Dangling {
        key: "<root>".to_string(),
    })?;
    if root_node.parent.is_some() {
        return Err(Violation::RootHasParent {
            key: show(&root_node.key),
        });
    }

    // links: every node is reached once, and agrees with its parent and
    // children
    let mut seen = HashMap::new();
    let mut post_order = Vec::new();
    // each entry carries the node holding the link to it, for reporting
    let mut work = vec![(root, None)];
    while let Some((i, holder)) = work.pop() {
        let n = node(i).ok_or_else(|| Violation::Dangling {
            key: holder.map_or_else(|| "<root>".to_string(), key_of),
        })?;
        if seen.insert(i, 0usize).is_some() {
            return Err(Violation::Shared { key: show(&n.key) });
        }
        if n.deleted {
            return Err(Violation::Tombstone { key: show(&n.key) });
        }

        if let Some(p) = n.parent {
            let pn = node(p).ok_or_else(|| Violation::Dangling { key: show(&n.key) })?;
            if pn.left != Some(i) && pn.right != Some(i) {
                return Err(Violation::ParentLink {
                    parent: show(&pn.key),
                    child: show(&n.key),
                });
            }
        }

        for c in [n.left, n.right].into_iter().flatten() {
            let cn = node(c).ok_or_else(|| Violation::Dangling { key: show(&n.key) })?;
            if cn.parent != Some(i) {
                return Err(Violation::ChildLink {
                    parent: show(&n.key),
                    child: show(&cn.key),
                    found: cn.parent.map_or_else(|| "none".to_string(), key_of),
                });
            }
            work.push((c, Some(i)));
        }

        post_order.push(i);
    }

    // heights, recomputed bottom-up: children were pushed after parents
    for &i in post_order.iter().rev() {
        let n = &arena[i];
        let ht = |link: Option<usize>| link.map_or(0, |c| seen[&c]);
        let (left, right) = (ht(n.left), ht(n.right));
        if left.abs_diff(right) > 1 {
            return Err(Violation::Balance {
                key: show(&n.key),
                left,
                right,
            });
        }

        let actual = left.max(right) + 1;
        let stored = n.height.max(0) as usize;
        if stored != actual {
            return Err(Violation::Height {
                key: show(&n.key),
                stored,
                actual,
            });
        }
        seen.insert(i, actual);
    }

    // order, by an in-order walk that does not use parent links
    let cmp = map.comparator();
    let mut prev: Option<usize> = None;
    let mut spine = Vec::new();
    let mut curr = Some(root);
    loop {
        while let Some(i) = curr {
            spine.push(i);
            curr = arena[i].left;
        }
        let Some(i) = spine.pop() else { break };
        if let Some(p) = prev {
            if cmp.compare(&arena[p].key, &arena[i].key) != Ordering::Less {
                return Err(Violation::Order {
                    prev: key_of(p),
                    next: key_of(i),
                });
            }
        }
        prev = Some(i);
        curr = arena[i].right;
    }

    if seen.len() != map.len() {
        return Err(Violation::Count {
            reported: map.len(),
            reachable: seen.len(),
        });
    }

    Ok(())
}

/// Audits `map`, writing the first violation found to `sink`.
///
/// Returns true if the tree is sound, including when it is empty.
pub fn verify<K, V, C, W>(map: &AvlMap<K, V, C>, sink: &mut W) -> bool
where
    K: Debug,
    C: Compare<K>,
    W: Write,
{
    match check(map) {
        Ok(()) => true,
        Err(v) => {
            warn_log!(violation = %v, "tree invariant violated");
            // the sink is best effort; the verdict is the return value
            let _ = writeln!(sink, "{v}");
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_tree_passes() {
        let m: AvlMap<u8, ()> = AvlMap::new();
        let mut log = String::new();
        assert!(verify(&m, &mut log));
        assert!(log.is_empty());
    }

    #[test]
    fn violation_messages() {
        let v = Violation::Balance {
            key: "7".to_string(),
            left: 3,
            right: 1,
        };
        assert_eq!(v.to_string(), "node 7 unbalanced: left height 3, right height 1");

        let v = Violation::Count {
            reported: 2,
            reachable: 1,
        };
        assert_eq!(v.to_string(), "map reports 2 entries, 1 are reachable");
    }

    //     2
    //    / \
    //   1   3
    fn three() -> AvlMap<u32, ()> {
        let mut m = AvlMap::new();
        for k in [2, 1, 3] {
            m.insert(k, ());
        }
        m
    }

    // (root, left child, right child) slots
    fn slots(m: &AvlMap<u32, ()>) -> (usize, usize, usize) {
        let r = m.root().unwrap();
        let a = m.arena();
        (r, a[r].left.unwrap(), a[r].right.unwrap())
    }

    fn verdict(m: &AvlMap<u32, ()>) -> (bool, String) {
        let mut log = String::new();
        let ok = verify(m, &mut log);
        (ok, log)
    }

    #[test]
    fn sound_tree_passes() {
        assert_eq!(verdict(&three()), (true, String::new()));
    }

    #[test]
    fn broken_parent_link() {
        let mut m = three();
        let (_, l, _) = slots(&m);
        m.arena_mut()[l].parent = None;
        assert_eq!(
            verdict(&m),
            (false, "child 1 of 2 links to parent none\n".to_string())
        );
    }

    #[test]
    fn child_missing_from_parent() {
        let mut m = three();
        let (r, l, rt) = slots(&m);
        // 1 hangs under 3 but still names 2 as its parent
        m.arena_mut()[r].left = None;
        m.arena_mut()[rt].left = Some(l);
        assert_eq!(
            verdict(&m),
            (false, "child 1 of 3 links to parent 2\n".to_string())
        );
    }

    #[test]
    fn released_link() {
        let mut m = three();
        let (r, _, _) = slots(&m);
        m.arena_mut()[r].right = Some(99);
        assert_eq!(
            verdict(&m),
            (false, "node 2 links to a released slot\n".to_string())
        );
    }

    #[test]
    fn out_of_order_key() {
        let mut m = three();
        let (_, _, rt) = slots(&m);
        m.arena_mut()[rt].key = 0;
        assert_eq!(
            check(&m),
            Err(Violation::Order {
                prev: "2".to_string(),
                next: "0".to_string(),
            })
        );
        assert_eq!(
            verdict(&m),
            (false, "keys out of order: 2 before 0\n".to_string())
        );
    }

    #[test]
    fn wrong_stored_height() {
        let mut m = three();
        let (r, _, _) = slots(&m);
        m.arena_mut()[r].height = 5;
        assert_eq!(
            verdict(&m),
            (false, "node 2 stores height 5, actual height 2\n".to_string())
        );
    }

    #[test]
    fn unbalanced_subtree() {
        // move 3 under 1 as 0, leaving 2 with a left subtree of height 2
        // and no right subtree; stored heights are kept consistent
        let mut m = three();
        let (r, l, rt) = slots(&m);
        let a = m.arena_mut();
        a[r].right = None;
        a[rt].key = 0;
        a[rt].parent = Some(l);
        a[l].left = Some(rt);
        a[l].height = 2;
        a[r].height = 3;
        assert_eq!(
            verdict(&m),
            (
                false,
                "node 2 unbalanced: left height 2, right height 0\n".to_string()
            )
        );
    }

    #[test]
    fn linked_tombstone() {
        let mut m = three();
        let (_, _, rt) = slots(&m);
        m.arena_mut().mark_deleted(rt);
        assert_eq!(
            verdict(&m),
            (false, "tombstoned node 3 is still linked\n".to_string())
        );
    }

    #[test]
    fn count_mismatch() {
        let mut m = three();
        *m.len_mut() = 4;
        assert_eq!(
            verdict(&m),
            (false, "map reports 4 entries, 3 are reachable\n".to_string())
        );
    }

    #[test]
    fn order_follows_comparator() {
        let mut m = AvlMap::with_comparator(|a: &u8, b: &u8| b.cmp(a));
        for k in 0..20 {
            m.insert(k, ());
        }
        assert_eq!(check(&m), Ok(()));
    }
}
