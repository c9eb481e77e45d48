use swctree::model::{InvariantViolation, Point, Segment, SegmentTree};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y, 0.0, 1.0)
}

/// Binary tree of the given depth, grown breadth first
fn binary_tree(depth: usize) -> SegmentTree {
    let mut tree = SegmentTree::new();
    let mut frontier = vec![tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 3).unwrap()];
    for level in 1..depth {
        let mut next = Vec::new();
        for &parent in &frontier {
            for dx in [-1.0, 1.0] {
                let dist = p(dx * level as f64, level as f64 + 1.0);
                next.push(tree.append_distal(Some(parent), dist, 3).unwrap());
            }
        }
        frontier = next;
    }
    tree
}

#[test]
fn test_sizes_agree() {
    let tree = binary_tree(5);
    assert_eq!(tree.size(), 31);
    assert_eq!(tree.segments().len(), tree.size());
    assert_eq!(tree.parents().len(), tree.size());
    assert!(!tree.is_empty());
}

#[test]
fn test_parents_precede_children() {
    let tree = binary_tree(6);
    for (i, parent) in tree.parents().iter().enumerate() {
        if let Some(p) = parent {
            assert!(*p < i, "segment {i} has parent {p}");
        }
    }
}

#[test]
fn test_failed_append_leaves_tree_unchanged() {
    let mut tree = binary_tree(3);
    let before = tree.clone();

    let err = tree.append(Some(7), p(0.0, 0.0), p(1.0, 1.0), 3).unwrap_err();
    assert_eq!(err, InvariantViolation::InvalidSegmentParent { parent: 7, size: 7 });
    assert!(tree.append_distal(Some(100), p(1.0, 1.0), 3).is_err());
    assert_eq!(tree, before);
}

#[test]
fn test_append_distal_needs_parent() {
    let mut tree = SegmentTree::new();
    assert_eq!(
        tree.append_distal(None, p(0.0, 1.0), 3),
        Err(InvariantViolation::RootWithoutProximal)
    );
    assert!(tree.is_empty());
}

#[test]
fn test_append_distal_copies_parent_end() {
    let mut tree = SegmentTree::new();
    let a = tree.append(None, p(0.0, 0.0), Point::new(0.0, 2.0, 0.0, 0.7), 2).unwrap();
    let b = tree.append_distal(Some(a), p(0.0, 4.0), 2).unwrap();

    assert_eq!(tree[b], Segment::new(Point::new(0.0, 2.0, 0.0, 0.7), p(0.0, 4.0), 2));
    assert_eq!(tree.parent(b), Some(Some(a)));
    assert_eq!(tree.parent(a), Some(None));
    assert_eq!(tree.parent(5), None);
    assert!(tree.segment(5).is_none());
}

#[test]
fn test_multiple_roots() {
    let mut tree = SegmentTree::with_capacity(4);
    tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 2).unwrap();
    tree.append(None, p(0.0, 0.0), p(0.0, -1.0), 3).unwrap();
    tree.reserve(10);
    tree.append_distal(Some(1), p(0.0, -2.0), 3).unwrap();

    assert_eq!(tree.num_roots(), 2);
    assert_eq!(tree.parents(), &[None, None, Some(1)]);
    assert!(tree.is_terminal(0));
    assert!(!tree.is_fork(1));
}

#[test]
fn test_children_of_binary_tree() {
    let tree = binary_tree(3);
    assert_eq!(tree.children(0), vec![1, 2]);
    assert_eq!(tree.children(1), vec![3, 4]);
    assert!(tree.children(6).is_empty());
    assert!(tree.children(42).is_empty());
    assert!(tree.children(usize::MAX).is_empty());
    assert!(!tree.is_fork(usize::MAX));
    assert_eq!(tree.child_counts(), vec![2, 2, 2, 0, 0, 0, 0]);
}
