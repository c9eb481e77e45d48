use swctree::model::{Cable, InvariantViolation, Location, Morphology, Point, SegmentTree};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y, 0.0, 1.0)
}

#[test]
fn test_y_from_two_roots() {
    // Two segments leaving the same root sample
    let mut tree = SegmentTree::new();
    tree.append(None, p(0.0, 0.0), p(-1.0, 1.0), 3).unwrap();
    tree.append(None, p(0.0, 0.0), p(1.0, 1.0), 3).unwrap();

    let morph = Morphology::new(tree);
    assert_eq!(morph.num_branches(), 2);
    assert_eq!(morph.branch_parent(0).unwrap(), None);
    assert_eq!(morph.branch_parent(1).unwrap(), None);
    assert!(morph.branch_children(0).unwrap().is_empty());
    assert_eq!(morph.root_branches(), vec![0, 1]);
}

#[test]
fn test_chains_merge_into_branches() {
    //      0
    //      1
    //    2   4
    //    3   5
    //        6
    let mut tree = SegmentTree::new();
    let s0 = tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 1).unwrap();
    let s1 = tree.append_distal(Some(s0), p(0.0, 2.0), 3).unwrap();
    let s2 = tree.append_distal(Some(s1), p(-1.0, 3.0), 3).unwrap();
    tree.append_distal(Some(s2), p(-2.0, 4.0), 3).unwrap();
    let s4 = tree.append_distal(Some(s1), p(1.0, 3.0), 3).unwrap();
    let s5 = tree.append_distal(Some(s4), p(2.0, 4.0), 3).unwrap();
    tree.append_distal(Some(s5), p(3.0, 5.0), 3).unwrap();

    let morph = Morphology::from(tree);
    assert_eq!(morph.num_branches(), 3);
    assert_eq!(morph.branch_segments(0).unwrap(), &[0, 1]);
    assert_eq!(morph.branch_segments(1).unwrap(), &[2, 3]);
    assert_eq!(morph.branch_segments(2).unwrap(), &[4, 5, 6]);
    assert_eq!(morph.branch_children(0).unwrap(), &[1, 2]);
    assert_eq!(morph.branch_parent(2).unwrap(), Some(0));
    assert_eq!(morph.terminal_branches(), vec![1, 2]);
    assert_eq!(morph.segment_branch(5).unwrap(), 2);
}

#[test]
fn test_every_segment_in_one_branch() {
    let mut tree = SegmentTree::new();
    let root = tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 1).unwrap();
    for i in 0..4 {
        let mut last = tree.append_distal(Some(root), p(i as f64, 2.0), 3).unwrap();
        for j in 0..i {
            last = tree.append_distal(Some(last), p(i as f64, 3.0 + j as f64), 3).unwrap();
        }
    }

    let morph = Morphology::new(tree.clone());
    let mut seen: Vec<usize> = (0..morph.num_branches())
        .flat_map(|b| morph.branch_segments(b).unwrap().to_vec())
        .collect();
    seen.sort();
    assert_eq!(seen, (0..tree.size()).collect::<Vec<_>>());
    assert_eq!(morph.segments(), tree.segments());
    assert_eq!(morph.segment_parents(), tree.parents());
}

#[test]
fn test_out_of_range_branch() {
    let mut tree = SegmentTree::new();
    tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 1).unwrap();
    let morph = Morphology::new(tree);

    let expected = InvariantViolation::BranchOutOfBounds { branch: 1, num_branches: 1 };
    assert_eq!(morph.branch_parent(1), Err(expected.clone()));
    assert_eq!(morph.branch_children(1), Err(expected.clone()));
    assert_eq!(morph.branch_segments(1), Err(expected));
}

#[test]
fn test_locations_and_cables() {
    let mut tree = SegmentTree::new();
    tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 3).unwrap();
    let morph = Morphology::new(tree);

    let location = Location::new(0, 0.3).unwrap();
    assert_eq!((location.branch(), location.pos()), (0, 0.3));
    assert!(morph.validate_location(&location).is_ok());
    assert!(morph.validate_location(&Location::new(4, 0.3).unwrap()).is_err());

    let cable = Cable::new(0, 0.1, 0.9).unwrap();
    assert_eq!((cable.branch(), cable.prox(), cable.dist()), (0, 0.1, 0.9));
    assert!(morph.validate_cable(&cable).is_ok());

    assert_eq!(
        Location::new(0, 1.5),
        Err(InvariantViolation::InvalidLocation { branch: 0, pos: 1.5 })
    );
    assert!(matches!(
        Cable::new(2, -0.5, 0.5),
        Err(InvariantViolation::InvalidCable { branch: 2, .. })
    ));
}

#[test]
fn test_display() {
    let mut tree = SegmentTree::new();
    let a = tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 3).unwrap();
    tree.append_distal(Some(a), p(1.0, 2.0), 3).unwrap();
    tree.append_distal(Some(a), p(-1.0, 2.0), 3).unwrap();

    let text = Morphology::new(tree).to_string();
    assert!(text.starts_with("morphology with 3 branches:"));
    assert!(text.contains("[1] parent 0"));
}
