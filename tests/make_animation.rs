use eigenvis::animations::Segment;
use eigenvis::request::{parse_matrix, parse_vectors};
use eigenvis::{make_animation, Error, ShapeError, Timeline, TransformMatrix, TransformScene};

fn rows(values: &[&[f64]]) -> Vec<Vec<f64>> {
    values.iter().map(|r| r.to_vec()).collect()
}

#[test]
fn wrong_row_count_fails_before_any_backend_call() {
    for matrix in [
        rows(&[]),
        rows(&[&[1.0, 0.0]]),
        rows(&[&[1.0, 0.0], &[0.0, 1.0], &[0.0, 0.0]]),
    ] {
        let mut timeline = Timeline::default();
        let err = make_animation(matrix, rows(&[&[1.0, 0.0]]), &mut timeline).unwrap_err();
        assert!(matches!(err, Error::Shape(ShapeError::RowCount { .. })));
        assert!(timeline.is_empty());
    }
}

#[test]
fn wrong_row_length_fails() {
    let mut timeline = Timeline::default();
    let err = make_animation(
        rows(&[&[1.0, 0.0], &[0.0]]),
        rows(&[&[1.0, 0.0]]),
        &mut timeline,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Shape(ShapeError::RowLength {
            row: 1,
            found: 1,
            expected: 2
        })
    ));
    assert!(timeline.is_empty());
}

#[test]
fn one_bad_vector_fails_the_whole_request() {
    let mut timeline = Timeline::default();
    let err = make_animation(
        rows(&[&[1.0, 0.0], &[0.0, 1.0]]),
        rows(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 2.0, 3.0]]),
        &mut timeline,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Shape(ShapeError::VectorLength { index: 2, .. })
    ));
    assert!(timeline.is_empty());
}

#[test]
fn one_drawable_per_vector_in_input_order() {
    let mut timeline = Timeline::default();
    make_animation(
        rows(&[&[2.0, 0.0], &[0.0, 1.0]]),
        rows(&[&[1.0, 0.0], &[0.0, 1.0], &[0.7, 0.7]]),
        &mut timeline,
    )
    .unwrap();

    let coords: Vec<_> = timeline
        .vectors()
        .iter()
        .map(|v| (v.coords.x, v.coords.y))
        .collect();
    assert_eq!(coords, [(1.0, 0.0), (0.0, 1.0), (0.7, 0.7)]);
    assert!(timeline.options().show_coordinates);
    assert!(!timeline.options().show_basis_vectors);
}

#[test]
fn repeated_requests_build_independent_equal_scenes() {
    let build = || {
        let mut timeline = Timeline::default();
        make_animation(
            rows(&[&[0.0, -1.0], &[1.0, 0.0]]),
            rows(&[&[1.0, 1.0], &[2.0, 0.5]]),
            &mut timeline,
        )
        .unwrap();
        timeline
    };
    let (a, b) = (build(), build());
    assert_eq!(a.vectors(), b.vectors());
    assert_eq!(a.segments(), b.segments());
    assert_eq!(a.final_matrix(), b.final_matrix());
}

#[test]
fn identity_transform_scenario() {
    let mut timeline = Timeline::default();
    make_animation(
        rows(&[&[1.0, 0.0], &[0.0, 1.0]]),
        rows(&[&[1.0, 0.0], &[0.0, 1.0]]),
        &mut timeline,
    )
    .unwrap();

    assert_eq!(timeline.vectors().len(), 2);
    let requested: Vec<_> = timeline.requested_transforms().copied().collect();
    assert_eq!(requested, [TransformMatrix::IDENTITY]);

    // transform, then the fixed two second hold
    match timeline.segments() {
        [Segment::ApplyMatrix { .. }, Segment::Wait { duration }] => assert_eq!(*duration, 2.0),
        other => panic!("unexpected segments {other:?}"),
    }
}

#[test]
fn three_column_matrix_scenario() {
    let mut timeline = Timeline::default();
    let err = make_animation(
        parse_matrix("[[1,0,0],[0,1,0]]").unwrap(),
        parse_vectors("[[1,0]]").unwrap(),
        &mut timeline,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "row 0 of the transform matrix has 3 columns, expected 2");
    assert!(timeline.is_empty());
}

#[test]
fn three_component_vector_scenario() {
    let mut timeline = Timeline::default();
    let err = make_animation(
        parse_matrix("[[2,0],[0,1]]").unwrap(),
        parse_vectors("[[1,0,0]]").unwrap(),
        &mut timeline,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "vector 0 has 3 components, expected 2");
    assert!(timeline.is_empty());
}

#[test]
fn empty_vector_list_still_animates_the_plane() {
    let mut timeline = Timeline::default();
    make_animation(rows(&[&[2.0, 1.0], &[1.0, 2.0]]), Vec::new(), &mut timeline).unwrap();
    assert!(timeline.vectors().is_empty());
    assert_eq!(timeline.requested_transforms().count(), 1);
    assert_eq!(timeline.duration(), 3.0);
}

#[test]
fn scene_keeps_the_validated_inputs() {
    let scene = TransformScene::new(
        TransformMatrix::from_rows(rows(&[&[2.0, 0.0], &[0.0, 1.0]])).unwrap(),
        &eigenvis::VectorList::from_rows(rows(&[&[0.7, 0.7]])).unwrap(),
        Default::default(),
    );
    assert_eq!(scene.matrix().rows(), [[2.0, 0.0], [0.0, 1.0]]);
    assert_eq!(scene.vectors().len(), 1);
}
