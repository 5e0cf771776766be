use std::cell::RefCell;
use std::rc::Rc;

use stack_core::config::SceneConfig;
use stack_core::params::ParamKey;
use stack_core::resources::{BackendEvent, GeometryBackend, GeometryId, NullBackend};
use stack_core::shapes::mesh::MeshData;
use stack_core::shapes::{Orientation, ShapeId};
use stack_core::{BackendError, SceneError, StackedScene};

const EPS: f32 = 1e-5;

fn new_scene() -> StackedScene<NullBackend> {
    StackedScene::new(SceneConfig::default(), NullBackend::new()).expect("scene should build")
}

fn handle(scene: &StackedScene<NullBackend>, shape: ShapeId) -> GeometryId {
    *scene.object(shape).geometry().expect("shape has geometry")
}

#[test]
fn test_initial_stack() {
    let scene = new_scene();
    assert_eq!(scene.objects().len(), 6);
    assert_eq!(scene.backend().live_count(), 6, "one geometry per object");
    assert!(scene.seam_error() < EPS, "initial stack has seam error {}", scene.seam_error());

    let bottom = scene.object(ShapeId::CylinderSmall).bottom();
    assert!((bottom - -0.25).abs() < EPS, "stack starts at {} instead of the ground", bottom);
    assert!((scene.position_y(ShapeId::Ground) - -0.25).abs() < EPS);
    assert!((scene.stack_top() - 1.82).abs() < EPS, "stack top {}", scene.stack_top());

    assert_eq!(scene.object(ShapeId::CylinderSmall).orientation, Orientation::Lying);
    assert_eq!(scene.object(ShapeId::Cone).orientation, Orientation::Inverted);
    assert_eq!(scene.draw_items().count(), 6);
}

#[test]
fn test_initial_parameters() {
    let scene = new_scene();
    for key in ParamKey::ALL {
        assert_eq!(scene.parameter(key), key.spec().initial, "{} starts off its initial value", key);
        assert_eq!(scene.object(key.shape()).primitive.dimension(), key.spec().initial);
    }
}

#[test]
fn test_small_cylinder_growth() {
    let mut scene = new_scene();
    let before: Vec<f32> = ShapeId::STACK.iter().map(|&s| scene.position_y(s)).collect();
    let old = handle(&scene, ShapeId::CylinderSmall);
    scene.backend_mut().clear_events();

    let report = scene
        .on_parameter_change(ParamKey::CylinderSmallRadius, 0.6)
        .expect("change should apply");
    assert!((report.delta - 0.1).abs() < EPS, "delta {}", report.delta);
    assert!(report.rebuilt);

    // Old geometry released before the replacement is uploaded.
    let events = scene.backend().events();
    assert_eq!(events.len(), 2, "events: {:?}", events);
    assert_eq!(events[0], BackendEvent::Release { id: old });
    let new = match &events[1] {
        BackendEvent::Upload { id, label, .. } => {
            assert_eq!(label, "Cylinder Small");
            *id
        }
        other => panic!("expected upload, got {:?}", other),
    };
    assert!(!scene.backend().is_live(old));
    assert_eq!(handle(&scene, ShapeId::CylinderSmall), new);
    assert_eq!(scene.backend().live_count(), 6);

    let mesh = scene.backend().mesh(new).expect("new mesh stored");
    let (lo, hi) = mesh.bounds().expect("mesh not empty");
    assert!((hi.x - lo.x - 1.2).abs() < EPS, "new cylinder diameter {}", hi.x - lo.x);

    for (i, &shape) in ShapeId::STACK.iter().enumerate().skip(1) {
        let shift = scene.position_y(shape) - before[i];
        assert!((shift - 0.2).abs() < EPS, "{} moved {} instead of 0.2", shape, shift);
        assert!((report.offset_of(shape) - 0.2).abs() < EPS);
    }
    let own = scene.position_y(ShapeId::CylinderSmall) - before[0];
    assert!((own - 0.1).abs() < EPS, "small cylinder centre moved {}", own);
    assert!((scene.object(ShapeId::CylinderSmall).bottom() - -0.25).abs() < EPS);
    assert!(scene.seam_error() < EPS);
}

#[test]
fn test_unchanged_value_is_noop() {
    let mut scene = new_scene();
    let before: Vec<f32> = ShapeId::STACK.iter().map(|&s| scene.position_y(s)).collect();
    let old = handle(&scene, ShapeId::Cube);
    scene.backend_mut().clear_events();

    let report = scene
        .on_parameter_change(ParamKey::CubeSize, 0.25)
        .expect("change should apply");
    assert_eq!(report.delta, 0.0);
    assert!(!report.rebuilt);
    assert!(report.offsets.is_empty());
    assert!(scene.backend().events().is_empty(), "no-op touched the backend: {:?}", scene.backend().events());
    assert_eq!(handle(&scene, ShapeId::Cube), old);
    let after: Vec<f32> = ShapeId::STACK.iter().map(|&s| scene.position_y(s)).collect();
    assert_eq!(before, after);
}

#[test]
fn test_repeated_value_is_idempotent() {
    let mut scene = new_scene();
    scene.on_parameter_change(ParamKey::SphereRadius, 0.25).expect("first change");
    let positions: Vec<f32> = ShapeId::STACK.iter().map(|&s| scene.position_y(s)).collect();
    let report = scene.on_parameter_change(ParamKey::SphereRadius, 0.25).expect("second change");
    assert!(!report.rebuilt);
    let again: Vec<f32> = ShapeId::STACK.iter().map(|&s| scene.position_y(s)).collect();
    assert_eq!(positions, again);
}

#[test]
fn test_change_only_moves_shapes_above() {
    for key in ParamKey::ALL {
        let mut scene = new_scene();
        let spec = key.spec();
        let before: Vec<f32> = ShapeId::STACK.iter().map(|&s| scene.position_y(s)).collect();
        let extent_before = scene.object(key.shape()).vertical_extent();
        scene.on_parameter_change(key, spec.max).expect("change should apply");
        // The medium cylinder stands upright, so its radius leaves the stack height alone.
        let growth = scene.object(key.shape()).vertical_extent() - extent_before;

        let changed = key.shape() as usize;
        for (i, &shape) in ShapeId::STACK.iter().enumerate() {
            let moved = scene.position_y(shape) - before[i];
            if i < changed {
                assert!(moved.abs() < EPS, "{}: {} below moved {}", key, shape, moved);
            } else if i > changed {
                assert!(
                    (moved - growth).abs() < EPS,
                    "{}: {} moved {}, expected {}",
                    key,
                    shape,
                    moved,
                    growth
                );
            }
        }
        assert!(scene.seam_error() < EPS, "{}: seam error {}", key, scene.seam_error());
    }
}

#[test]
fn test_seams_hold_over_change_sequence() {
    let mut scene = new_scene();
    let steps = [
        (ParamKey::CylinderSmallRadius, 0.3),
        (ParamKey::SphereRadius, 0.31),
        (ParamKey::CylinderMediumRadius, 0.15),
        (ParamKey::CubeSize, 0.5),
        (ParamKey::ConeRadius, 0.3),
        (ParamKey::CylinderSmallRadius, 0.6),
        (ParamKey::SphereRadius, 0.2),
        (ParamKey::CubeSize, 0.15),
        (ParamKey::ConeRadius, 0.2),
    ];
    for (key, value) in steps {
        scene.on_parameter_change(key, value).expect("change should apply");
        assert!(scene.seam_error() < EPS, "after {} = {}: seam error {}", key, value, scene.seam_error());
        assert!((scene.object(ShapeId::CylinderSmall).bottom() - -0.25).abs() < EPS);
    }
    assert_eq!(scene.backend().live_count(), 6, "geometry leaked over the sequence");
}

#[test]
fn test_round_trip_restores_positions() {
    let mut scene = new_scene();
    let before: Vec<f32> = ShapeId::STACK.iter().map(|&s| scene.position_y(s)).collect();
    scene.on_parameter_change(ParamKey::CubeSize, 0.4).expect("grow");
    scene.on_parameter_change(ParamKey::CubeSize, 0.25).expect("shrink back");
    for (i, &shape) in ShapeId::STACK.iter().enumerate() {
        let drift = scene.position_y(shape) - before[i];
        assert!(drift.abs() < EPS, "{} drifted {}", shape, drift);
    }
}

#[test]
fn test_cone_height_tracks_radius() {
    let mut scene = new_scene();
    let top_before = scene.stack_top();
    scene.on_parameter_change(ParamKey::ConeRadius, 0.3).expect("change should apply");
    let cone = scene.object(ShapeId::Cone);
    assert!((cone.vertical_extent() - 0.3).abs() < EPS);
    assert!((scene.stack_top() - top_before - 0.1).abs() < EPS, "top moved {}", scene.stack_top() - top_before);
}

#[test]
fn test_parameter_state_records_previous() {
    let mut scene = new_scene();
    scene.on_parameter_change(ParamKey::CylinderMediumRadius, 0.3).expect("change should apply");
    let state = scene.params().state(ParamKey::CylinderMediumRadius);
    assert_eq!(state.previous, 0.5);
    assert_eq!(state.value, 0.3);
}

#[test]
fn test_invalid_values_rejected() {
    let mut scene = new_scene();
    scene.backend_mut().clear_events();
    for value in [f32::NAN, f32::INFINITY, 0.0, -0.1] {
        let err = scene
            .on_parameter_change(ParamKey::SphereRadius, value)
            .expect_err("invalid value accepted");
        assert!(
            matches!(err, SceneError::NonFinite { .. } | SceneError::NonPositive { .. }),
            "unexpected error {:?} for {}",
            err,
            value
        );
    }
    assert_eq!(scene.parameter(ParamKey::SphereRadius), 0.3);
    assert!(scene.backend().events().is_empty());
}

#[test]
fn test_set_parameter_by_id() {
    let mut scene = new_scene();
    let report = scene.set_parameter("cube.size", 0.3).expect("known id");
    assert_eq!(report.key, ParamKey::CubeSize);
    let err = scene.set_parameter("torus.radius", 0.3).expect_err("unknown id accepted");
    assert!(matches!(err, SceneError::UnknownParameter(ref id) if id == "torus.radius"));
    assert_eq!(err.to_string(), "unknown parameter `torus.radius`");
}

#[test]
fn test_failed_upload_reports_error() {
    let mut scene = new_scene();
    scene.backend_mut().fail_next_upload = Some("vertex buffer");
    let err = scene
        .on_parameter_change(ParamKey::SphereRadius, 0.25)
        .expect_err("upload failure swallowed");
    assert!(matches!(err, SceneError::Backend(_)), "unexpected error {:?}", err);
    assert!(scene.object(ShapeId::Sphere).geometry().is_none());
    assert_eq!(scene.backend().live_count(), 5, "old sphere geometry still live");
    assert_eq!(scene.draw_items().count(), 5);

    // Layout already reflects the new radius; a retry restores the geometry.
    assert!(scene.seam_error() < EPS);
    scene.on_parameter_change(ParamKey::SphereRadius, 0.26).expect("retry");
    assert_eq!(scene.backend().live_count(), 6);
}

#[test]
fn test_same_value_retry_restores_geometry() {
    let mut scene = new_scene();
    scene.backend_mut().fail_next_upload = Some("vertex buffer");
    scene
        .on_parameter_change(ParamKey::SphereRadius, 0.25)
        .expect_err("upload failure swallowed");
    assert!(scene.object(ShapeId::Sphere).geometry().is_none());

    // Dragging back onto the same slider step must bring the sphere back.
    let report = scene
        .on_parameter_change(ParamKey::SphereRadius, 0.25)
        .expect("retry should apply");
    assert_eq!(report.delta, 0.0);
    assert!(report.rebuilt, "same-value retry did not rebuild");
    assert!(report.offsets.is_empty(), "retry moved shapes: {:?}", report.offsets);

    let id = handle(&scene, ShapeId::Sphere);
    let mesh = scene.backend().mesh(id).expect("sphere mesh stored");
    let (lo, hi) = mesh.bounds().expect("mesh not empty");
    assert!((hi.x - lo.x - 0.5).abs() < EPS, "sphere diameter {}", hi.x - lo.x);
    assert_eq!(scene.backend().live_count(), 6);
    assert_eq!(scene.draw_items().count(), 6);
    assert!(scene.seam_error() < EPS);

    // With geometry restored, the same value is a no-op again.
    let report = scene
        .on_parameter_change(ParamKey::SphereRadius, 0.25)
        .expect("no-op");
    assert!(!report.rebuilt);
}

#[test]
fn test_geometry_matches_value_across_range() {
    for key in ParamKey::ALL {
        let mut scene = new_scene();
        let spec = key.spec();
        let steps = ((spec.max - spec.min) / spec.step).round() as u32;
        for i in 0..=steps {
            let value = spec.sanitize(spec.min + i as f32 * spec.step);
            scene.on_parameter_change(key, value).expect("in-range value rejected");

            let id = handle(&scene, key.shape());
            let mesh = scene.backend().mesh(id).expect("live handle has a mesh");
            let (lo, hi) = mesh.bounds().expect("mesh not empty");
            let width = hi.x - lo.x;
            let expected = match key {
                ParamKey::CubeSize => value,
                _ => 2.0 * value,
            };
            assert!(
                (width - expected).abs() < EPS,
                "{} = {}: mesh width {}, expected {}",
                key,
                value,
                width,
                expected
            );
            assert!(scene.seam_error() < EPS, "{} = {}: seam error {}", key, value, scene.seam_error());
        }
        assert_eq!(scene.backend().live_count(), 6, "{}: geometry leaked while stepping", key);
    }
}

#[test]
fn test_host_value_sanitized_onto_slider() {
    let mut scene = new_scene();
    let spec = ParamKey::CubeSize.spec();
    let value = spec.sanitize(100.0);
    assert!(spec.contains(value), "sanitized value {} outside the slider", value);

    scene.on_parameter_change(ParamKey::CubeSize, value).expect("change should apply");
    assert_eq!(scene.parameter(ParamKey::CubeSize), value);
    let mesh = scene
        .backend()
        .mesh(handle(&scene, ShapeId::Cube))
        .expect("cube mesh stored");
    let (lo, hi) = mesh.bounds().expect("mesh not empty");
    assert!((hi.x - lo.x - spec.max).abs() < EPS, "cube width {}", hi.x - lo.x);
}

#[test]
fn test_failed_construction_releases_everything() {
    // Lets the first upload through and fails the second.
    struct FailSecond {
        inner: Rc<RefCell<NullBackend>>,
        uploads: usize,
    }
    impl GeometryBackend for FailSecond {
        type Handle = GeometryId;
        fn label(&self) -> &'static str {
            "fail-second"
        }
        fn upload(&mut self, label: &str, mesh: &MeshData) -> Result<GeometryId, BackendError> {
            self.uploads += 1;
            let mut inner = self.inner.borrow_mut();
            if self.uploads == 2 {
                inner.fail_next_upload = Some("sphere");
            }
            inner.upload(label, mesh)
        }
        fn release(&mut self, handle: GeometryId) {
            self.inner.borrow_mut().release(handle)
        }
    }

    let shared = Rc::new(RefCell::new(NullBackend::new()));
    let backend = FailSecond {
        inner: shared.clone(),
        uploads: 0,
    };
    let err = StackedScene::new(SceneConfig::default(), backend)
        .err()
        .expect("construction should fail");
    assert!(matches!(err, SceneError::Backend(BackendError::Allocation("sphere"))), "unexpected error {:?}", err);
    let inner = shared.borrow();
    assert_eq!(inner.live_count(), 0, "first geometry not released after failure");
    assert_eq!(inner.events().len(), 2, "events: {:?}", inner.events());
}

#[test]
fn test_into_backend_releases_all() {
    let mut scene = new_scene();
    scene.on_parameter_change(ParamKey::CubeSize, 0.4).expect("change should apply");
    let backend = scene.into_backend();
    assert_eq!(backend.live_count(), 0, "handles left live after teardown");
    let uploads = backend
        .events()
        .iter()
        .filter(|e| matches!(e, BackendEvent::Upload { .. }))
        .count();
    let releases = backend
        .events()
        .iter()
        .filter(|e| matches!(e, BackendEvent::Release { .. }))
        .count();
    assert_eq!(uploads, 7);
    assert_eq!(uploads, releases);
}
