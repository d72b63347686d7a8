mod common;

use cgmath::{EuclideanSpace, InnerSpace, Point3};
use common::test_utils::{RecordingRenderer, assert_close, assert_vec_close, recording_viewer};
use robot_viewer::{
    RobotKind, ViewerConfig,
    data_structures::material::Color,
    panel::overlay::SliderOverlay,
    render::Renderer,
    scene::{Viewer, camera_panel},
};

#[test]
fn scene_is_assembled_from_the_config() {
    let viewer = recording_viewer();
    assert_eq!(viewer.scene.axes.map(|a| a.size), Some(18.0));
    assert_eq!(viewer.scene.children.len(), 1);
    assert_eq!(viewer.scene.lights.len(), 1);
    let light = viewer.scene.lights[0];
    assert_eq!(light.position, Point3::new(0.0, 30.0, 30.0));
    assert_eq!(light.intensity, 1800.0);
    assert_eq!(light.color, Color::WHITE);
    assert_eq!(viewer.renderer.clear_colour, Some(Color::from_hex(0x104040)));
    assert_close(viewer.camera.aspect, 800.0 / 600.0);
    assert_eq!(viewer.camera.near, 0.1);
    assert_eq!(viewer.camera.far, 1000.0);
    // nothing is drawn until asked
    assert!(viewer.renderer.frames.is_empty());
}

#[test]
fn render_applies_params_and_draws_once() {
    let mut viewer = recording_viewer();
    viewer.render();
    assert_eq!(viewer.renderer.frames.len(), 1);
    assert_eq!(viewer.frames(), 1);

    let frame = viewer.renderer.last();
    assert_eq!(frame.fov, 60.0);
    assert_eq!(frame.position, Point3::new(30.0, 20.0, 40.0));
    assert_vec_close(frame.direction, (Point3::origin() - frame.position).normalize());
    assert_eq!(frame.meshes, 11);
    assert_eq!(frame.lights, 1);
}

#[test]
fn rendering_twice_is_idempotent() {
    let mut viewer = recording_viewer();
    viewer.render();
    viewer.render();
    let frames = &viewer.renderer.frames;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], frames[1]);
}

#[test]
fn fov_change_reaches_the_next_draw() {
    let mut viewer = recording_viewer();
    let mut panel = camera_panel(&viewer);
    viewer.render();
    let before = viewer.renderer.last().projection;

    assert!(panel.set_by_name(&mut viewer, "fov", 90.0));
    assert_eq!(viewer.camera.fov, 90.0);
    assert_eq!(viewer.renderer.frames.len(), 2);
    let after = viewer.renderer.last().projection;
    assert_ne!(before, after);
    // 1 / tan(45°)
    assert_close(after.y.y, 1.0);
}

#[test]
fn moving_the_camera_keeps_it_aimed_at_the_origin() {
    let mut viewer = recording_viewer();
    let mut panel = camera_panel(&viewer);

    assert!(panel.set_by_name(&mut viewer, "x", -50.0));
    assert_eq!(viewer.camera.position.x, -50.0);
    let frame = viewer.renderer.last();
    assert_vec_close(frame.direction, (Point3::origin() - frame.position).normalize());

    let origin = frame.view_proj * Point3::origin().to_homogeneous();
    assert_close(origin.x / origin.w, 0.0);
    assert_close(origin.y / origin.w, 0.0);
}

#[test]
fn every_effective_change_renders_exactly_once() {
    let mut viewer = recording_viewer();
    let mut panel = camera_panel(&viewer);

    panel.set_by_name(&mut viewer, "y", 10.0);
    panel.set_by_name(&mut viewer, "z", -10.0);
    assert_eq!(viewer.renderer.frames.len(), 2);

    // unchanged and NaN: no draws
    panel.set_by_name(&mut viewer, "z", -10.0);
    panel.set_by_name(&mut viewer, "y", f32::NAN);
    assert_eq!(viewer.renderer.frames.len(), 2);

    panel.set_by_name(&mut viewer, "y", 500.0);
    assert_eq!(viewer.params.y, 50.0);
    // clamps to the same maximum
    panel.set_by_name(&mut viewer, "y", 80.0);
    assert_eq!(viewer.renderer.frames.len(), 3);
}

#[test]
fn panel_reset_restores_the_start_view() {
    let mut viewer = recording_viewer();
    let mut panel = camera_panel(&viewer);
    viewer.render();
    let start = viewer.renderer.last().clone();

    panel.set_by_name(&mut viewer, "fov", 25.0);
    panel.set_by_name(&mut viewer, "x", 0.0);
    assert_eq!(panel.reset(&mut viewer), 2);
    assert_eq!(viewer.renderer.last(), &start);
}

#[test]
fn resize_updates_the_projection() {
    let mut viewer = recording_viewer();
    viewer.resize(1000, 500);
    assert_eq!(viewer.renderer.resizes, vec![[1000, 500]]);
    assert_close(viewer.camera.aspect, 2.0);
    viewer.render();
    let projection = viewer.renderer.last().projection;
    assert_close(projection.x.x * 2.0, projection.y.y);

    viewer.resize(0, 300);
    assert_eq!(viewer.renderer.resizes.len(), 1);
}

#[test]
fn lost_surface_is_reconfigured() {
    let mut viewer = recording_viewer();
    viewer.renderer.fail_next = Some(wgpu::SurfaceError::Lost);
    viewer.render();
    assert!(viewer.renderer.frames.is_empty());
    assert_eq!(viewer.frames(), 0);
    assert_eq!(viewer.renderer.resizes, vec![[800, 600]]);

    viewer.render();
    assert_eq!(viewer.frames(), 1);
}

#[test]
fn outdated_surface_is_reconfigured() {
    let mut viewer = recording_viewer();
    viewer.resize(640, 480);
    viewer.renderer.fail_next = Some(wgpu::SurfaceError::Outdated);
    viewer.render();
    assert_eq!(viewer.frames(), 0);
    assert_eq!(viewer.renderer.resizes, vec![[640, 480], [640, 480]]);

    viewer.render();
    assert_eq!(viewer.frames(), 1);
    assert_close(viewer.renderer.last().aspect, 640.0 / 480.0);
}

#[test]
fn dragging_a_slider_track_moves_the_camera() {
    let mut viewer = recording_viewer();
    let mut panel = camera_panel(&viewer);
    let overlay = SliderOverlay::default();
    let size = viewer.renderer.size;

    // right end of the second row, the x slider
    let track = overlay.track(1, size);
    let cursor = [track.x + track.width, track.y + track.height / 2.0];
    let (index, fraction) = overlay.hit(panel.len(), size, cursor).expect("on a track");
    assert_eq!(index, 1);
    panel.focus(index);
    assert!(panel.set_fraction(&mut viewer, index, fraction));
    assert_eq!(viewer.params.x, 50.0);
    assert_eq!(viewer.renderer.frames.len(), 1);
    assert_close(viewer.renderer.last().position.x, 50.0);

    let vertices = overlay.vertices(&panel, &viewer, size);
    viewer.renderer.set_overlay(&vertices);
    // four tracks, each filled above its minimum
    assert_eq!(viewer.renderer.overlay.len(), 4 * 12);
}

#[test]
fn other_draw_errors_skip_the_frame() {
    let mut viewer = recording_viewer();
    viewer.renderer.fail_next = Some(wgpu::SurfaceError::Timeout);
    viewer.render();
    assert_eq!(viewer.frames(), 0);
    assert!(viewer.renderer.resizes.is_empty());
}

#[test]
fn cardboard_scene_draws_nine_meshes() {
    let config = ViewerConfig {
        robot: RobotKind::Cardboard,
        axes_size: None,
        ..ViewerConfig::default()
    };
    let mut viewer = Viewer::new(&config, RecordingRenderer::new(640, 480));
    assert!(viewer.scene.axes.is_none());
    viewer.render();
    assert_eq!(viewer.renderer.last().meshes, 9);
}
