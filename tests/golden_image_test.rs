#![cfg(feature = "integration-tests")]

mod common;

use robot_viewer::{
    RobotKind, ViewerConfig,
    context::Context,
    panel::overlay::SliderOverlay,
    render::{Renderer, WgpuRenderer},
    scene::{Viewer, camera_panel},
};

const SIZE: u32 = 256;

fn clear_pixel() -> image::Rgba<u8> {
    image::Rgba([0x10, 0x40, 0x40, 0xff])
}

fn close_to(pixel: &image::Rgba<u8>, expected: &image::Rgba<u8>) -> bool {
    pixel
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, b)| a.abs_diff(*b) <= 2)
}

fn headless_viewer(robot: RobotKind) -> (tokio::runtime::Runtime, Viewer<WgpuRenderer>) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let ctx = runtime
        .block_on(Context::headless(SIZE, SIZE))
        .expect("headless GPU context");
    let config = ViewerConfig {
        robot,
        axes_size: None,
        ..ViewerConfig::default()
    };
    (runtime, Viewer::new(&config, WgpuRenderer::new(ctx)))
}

fn robot_pixels(image: &image::RgbaImage) -> usize {
    let clear = clear_pixel();
    image.pixels().filter(|p| !close_to(p, &clear)).count()
}

#[test]
fn should_render_clear_colour_around_the_robot() {
    for robot in [RobotKind::Metal, RobotKind::Cardboard] {
        let (runtime, mut viewer) = headless_viewer(robot);
        viewer.render();
        assert_eq!(viewer.frames(), 1);

        let image = runtime
            .block_on(viewer.renderer.capture())
            .expect("read back the frame");
        assert_eq!(image.dimensions(), (SIZE, SIZE));
        for (x, y) in [(0, 0), (SIZE - 1, 0), (0, SIZE - 1), (SIZE - 1, SIZE - 1)] {
            assert!(
                close_to(image.get_pixel(x, y), &clear_pixel()),
                "{:?} corner is {:?}",
                robot,
                image.get_pixel(x, y)
            );
        }
        assert!(robot_pixels(&image) > 100, "{:?} robot is not visible", robot);
    }
}

#[test]
fn wider_fov_shrinks_the_robot() {
    let (runtime, mut viewer) = headless_viewer(RobotKind::Metal);
    let mut panel = camera_panel(&viewer);
    viewer.render();
    let narrow = runtime.block_on(viewer.renderer.capture()).expect("capture");

    assert!(panel.set_by_name(&mut viewer, "fov", 100.0));
    let wide = runtime.block_on(viewer.renderer.capture()).expect("capture");
    assert!(robot_pixels(&wide) < robot_pixels(&narrow));
}

#[test]
fn slider_overlay_is_drawn_over_the_scene() {
    let (runtime, mut viewer) = headless_viewer(RobotKind::Metal);
    let panel = camera_panel(&viewer);
    let overlay = SliderOverlay::default();
    let vertices = overlay.vertices(&panel, &viewer, [SIZE, SIZE]);
    viewer.renderer.set_overlay(&vertices);
    viewer.render();
    let image = runtime.block_on(viewer.renderer.capture()).expect("capture");

    // fov starts at 60 of 10..100, a bit over half of the first track is filled
    let track = overlay.track(0, [SIZE, SIZE]);
    let y = (track.y + track.height / 2.0) as u32;
    let filled = image.get_pixel(track.x as u32 + 4, y);
    let empty = image.get_pixel((track.x + track.width) as u32 - 4, y);
    assert!(close_to(filled, &image::Rgba([0x2c, 0xc9, 0xff, 0xff])), "{:?}", filled);
    assert!(close_to(empty, &image::Rgba([0x50, 0x50, 0x50, 0xff])), "{:?}", empty);
}
