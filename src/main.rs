#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    robot_viewer::flow::run(robot_viewer::ViewerConfig::default())
}

// The library's start function drives the web build.
#[cfg(target_arch = "wasm32")]
fn main() {}
