//! Start-up configuration.
//!
//! Every tunable of the viewer lives in [`ViewerConfig`]. The defaults
//! reproduce the stock scene; the robot defaults to the metal one unless the
//! crate is built with the `cardboard-robot` feature.

use anyhow::Context as _;
use cgmath::Point3;

use crate::{camera::CameraParams, robots::RobotKind};

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub robot: RobotKind,
    pub camera: CameraParams,
    pub near: f32,
    pub far: f32,
    pub light: LightConfig,
    /// Length of each axis line. `None` hides the axes.
    pub axes_size: Option<f32>,
    /// sRGB hex clear colour.
    pub clear_colour: u32,
    /// Id of the page element the canvas is appended to.
    pub container_id: &'static str,
    pub title: &'static str,
    /// Initial inner size of the native window.
    pub window_size: [u32; 2],
}

/// Spotlight settings. Angles are in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightConfig {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// sRGB hex colour, only the lowest 24 bits are used.
    pub colour: u32,
    pub intensity: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    /// Cut-off range; zero means unlimited.
    pub distance: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 30.0, 30.0),
            target: Point3::new(0.0, 0.0, 0.0),
            colour: 0xfffffff,
            intensity: 1800.0,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            decay: 2.0,
            distance: 0.0,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            robot: RobotKind::default(),
            camera: CameraParams::default(),
            near: 0.1,
            far: 1000.0,
            light: LightConfig::default(),
            axes_size: Some(18.0),
            clear_colour: 0x104040,
            container_id: "WebGL-output",
            title: "Robots",
            window_size: [1024, 768],
        }
    }
}

impl ViewerConfig {
    /// Resolve the page element named by `container_id` through `lookup`.
    ///
    /// A page without that element cannot host the viewer, so this is an error
    /// rather than a fallback to some other element.
    pub fn find_container<E>(&self, lookup: impl FnOnce(&str) -> Option<E>) -> anyhow::Result<E> {
        lookup(self.container_id)
            .with_context(|| format!("the page has no #{} element", self.container_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_is_looked_up_by_id() {
        let config = ViewerConfig::default();
        let found = config.find_container(|id| Some(id.to_string()));
        assert_eq!(found.unwrap(), "WebGL-output");
    }

    #[test]
    fn missing_container_is_an_error() {
        let config = ViewerConfig::default();
        let err = config.find_container(|_| None::<()>).unwrap_err();
        assert!(err.to_string().contains("#WebGL-output"), "{}", err);
    }
}
