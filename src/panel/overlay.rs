//! On-screen sliders for the native window.
//!
//! Every controller of a [`ParamPanel`] gets a horizontal track in the
//! top-right corner of the window, filled up to its current value. The
//! focused track is drawn lighter. Layout works in window pixels with the
//! origin at the top left; the emitted triangles are in normalised device
//! coordinates.

use crate::data_structures::{material::Color, model::LineVertex};

use super::ParamPanel;

const TRACK: u32 = 0x303030;
const TRACK_FOCUSED: u32 = 0x505050;
const FILL: u32 = 0x2cc9ff;

/// Pixel rectangle, `y` growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, [px, py]: [f32; 2]) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Two counter-clockwise triangles covering the rectangle.
    fn triangles(&self, [vw, vh]: [f32; 2], color: [f32; 3]) -> [LineVertex; 6] {
        let ndc = |x: f32, y: f32| LineVertex {
            position: [x / vw * 2.0 - 1.0, 1.0 - y / vh * 2.0, 0.0],
            color,
        };
        let (left, right) = (self.x, self.x + self.width);
        let (top, bottom) = (self.y, self.y + self.height);
        [
            ndc(left, top),
            ndc(left, bottom),
            ndc(right, bottom),
            ndc(left, top),
            ndc(right, bottom),
            ndc(right, top),
        ]
    }
}

/// Layout of the slider column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderOverlay {
    pub margin: f32,
    pub width: f32,
    pub row_height: f32,
    pub gap: f32,
}

impl Default for SliderOverlay {
    fn default() -> Self {
        Self {
            margin: 12.0,
            width: 220.0,
            row_height: 14.0,
            gap: 8.0,
        }
    }
}

impl SliderOverlay {
    /// Track of row `index` in a window of `size` pixels. Narrow windows
    /// shrink the track.
    pub fn track(&self, index: usize, size: [u32; 2]) -> Rect {
        let width = self.width.min(size[0] as f32 - 2.0 * self.margin).max(0.0);
        Rect {
            x: size[0] as f32 - self.margin - width,
            y: self.margin + index as f32 * (self.row_height + self.gap),
            width,
            height: self.row_height,
        }
    }

    /// Row under `cursor` among the first `rows`, with the cursor's position
    /// along it.
    pub fn hit(&self, rows: usize, size: [u32; 2], cursor: [f32; 2]) -> Option<(usize, f32)> {
        (0..rows).find_map(|index| {
            let track = self.track(index, size);
            track
                .contains(cursor)
                .then(|| (index, along(&track, cursor[0])))
        })
    }

    /// Position of `x` along row `index`, clamped to the track's ends.
    pub fn fraction(&self, index: usize, size: [u32; 2], x: f32) -> f32 {
        along(&self.track(index, size), x)
    }

    pub fn vertices<T: 'static>(&self, panel: &ParamPanel<T>, target: &T, size: [u32; 2]) -> Vec<LineVertex> {
        if size[0] == 0 || size[1] == 0 {
            return Vec::new();
        }
        let viewport = [size[0] as f32, size[1] as f32];
        let fill = Color::from_hex(FILL).to_array();
        let mut vertices = Vec::with_capacity(panel.len() * 12);
        for (index, controller) in panel.controllers().iter().enumerate() {
            let track = self.track(index, size);
            let background = if index == panel.focus_index() {
                TRACK_FOCUSED
            } else {
                TRACK
            };
            vertices.extend(track.triangles(viewport, Color::from_hex(background).to_array()));
            let filled = Rect {
                width: track.width * controller.fraction(target),
                ..track
            };
            if filled.width > 0.0 {
                vertices.extend(filled.triangles(viewport, fill));
            }
        }
        vertices
    }
}

fn along(track: &Rect, x: f32) -> f32 {
    if track.width > 0.0 {
        ((x - track.x) / track.width).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        a: f32,
        b: f32,
    }

    fn panel(target: &Target) -> ParamPanel<Target> {
        let mut panel = ParamPanel::new("overlay");
        panel.add(target, "a", 0.0, 10.0, |t| t.a, |t, v| t.a = v);
        panel.add(target, "b", 0.0, 10.0, |t| t.b, |t, v| t.b = v);
        panel
    }

    #[test]
    fn tracks_stack_in_the_top_right_corner() {
        let overlay = SliderOverlay::default();
        let first = overlay.track(0, [800, 600]);
        assert_eq!(first, Rect { x: 568.0, y: 12.0, width: 220.0, height: 14.0 });
        assert_eq!(overlay.track(1, [800, 600]).y, 34.0);
        // too narrow for the full width
        assert_eq!(overlay.track(0, [100, 600]).width, 76.0);
    }

    #[test]
    fn hits_report_row_and_position() {
        let overlay = SliderOverlay::default();
        assert_eq!(overlay.hit(2, [800, 600], [568.0 + 55.0, 40.0]), Some((1, 0.25)));
        assert_eq!(overlay.hit(2, [800, 600], [100.0, 20.0]), None);
        // below the last row
        assert_eq!(overlay.hit(2, [800, 600], [600.0, 80.0]), None);
        assert_eq!(overlay.fraction(0, [800, 600], 2000.0), 1.0);
        assert_eq!(overlay.fraction(0, [800, 600], 0.0), 0.0);
    }

    #[test]
    fn fill_follows_the_value() {
        let target = Target { a: 5.0, b: 0.0 };
        let panel = panel(&target);
        let vertices = SliderOverlay::default().vertices(&panel, &target, [800, 600]);
        // two tracks, one fill: b sits at its minimum
        assert_eq!(vertices.len(), 18);
        let fill = Color::from_hex(FILL).to_array();
        let right = vertices
            .iter()
            .filter(|v| v.color == fill)
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        // half of the track, from x = 568 to 678 pixels
        assert!((right - (678.0 / 800.0 * 2.0 - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn focused_track_is_highlighted() {
        let target = Target::default();
        let mut panel = panel(&target);
        panel.focus(1);
        let vertices = SliderOverlay::default().vertices(&panel, &target, [800, 600]);
        let focused = Color::from_hex(TRACK_FOCUSED).to_array();
        assert!(vertices[..6].iter().all(|v| v.color != focused));
        assert!(vertices[6..12].iter().all(|v| v.color == focused));
    }

    #[test]
    fn empty_window_draws_nothing() {
        let target = Target::default();
        let panel = panel(&target);
        assert!(SliderOverlay::default().vertices(&panel, &target, [0, 600]).is_empty());
    }
}
