//! Numeric parameter panel.
//!
//! A [`ParamPanel<T>`] is a list of slider-like [`Controller`]s, each bound to
//! one `f32` inside some target `T` through a getter/setter pair. The panel
//! never owns the target: every call that reads or writes values borrows it,
//! which lets a change callback take `&mut T` and e.g. re-render.
//!
//! Setting a value clamps it to the controller's range, ignores non-finite
//! input and fires the change callback only when the stored value actually
//! changes.

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(not(target_arch = "wasm32"))]
pub mod overlay;

use winit::keyboard::KeyCode;

/// Number of implicit steps across a controller's range.
const STEPS_PER_RANGE: f32 = 1000.0;
/// Steps moved by an arrow key.
const ARROW_STEPS: f32 = 10.0;
/// Steps moved by PageUp/PageDown.
const PAGE_STEPS: f32 = 100.0;

pub type Getter<T> = fn(&T) -> f32;
pub type Setter<T> = fn(&mut T, f32);

pub struct Controller<T> {
    name: &'static str,
    min: f32,
    max: f32,
    step: f32,
    initial: f32,
    get: Getter<T>,
    set: Setter<T>,
    on_change: Option<Box<dyn FnMut(&mut T)>>,
}

impl<T> Controller<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn value(&self, target: &T) -> f32 {
        (self.get)(target)
    }

    /// Position of the current value within the range, 0 at `min` and 1 at `max`.
    pub fn fraction(&self, target: &T) -> f32 {
        if self.max > self.min {
            ((self.value(target) - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Override the implicit step of `(max - min) / 1000`.
    pub fn with_step(&mut self, step: f32) -> &mut Self {
        if step.is_finite() && step > 0.0 {
            self.step = step;
        }
        self
    }

    /// Callback run after every effective value change.
    pub fn on_change(&mut self, f: impl FnMut(&mut T) + 'static) -> &mut Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Returns whether the target was modified.
    pub fn set_value(&mut self, target: &mut T, value: f32) -> bool {
        if !value.is_finite() {
            log::debug!("{}: ignoring non-finite input {}", self.name, value);
            return false;
        }
        let value = value.clamp(self.min, self.max);
        if (self.get)(target) == value {
            return false;
        }
        (self.set)(target, value);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(target);
        }
        true
    }
}

impl<T> std::fmt::Debug for Controller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("initial", &self.initial)
            .finish()
    }
}

/// Keyboard-level commands the panel understands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelInput {
    FocusNext,
    FocusPrev,
    /// Move the focused controller by this many steps.
    Nudge(f32),
    Reset,
}

impl PanelInput {
    pub fn from_key(key: KeyCode, shift: bool) -> Option<Self> {
        match key {
            KeyCode::Tab if shift => Some(PanelInput::FocusPrev),
            KeyCode::Tab => Some(PanelInput::FocusNext),
            KeyCode::ArrowUp | KeyCode::ArrowRight => Some(PanelInput::Nudge(ARROW_STEPS)),
            KeyCode::ArrowDown | KeyCode::ArrowLeft => Some(PanelInput::Nudge(-ARROW_STEPS)),
            KeyCode::PageUp => Some(PanelInput::Nudge(PAGE_STEPS)),
            KeyCode::PageDown => Some(PanelInput::Nudge(-PAGE_STEPS)),
            KeyCode::KeyR => Some(PanelInput::Reset),
            _ => None,
        }
    }
}

pub struct ParamPanel<T: 'static> {
    title: String,
    controllers: Vec<Controller<T>>,
    focus: usize,
}

impl<T: 'static> ParamPanel<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            controllers: Vec::new(),
            focus: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Bind a new controller to the value `get` reads from `target`.
    ///
    /// Reversed bounds are swapped. A controller with a non-finite bound is
    /// not added and `None` is returned.
    pub fn add(
        &mut self,
        target: &T,
        name: &'static str,
        min: f32,
        max: f32,
        get: Getter<T>,
        set: Setter<T>,
    ) -> Option<&mut Controller<T>> {
        if !min.is_finite() || !max.is_finite() {
            log::warn!(
                "panel {}: skipping {} with bounds {}..{}",
                self.title,
                name,
                min,
                max
            );
            return None;
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.controllers.push(Controller {
            name,
            min,
            max,
            step: (max - min) / STEPS_PER_RANGE,
            initial: get(target),
            get,
            set,
            on_change: None,
        });
        self.controllers.last_mut()
    }

    pub fn controllers(&self) -> &[Controller<T>] {
        &self.controllers
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.controllers.iter().position(|c| c.name == name)
    }

    pub fn value(&self, target: &T, index: usize) -> Option<f32> {
        self.controllers.get(index).map(|c| c.value(target))
    }

    /// Set controller `index`. Returns whether the target changed.
    pub fn set_value(&mut self, target: &mut T, index: usize, value: f32) -> bool {
        match self.controllers.get_mut(index) {
            Some(controller) => controller.set_value(target, value),
            None => {
                log::warn!("panel {}: no controller at index {}", self.title, index);
                false
            }
        }
    }

    /// Set controller `index` to the point `fraction` of the way from its
    /// `min` to its `max`.
    pub fn set_fraction(&mut self, target: &mut T, index: usize, fraction: f32) -> bool {
        let value = match self.controllers.get(index) {
            Some(c) => c.min + fraction.clamp(0.0, 1.0) * (c.max - c.min),
            None => return false,
        };
        self.set_value(target, index, value)
    }

    pub fn set_by_name(&mut self, target: &mut T, name: &str, value: f32) -> bool {
        match self.index_of(name) {
            Some(index) => self.set_value(target, index, value),
            None => {
                log::warn!("panel {}: unknown controller {}", self.title, name);
                false
            }
        }
    }

    /// Restore every controller's initial value. Returns how many changed.
    pub fn reset(&mut self, target: &mut T) -> usize {
        self.controllers
            .iter_mut()
            .map(|c| {
                let initial = c.initial;
                c.set_value(target, initial)
            })
            .filter(|changed| *changed)
            .count()
    }

    pub fn focused(&self) -> Option<&Controller<T>> {
        self.controllers.get(self.focus)
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focus(&mut self, index: usize) {
        if index < self.controllers.len() {
            self.focus = index;
        }
    }

    pub fn focus_next(&mut self) {
        if !self.controllers.is_empty() {
            self.focus = (self.focus + 1) % self.controllers.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.controllers.is_empty() {
            self.focus = (self.focus + self.controllers.len() - 1) % self.controllers.len();
        }
    }

    /// Move the focused controller by `steps` of its step size.
    pub fn nudge(&mut self, target: &mut T, steps: f32) -> bool {
        let focus = self.focus;
        match self.controllers.get_mut(focus) {
            Some(controller) => {
                let value = controller.value(target) + steps * controller.step;
                controller.set_value(target, value)
            }
            None => false,
        }
    }

    /// Returns whether any value changed.
    pub fn apply(&mut self, target: &mut T, input: PanelInput) -> bool {
        match input {
            PanelInput::FocusNext => {
                self.focus_next();
                false
            }
            PanelInput::FocusPrev => {
                self.focus_prev();
                false
            }
            PanelInput::Nudge(steps) => self.nudge(target, steps),
            PanelInput::Reset => self.reset(target) > 0,
        }
    }

    /// One-line rendering of all values, the focused one in brackets.
    pub fn summary(&self, target: &T) -> String {
        let values: Vec<String> = self
            .controllers
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let entry = format!("{} {:.1}", c.name, c.value(target));
                if i == self.focus {
                    format!("[{}]", entry)
                } else {
                    entry
                }
            })
            .collect();
        format!("{}: {}", self.title, values.join("  "))
    }
}

impl<T: 'static> std::fmt::Debug for ParamPanel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamPanel")
            .field("title", &self.title)
            .field("controllers", &self.controllers)
            .field("focus", &self.focus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        value: f32,
        changes: u32,
    }

    fn panel(target: &Target) -> ParamPanel<Target> {
        let mut panel = ParamPanel::new("test");
        if let Some(c) = panel.add(target, "value", -10.0, 10.0, |t| t.value, |t, v| t.value = v) {
            c.on_change(|t: &mut Target| t.changes += 1);
        }
        panel
    }

    #[test]
    fn step_defaults_to_a_thousandth_of_the_range() {
        let target = Target::default();
        let panel = panel(&target);
        assert!((panel.controllers()[0].step() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn swapped_bounds_are_normalised() {
        let target = Target::default();
        let mut panel = ParamPanel::new("swapped");
        panel.add(&target, "v", 5.0, -5.0, |t: &Target| t.value, |t, v| t.value = v);
        assert_eq!(panel.controllers()[0].min(), -5.0);
        assert_eq!(panel.controllers()[0].max(), 5.0);
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let mut target = Target::default();
        let mut panel = ParamPanel::new("broken");
        assert!(
            panel
                .add(&target, "nan", f32::NAN, 1.0, |t: &Target| t.value, |t, v| t.value = v)
                .is_none()
        );
        assert!(
            panel
                .add(&target, "inf", 0.0, f32::INFINITY, |t: &Target| t.value, |t, v| t.value = v)
                .is_none()
        );
        assert!(panel.is_empty());
        assert!(!panel.set_value(&mut target, 0, 0.5));
    }

    #[test]
    fn fractions_map_onto_the_range() {
        let mut target = Target::default();
        let mut panel = panel(&target);
        assert_eq!(panel.controllers()[0].fraction(&target), 0.5);
        assert!(panel.set_fraction(&mut target, 0, 0.75));
        assert_eq!(target.value, 5.0);
        assert!(panel.set_fraction(&mut target, 0, 3.0));
        assert_eq!(target.value, 10.0);
        assert_eq!(target.changes, 2);
        assert!(!panel.set_fraction(&mut target, 7, 0.5));
    }

    #[test]
    fn arrow_keys_map_to_nudges() {
        assert_eq!(
            PanelInput::from_key(KeyCode::ArrowUp, false),
            Some(PanelInput::Nudge(10.0))
        );
        assert_eq!(
            PanelInput::from_key(KeyCode::Tab, true),
            Some(PanelInput::FocusPrev)
        );
        assert_eq!(PanelInput::from_key(KeyCode::KeyQ, false), None);
    }
}
