//! Keyboard controls for the interactive window.
//!
//! | Key                | Action                                   |
//! |--------------------|------------------------------------------|
//! | `1`-`4`            | plot a preset                            |
//! | Up / Down          | `n` ± 0.1                                |
//! | Right / Left       | `incr` ± 0.01                            |
//! | PageUp / PageDown  | ground offset ± 0.1                      |
//! | `G`                | cycle the ground color                   |
//! | `W`                | cycle filled / wireframe / both          |
//! | `X`                | toggle the axes helper                   |
//! | Tab                | edit the expression                      |
//! | Return             | plot the edited expression               |
//! | Escape             | cancel editing, otherwise quit           |

use log::debug;

use crate::ground::next_palette_color;
use crate::plotter::{Parameter, PlotEvent, Plotter};
use crate::window::{Key, WindowEvent};

/// A slider-like range: values snap to `min + k * step` inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const HALF_WIDTH_RANGE: ParameterRange = ParameterRange::new(0.1, 3.0, 0.1);
pub const STEP_RANGE: ParameterRange = ParameterRange::new(0.01, 1.0, 0.01);
pub const GROUND_OFFSET_RANGE: ParameterRange = ParameterRange::new(-30.0, 0.0, 0.1);

impl ParameterRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Rounds to the nearest step, then clamps.
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }

    /// Moves `value` by `steps` increments.
    pub fn step_by(&self, value: f64, steps: i32) -> f64 {
        self.snap(value + f64::from(steps) * self.step)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Plot(PlotEvent),
    CycleRenderMode,
    ToggleAxes,
    Quit,
}

/// Turns window events into actions. Holds the expression editor state.
#[derive(Debug, Default)]
pub struct Controls {
    editing: bool,
    buffer: String,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while keystrokes go to the expression editor.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// The expression being edited.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn handle(&mut self, event: &WindowEvent, plotter: &Plotter) -> Option<Action> {
        match event {
            WindowEvent::Quit => Some(Action::Quit),
            WindowEvent::Resize(..) => None,
            WindowEvent::Text(text) => {
                if self.editing {
                    self.buffer.push_str(text);
                }
                None
            }
            WindowEvent::KeyDown(key) if self.editing => self.edit(*key),
            WindowEvent::KeyDown(key) => self.command(*key, plotter),
        }
    }

    fn edit(&mut self, key: Key) -> Option<Action> {
        match key {
            Key::Backspace => {
                self.buffer.pop();
                None
            }
            Key::Return => {
                self.editing = false;
                let expression = std::mem::take(&mut self.buffer);
                Some(Action::Plot(PlotEvent::PlotRequested { expression }))
            }
            Key::Escape | Key::Tab => {
                debug!("expression edit cancelled");
                self.editing = false;
                self.buffer.clear();
                None
            }
            _ => None,
        }
    }

    fn command(&mut self, key: Key, plotter: &Plotter) -> Option<Action> {
        let params = plotter.params();
        let adjust = |parameter, range: ParameterRange, steps| {
            let current = params.get(parameter);
            let value = range.step_by(current, steps);
            (value != current).then_some(Action::Plot(PlotEvent::ParameterChanged {
                parameter,
                value,
            }))
        };
        let offset = |steps| {
            let current = f64::from(plotter.scene().ground().offset());
            let value = GROUND_OFFSET_RANGE.step_by(current, steps);
            Some(Action::Plot(PlotEvent::GroundOffsetChanged(value as f32)))
        };

        match key {
            Key::Escape => Some(Action::Quit),
            Key::Digit(d) if d > 0 => Some(Action::Plot(PlotEvent::PresetSelected(
                usize::from(d) - 1,
            ))),
            Key::Up => adjust(Parameter::HalfWidth, HALF_WIDTH_RANGE, 1),
            Key::Down => adjust(Parameter::HalfWidth, HALF_WIDTH_RANGE, -1),
            Key::Right => adjust(Parameter::Step, STEP_RANGE, 1),
            Key::Left => adjust(Parameter::Step, STEP_RANGE, -1),
            Key::PageUp => offset(1),
            Key::PageDown => offset(-1),
            Key::G => Some(Action::Plot(PlotEvent::GroundColorChanged(
                next_palette_color(plotter.scene().ground().color()),
            ))),
            Key::W => Some(Action::CycleRenderMode),
            Key::X => Some(Action::ToggleAxes),
            Key::Tab => {
                self.editing = true;
                self.buffer = plotter.expression().unwrap_or_default().to_string();
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotter::PlotParams;
    use approx::assert_relative_eq;

    fn plotter() -> Plotter {
        let mut p = Plotter::new(PlotParams::new(1.0, 0.1)).unwrap();
        p.plot("x + y", p.params()).unwrap();
        p
    }

    fn key(k: Key) -> WindowEvent {
        WindowEvent::KeyDown(k)
    }

    #[test]
    fn ranges_snap_and_clamp() {
        assert_relative_eq!(HALF_WIDTH_RANGE.snap(1.04), 1.0, epsilon = 1e-9);
        assert_relative_eq!(HALF_WIDTH_RANGE.snap(7.0), 3.0);
        assert_relative_eq!(STEP_RANGE.snap(0.0), 0.01);
        assert_relative_eq!(GROUND_OFFSET_RANGE.step_by(-5.0, -1), -5.1, epsilon = 1e-9);
        assert_relative_eq!(GROUND_OFFSET_RANGE.step_by(0.0, 1), 0.0);
    }

    #[test]
    fn arrows_change_parameters() {
        let p = plotter();
        let mut controls = Controls::new();
        match controls.handle(&key(Key::Up), &p) {
            Some(Action::Plot(PlotEvent::ParameterChanged { parameter, value })) => {
                assert_eq!(parameter, Parameter::HalfWidth);
                assert_relative_eq!(value, 1.1, epsilon = 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
        match controls.handle(&key(Key::Left), &p) {
            Some(Action::Plot(PlotEvent::ParameterChanged { parameter, value })) => {
                assert_eq!(parameter, Parameter::Step);
                assert_relative_eq!(value, 0.09, epsilon = 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parameter_at_bound_does_nothing() {
        let mut p = Plotter::new(PlotParams::new(3.0, 0.01)).unwrap();
        p.plot("x", p.params()).unwrap();
        let mut controls = Controls::new();
        assert_eq!(controls.handle(&key(Key::Up), &p), None);
        assert_eq!(controls.handle(&key(Key::Left), &p), None);
    }

    #[test]
    fn digits_select_presets() {
        let p = plotter();
        let mut controls = Controls::new();
        assert_eq!(
            controls.handle(&key(Key::Digit(4)), &p),
            Some(Action::Plot(PlotEvent::PresetSelected(3)))
        );
        assert_eq!(controls.handle(&key(Key::Digit(0)), &p), None);
    }

    #[test]
    fn editing_collects_text_and_plots_on_return() {
        let p = plotter();
        let mut controls = Controls::new();
        controls.handle(&key(Key::Tab), &p);
        assert!(controls.is_editing());
        assert_eq!(controls.buffer(), "x + y");

        controls.handle(&key(Key::Backspace), &p);
        controls.handle(&WindowEvent::Text("x".into()), &p);
        // Command keys are inert while editing
        assert_eq!(controls.handle(&key(Key::W), &p), None);

        let action = controls.handle(&key(Key::Return), &p);
        assert_eq!(
            action,
            Some(Action::Plot(PlotEvent::PlotRequested {
                expression: "x + x".into()
            }))
        );
        assert!(!controls.is_editing());
    }

    #[test]
    fn escape_cancels_edit_before_quitting() {
        let p = plotter();
        let mut controls = Controls::new();
        controls.handle(&key(Key::Tab), &p);
        assert_eq!(controls.handle(&key(Key::Escape), &p), None);
        assert!(!controls.is_editing());
        assert_eq!(controls.handle(&key(Key::Escape), &p), Some(Action::Quit));
    }

    #[test]
    fn text_outside_editing_is_ignored() {
        let p = plotter();
        let mut controls = Controls::new();
        controls.handle(&WindowEvent::Text("w".into()), &p);
        assert_eq!(controls.buffer(), "");
    }

    #[test]
    fn g_cycles_ground_color() {
        let mut p = plotter();
        let mut controls = Controls::new();
        let Some(Action::Plot(event)) = controls.handle(&key(Key::G), &p) else {
            panic!("G should change the ground color");
        };
        assert_eq!(
            event,
            PlotEvent::GroundColorChanged(crate::ground::GROUND_PALETTE[1])
        );
        p.handle(event).unwrap();
        assert_eq!(p.scene().ground().color(), crate::ground::GROUND_PALETTE[1]);
    }

    #[test]
    fn page_keys_move_ground() {
        let p = plotter();
        let mut controls = Controls::new();
        match controls.handle(&key(Key::PageUp), &p) {
            Some(Action::Plot(PlotEvent::GroundOffsetChanged(offset))) => {
                assert_relative_eq!(offset, -4.9, epsilon = 1e-5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
