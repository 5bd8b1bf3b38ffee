//! The plot pipeline: parse, sample, colorize, build, swap.
//!
//! Every plot request is a full rebuild. A request that fails validation or
//! parsing leaves the displayed surface, the ground plane and the current
//! parameters exactly as they were.

use std::fmt;

use log::{debug, info, warn};
use thiserror::Error;

use crate::colors::Rgb;
use crate::expr::{parse_function, ParseError};
use crate::presets;
use crate::sampler::{sample, segment_count, SampleError};
use crate::scene::Scene;
use crate::surface::build_surface;

/// One of the two numeric plot parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parameter {
    /// Domain half-width `n`.
    HalfWidth,
    /// Step size `incr`.
    Step,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::HalfWidth => write!(f, "n"),
            Parameter::Step => write!(f, "incr"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("{parameter} must be a positive number, got {value}")]
    InvalidParameter { parameter: Parameter, value: f64 },

    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error("unknown preset {index}; there are {count}")]
    UnknownPreset { index: usize, count: usize },
}

/// Domain half-width and step size for one plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotParams {
    pub half_width: f64,
    pub step: f64,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            half_width: 1.0,
            step: 0.01,
        }
    }
}

impl PlotParams {
    pub fn new(half_width: f64, step: f64) -> Self {
        Self { half_width, step }
    }

    /// Both parameters must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), PlotError> {
        for (parameter, value) in [
            (Parameter::HalfWidth, self.half_width),
            (Parameter::Step, self.step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlotError::InvalidParameter { parameter, value });
            }
        }
        Ok(())
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::HalfWidth => self.half_width,
            Parameter::Step => self.step,
        }
    }

    /// Copy with one parameter replaced.
    pub fn with(self, parameter: Parameter, value: f64) -> Self {
        match parameter {
            Parameter::HalfWidth => Self {
                half_width: value,
                ..self
            },
            Parameter::Step => Self { step: value, ..self },
        }
    }

    pub fn segments(&self) -> usize {
        segment_count(self.half_width, self.step)
    }
}

/// Requests from the user interface.
#[derive(Clone, Debug, PartialEq)]
pub enum PlotEvent {
    /// Plot this expression with the current parameters.
    PlotRequested { expression: String },
    /// Change `n` or `incr` and replot the current expression.
    ParameterChanged { parameter: Parameter, value: f64 },
    /// Plot one of the built-in functions.
    PresetSelected(usize),
    GroundColorChanged(Rgb),
    GroundOffsetChanged(f32),
}

/// Summary of a successful rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotReport {
    pub segments: usize,
    pub vertex_count: usize,
    pub face_count: usize,
    /// Samples whose height was `NaN` or infinite. They are kept in the mesh.
    pub non_finite_samples: usize,
}

pub struct Plotter {
    scene: Scene,
    params: PlotParams,
    expression: Option<String>,
}

impl Plotter {
    /// Creates a plotter with an empty surface and a ground plane sized for
    /// `params`.
    pub fn new(params: PlotParams) -> Result<Self, PlotError> {
        params.validate()?;
        Ok(Self {
            scene: Scene::new(params.half_width),
            params,
            expression: None,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Parameters of the displayed plot.
    pub fn params(&self) -> PlotParams {
        self.params
    }

    /// Source of the displayed expression, if anything has been plotted.
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Plots `expression` over the domain described by `params`.
    pub fn plot(&mut self, expression: &str, params: PlotParams) -> Result<PlotReport, PlotError> {
        let result = self.rebuild(expression, params);
        if let Err(err) = &result {
            warn!("plot request rejected: {err}");
        }
        result
    }

    fn rebuild(&mut self, expression: &str, params: PlotParams) -> Result<PlotReport, PlotError> {
        params.validate()?;
        let function = parse_function(expression)?;

        let grid = sample(&function, params.half_width, params.step)?;
        debug!(
            "sampled '{}' on a {s}x{s} grid ({} points)",
            function.source(),
            grid.len(),
            s = grid.segments()
        );

        let non_finite_samples = grid.non_finite_count();
        if non_finite_samples > 0 {
            warn!(
                "'{}' is undefined at {non_finite_samples} of {} samples",
                function.source(),
                grid.len()
            );
        }

        let mesh = build_surface(&grid);
        let report = PlotReport {
            segments: grid.segments(),
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            non_finite_samples,
        };

        self.scene.replace_surface(mesh);
        self.scene.rebuild_ground(params.half_width);
        self.params = params;
        self.expression = Some(function.source().to_string());

        info!(
            "plotted z = {} with n = {}, incr = {} ({} segments)",
            function.source(),
            params.half_width,
            params.step,
            report.segments
        );
        Ok(report)
    }

    /// Applies a user interface event.
    ///
    /// Returns the rebuild report when the event caused a replot.
    pub fn handle(&mut self, event: PlotEvent) -> Result<Option<PlotReport>, PlotError> {
        match event {
            PlotEvent::PlotRequested { expression } => {
                self.plot(&expression, self.params).map(Some)
            }
            PlotEvent::ParameterChanged { parameter, value } => {
                let params = self.params.with(parameter, value);
                match self.expression.clone() {
                    Some(expression) => self.plot(&expression, params).map(Some),
                    None => {
                        params.validate()?;
                        self.params = params;
                        Ok(None)
                    }
                }
            }
            PlotEvent::PresetSelected(index) => {
                let preset = presets::preset(index).ok_or(PlotError::UnknownPreset {
                    index,
                    count: presets::PRESETS.len(),
                })?;
                debug!("preset selected: {}", preset.name);
                self.plot(preset.expression, self.params).map(Some)
            }
            PlotEvent::GroundColorChanged(color) => {
                self.scene.ground_mut().set_color(color);
                Ok(None)
            }
            PlotEvent::GroundOffsetChanged(offset) => {
                self.scene.ground_mut().set_offset(offset);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plotter() -> Plotter {
        Plotter::new(PlotParams::new(1.0, 0.1)).unwrap()
    }

    fn surface_len(plotter: &Plotter) -> usize {
        plotter.scene().surface().map(|s| s.vertex_count()).unwrap_or(0)
    }

    #[test]
    fn plot_builds_surface_and_ground() {
        let mut p = plotter();
        let report = p.plot("x ** 2 - y ** 2", PlotParams::new(2.0, 0.1)).unwrap();

        assert_eq!(report.segments, 40);
        assert_eq!(report.vertex_count, 41 * 41);
        assert_eq!(report.face_count, 2 * 40 * 40);
        assert_eq!(report.non_finite_samples, 0);
        assert_relative_eq!(p.scene().ground().size(), 200.0);
        assert_eq!(p.expression(), Some("x ** 2 - y ** 2"));
        assert_eq!(p.params(), PlotParams::new(2.0, 0.1));
    }

    #[test]
    fn consecutive_plots_keep_one_live_surface() {
        let mut p = plotter();
        p.plot("x + y", p.params()).unwrap();
        p.plot("x - y", p.params()).unwrap();

        // One surface and one ground plane
        assert_eq!(p.scene().tracker().live(), 2);
    }

    #[test]
    fn cone_scenario() {
        let mut p = plotter();
        p.handle(PlotEvent::PresetSelected(3)).unwrap();

        let surface = p.scene().surface().unwrap();
        assert_eq!(surface.vertex_count(), 21 * 21);
        assert!(surface.positions().iter().all(|v| v.z >= 0.0));

        let apex = surface
            .positions()
            .iter()
            .min_by(|a, b| {
                let da = a.x * a.x + a.y * a.y;
                let db = b.x * b.x + b.y * b.y;
                da.total_cmp(&db)
            })
            .unwrap();
        assert_relative_eq!(apex.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_half_width_aborts_and_keeps_mesh() {
        let mut p = plotter();
        p.plot("x * y", p.params()).unwrap();
        let before = surface_len(&p);
        let created = p.scene().tracker().created();

        let err = p.plot("x * y", PlotParams::new(0.0, 0.1)).unwrap_err();
        assert_eq!(
            err,
            PlotError::InvalidParameter {
                parameter: Parameter::HalfWidth,
                value: 0.0
            }
        );
        assert_eq!(surface_len(&p), before);
        assert_eq!(p.scene().tracker().created(), created);
        assert_eq!(p.params(), PlotParams::new(1.0, 0.1));
    }

    #[test]
    fn oversized_grid_is_an_error_and_keeps_mesh() {
        let mut p = plotter();
        p.plot("x * y", p.params()).unwrap();
        let created = p.scene().tracker().created();

        let err = p.plot("x * y", PlotParams::new(1.0, 1e-300)).unwrap_err();
        assert!(matches!(err, PlotError::Sample(SampleError::TooLarge { .. })));
        assert_eq!(p.scene().tracker().created(), created);
        assert_eq!(p.params(), PlotParams::new(1.0, 0.1));
    }

    #[test]
    fn invalid_steps_are_rejected() {
        for step in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                PlotParams::new(1.0, step).validate(),
                Err(PlotError::InvalidParameter {
                    parameter: Parameter::Step,
                    ..
                })
            ));
        }
    }

    #[test]
    fn syntax_error_keeps_previous_surface() {
        let mut p = plotter();
        p.plot("x", p.params()).unwrap();

        let err = p
            .handle(PlotEvent::PlotRequested {
                expression: "x +* y".into(),
            })
            .unwrap_err();
        assert!(matches!(err, PlotError::Syntax(_)));
        assert_eq!(p.expression(), Some("x"));
        assert_eq!(p.scene().tracker().created(), 3);
    }

    #[test]
    fn non_finite_samples_are_reported_not_rejected() {
        let mut p = plotter();
        let report = p.plot("sqrt(x)", p.params()).unwrap();
        assert_eq!(report.non_finite_samples, 10 * 21);
        assert!(p.scene().surface().is_some());
    }

    #[test]
    fn parameter_change_replots_current_expression() {
        let mut p = plotter();
        p.plot("x + y", p.params()).unwrap();

        let report = p
            .handle(PlotEvent::ParameterChanged {
                parameter: Parameter::Step,
                value: 0.05,
            })
            .unwrap()
            .unwrap();
        assert_eq!(report.segments, 40);
        assert_eq!(p.params().step, 0.05);
    }

    #[test]
    fn rejected_parameter_change_keeps_params() {
        let mut p = plotter();
        p.plot("x + y", p.params()).unwrap();
        assert!(p
            .handle(PlotEvent::ParameterChanged {
                parameter: Parameter::HalfWidth,
                value: -1.0,
            })
            .is_err());
        assert_eq!(p.params().half_width, 1.0);
    }

    #[test]
    fn parameter_change_before_first_plot_only_updates_params() {
        let mut p = plotter();
        let result = p.handle(PlotEvent::ParameterChanged {
            parameter: Parameter::HalfWidth,
            value: 2.0,
        });
        assert_eq!(result, Ok(None));
        assert_eq!(p.params().half_width, 2.0);
        assert!(p.scene().surface().is_none());
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let mut p = plotter();
        assert_eq!(
            p.handle(PlotEvent::PresetSelected(9)),
            Err(PlotError::UnknownPreset { index: 9, count: 4 })
        );
    }

    #[test]
    fn ground_events_update_material() {
        let mut p = plotter();
        p.handle(PlotEvent::GroundOffsetChanged(-12.0)).unwrap();
        p.handle(PlotEvent::GroundColorChanged(Rgb::WHITE)).unwrap();
        assert_eq!(p.scene().ground().offset(), -12.0);
        assert_eq!(p.scene().ground().color(), Rgb::WHITE);
    }

    #[test]
    fn segments_from_params() {
        assert_eq!(PlotParams::new(1.0, 1.0).segments(), 10);
        assert_eq!(PlotParams::default().segments(), 200);
    }
}
