//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::colors::Rgb;
use crate::error::Error;
use crate::plotter::{PlotError, PlotParams};
use crate::presets::{self, PRESETS};
use crate::scene::RenderMode;
use crate::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Function of x and y to plot, e.g. "sin(x) * cos(y)"
    #[clap(short, long, conflicts_with = "preset")]
    pub expression: Option<String>,

    /// Built-in function to plot (1: saddle, 2: bowl, 3: deep bowl, 4: cone)
    #[clap(short, long)]
    pub preset: Option<usize>,

    /// Domain half-width n; x and y range over [-n, n]
    #[clap(short = 'n', long, default_value_t = 1.0)]
    pub half_width: f64,

    /// Sampling step size
    #[clap(short = 'i', long, default_value_t = 0.01)]
    pub step: f64,

    /// Window or image width in pixels
    #[clap(long, default_value_t = WINDOW_WIDTH)]
    pub width: u32,

    /// Window or image height in pixels
    #[clap(long, default_value_t = WINDOW_HEIGHT)]
    pub height: u32,

    /// Ground plane color as #rrggbb
    #[clap(long, default_value = "#84bbfa")]
    pub ground_color: String,

    /// Ground plane height below the surface (defaults to -5n)
    #[clap(long, allow_hyphen_values = true)]
    pub ground_offset: Option<f32>,

    /// Draw the surface as a wireframe
    #[clap(short, long)]
    pub wireframe: bool,

    /// Render one frame to this `.png` file instead of opening a window
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

/// Validated startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub expression: String,
    pub params: PlotParams,
    pub width: u32,
    pub height: u32,
    pub ground_color: Rgb,
    pub ground_offset: Option<f32>,
    pub render_mode: RenderMode,
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn into_config(self) -> Result<Config, Error> {
        let expression = match (self.expression, self.preset) {
            (Some(expression), _) => expression,
            (None, Some(number)) => {
                let preset = number
                    .checked_sub(1)
                    .and_then(presets::preset)
                    .ok_or(PlotError::UnknownPreset {
                        index: number,
                        count: PRESETS.len(),
                    })?;
                preset.expression.to_string()
            }
            (None, None) => PRESETS[presets::DEFAULT_PRESET].expression.to_string(),
        };

        let params = PlotParams::new(self.half_width, self.step);
        params.validate()?;

        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }

        let render_mode = if self.wireframe {
            RenderMode::Wireframe
        } else {
            RenderMode::Filled
        };

        Ok(Config {
            expression,
            params,
            width: self.width,
            height: self.height,
            ground_color: Rgb::from_hex(&self.ground_color)?,
            ground_offset: self.ground_offset,
            render_mode,
            output: self.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;

    fn parse(args: &[&str]) -> Result<Config, Error> {
        let argv = std::iter::once("surfplot").chain(args.iter().copied());
        Args::try_parse_from(argv).unwrap().into_config()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.expression, "x ** 2 - y ** 2");
        assert_eq!(config.params, PlotParams::default());
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.ground_color, colors::GROUND);
        assert_eq!(config.ground_offset, None);
        assert_eq!(config.render_mode, RenderMode::Filled);
        assert!(config.output.is_none());
    }

    #[test]
    fn preset_is_one_based() {
        let config = parse(&["--preset", "4"]).unwrap();
        assert_eq!(config.expression, "sqrt(x ** 2 + y ** 2)");
        assert!(matches!(
            parse(&["--preset", "0"]),
            Err(Error::Plot(PlotError::UnknownPreset { index: 0, .. }))
        ));
        assert!(parse(&["--preset", "5"]).is_err());
    }

    #[test]
    fn expression_conflicts_with_preset() {
        let argv = ["surfplot", "-e", "x", "-p", "1"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn negative_values_parse() {
        let config = parse(&["--ground-offset", "-12.5", "-e", "x * y"]).unwrap();
        assert_eq!(config.ground_offset, Some(-12.5));
        assert_eq!(config.expression, "x * y");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            parse(&["-n", "0"]),
            Err(Error::Plot(PlotError::InvalidParameter { .. }))
        ));
        assert!(matches!(
            parse(&["--ground-color", "blue"]),
            Err(Error::Color(_))
        ));
        assert!(matches!(
            parse(&["--width", "0"]),
            Err(Error::InvalidSize { .. })
        ));
    }

    #[test]
    fn wireframe_flag_sets_render_mode() {
        let config = parse(&["--wireframe", "-o", "plot.png"]).unwrap();
        assert_eq!(config.render_mode, RenderMode::Wireframe);
        assert_eq!(config.output, Some(PathBuf::from("plot.png")));
    }
}
