//! Built-in functions offered alongside the custom expression field.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub expression: &'static str,
}

pub const PRESETS: [Preset; 4] = [
    // Saddle
    Preset {
        name: "Hyperbolic Paraboloid",
        expression: "x ** 2 - y ** 2",
    },
    // Bowl
    Preset {
        name: "Parabola",
        expression: "x ** 2 + y ** 2",
    },
    Preset {
        name: "Deep Parabola",
        expression: "3 * x ** 2 + 3 * y ** 2",
    },
    // Vertex at the origin
    Preset {
        name: "Cone",
        expression: "sqrt(x ** 2 + y ** 2)",
    },
];

/// Index of the preset plotted at startup.
pub const DEFAULT_PRESET: usize = 0;

pub fn preset(index: usize) -> Option<&'static Preset> {
    PRESETS.get(index)
}
