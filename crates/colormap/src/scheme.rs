//! Color schemes and multi-stop interpolation engine.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    /// Red -> Yellow -> Green (ColorBrewer diverging, the usual NDVI ramp)
    #[default]
    RdYlGn,
    /// Brown -> Yellow -> Green (vegetation, earthier low end)
    Ndvi,
    /// Blue -> White -> Red
    Divergent,
    /// Black -> White
    Grayscale,
}

impl ColorScheme {
    pub const ALL: &[ColorScheme] = &[Self::RdYlGn, Self::Ndvi, Self::Divergent, Self::Grayscale];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RdYlGn => "RdYlGn",
            Self::Ndvi => "NDVI",
            Self::Divergent => "Divergent",
            Self::Grayscale => "Grayscale",
        }
    }

    /// Look a scheme up by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

// ─── Color stop definitions ────────────────────────────────────────────

const RDYLGN_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 165, 0, 38),
    ColorStop::new(0.1, 215, 48, 39),
    ColorStop::new(0.2, 244, 109, 67),
    ColorStop::new(0.3, 253, 174, 97),
    ColorStop::new(0.4, 254, 224, 139),
    ColorStop::new(0.5, 255, 255, 191),
    ColorStop::new(0.6, 217, 239, 139),
    ColorStop::new(0.7, 166, 217, 106),
    ColorStop::new(0.8, 102, 189, 99),
    ColorStop::new(0.9, 26, 152, 80),
    ColorStop::new(1.0, 0, 104, 55),
];

const NDVI_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 120, 70, 20),
    ColorStop::new(0.3, 200, 170, 60),
    ColorStop::new(0.5, 240, 230, 100),
    ColorStop::new(0.7, 100, 180, 50),
    ColorStop::new(1.0, 10, 100, 20),
];

const DIVERGENT_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 33, 102, 172),
    ColorStop::new(0.25, 103, 169, 207),
    ColorStop::new(0.50, 247, 247, 247),
    ColorStop::new(0.75, 239, 138, 98),
    ColorStop::new(1.00, 178, 24, 43),
];

// ─── Interpolation engine ──────────────────────────────────────────────

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

/// Stops must be sorted by `t`, start at 0 and end at 1.
fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    let (first, last) = (stops[0], stops[stops.len() - 1]);
    if t <= first.t {
        return first.color;
    }
    stops
        .windows(2)
        .find(|w| t <= w[1].t)
        .map(|w| lerp_color(w[0].color, w[1].color, (t - w[0].t) / (w[1].t - w[0].t)))
        .unwrap_or(last.color)
}

/// Evaluate a color scheme at normalized position `t` ∈ [0, 1].
///
/// Values outside the unit interval clamp to the end colors.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    match scheme {
        ColorScheme::RdYlGn => multi_stop(RDYLGN_STOPS, t),
        ColorScheme::Ndvi => multi_stop(NDVI_STOPS, t),
        ColorScheme::Divergent => multi_stop(DIVERGENT_STOPS, t),
        ColorScheme::Grayscale => {
            let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb::new(v, v, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rdylgn_endpoints_and_midpoint() {
        assert_eq!(evaluate(ColorScheme::RdYlGn, 0.0), Rgb::new(165, 0, 38));
        assert_eq!(evaluate(ColorScheme::RdYlGn, 0.5), Rgb::new(255, 255, 191));
        assert_eq!(evaluate(ColorScheme::RdYlGn, 1.0), Rgb::new(0, 104, 55));
    }

    #[test]
    fn rdylgn_interpolates_between_stops() {
        // A fifth of the way from (26,152,80) to (0,104,55)
        assert_eq!(evaluate(ColorScheme::RdYlGn, 0.92), Rgb::new(21, 142, 75));
    }

    #[test]
    fn grayscale_midpoint() {
        let c = evaluate(ColorScheme::Grayscale, 0.5);
        assert_eq!(c, Rgb::new(128, 128, 128));
    }

    #[test]
    fn ndvi_endpoints() {
        assert_eq!(evaluate(ColorScheme::Ndvi, 0.0), Rgb::new(120, 70, 20));
        assert_eq!(evaluate(ColorScheme::Ndvi, 1.0), Rgb::new(10, 100, 20));
    }

    #[test]
    fn clamping_outside_unit_interval() {
        assert_eq!(evaluate(ColorScheme::Divergent, -0.5), Rgb::new(33, 102, 172));
        assert_eq!(evaluate(ColorScheme::Divergent, 1.5), Rgb::new(178, 24, 43));
    }

    #[test]
    fn scheme_names() {
        assert_eq!(ColorScheme::from_name("rdylgn"), Some(ColorScheme::RdYlGn));
        assert_eq!(ColorScheme::from_name("NDVI"), Some(ColorScheme::Ndvi));
        assert_eq!(ColorScheme::from_name("viridis"), None);
        assert_eq!(ColorScheme::default(), ColorScheme::RdYlGn);
    }
}
