//! Standard illuminant models and CCT machinery.
//!
//! An illuminant is ultimately just an (x, y) chromaticity; this module
//! provides the standard ways of producing one: fixed CIE tables (A, E,
//! fluorescent, LED), the CIE D-series daylight polynomial, the Planckian
//! (blackbody) locus approximation, the camera's as-shot coordinate, or a
//! freestyle custom value. The correlated color temperature helpers support
//! the calibration solver's "does this look like daylight?" decision.

use crate::lms::AdaptationMethod;
use crate::spaces::{Chromaticity, D50};

/// Fluorescent source variants (CIE F series).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Fluorescent {
    F1,
    F2,
    #[default]
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl Fluorescent {
    /// Tabulated chromaticity for this source.
    pub fn chromaticity(self) -> Chromaticity {
        let (x, y) = match self {
            Self::F1 => (0.31310, 0.33727),
            Self::F2 => (0.37208, 0.37529),
            Self::F3 => (0.40910, 0.39430),
            Self::F4 => (0.44018, 0.40329),
            Self::F5 => (0.31379, 0.34531),
            Self::F6 => (0.37790, 0.38835),
            Self::F7 => (0.31292, 0.32933),
            Self::F8 => (0.34588, 0.35875),
            Self::F9 => (0.37417, 0.37281),
            Self::F10 => (0.34609, 0.35986),
            Self::F11 => (0.38052, 0.37713),
            Self::F12 => (0.43695, 0.40441),
        };
        Chromaticity::new(x, y)
    }
}

/// LED source variants (CIE LED series).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum LedSource {
    B1,
    B2,
    B3,
    B4,
    #[default]
    B5,
    Bh1,
    Rgb1,
    V1,
    V2,
}

impl LedSource {
    /// Tabulated chromaticity for this source.
    pub fn chromaticity(self) -> Chromaticity {
        let (x, y) = match self {
            Self::B1 => (0.4560, 0.4078),
            Self::B2 => (0.4357, 0.4012),
            Self::B3 => (0.3756, 0.3723),
            Self::B4 => (0.3422, 0.3502),
            Self::B5 => (0.3118, 0.3236),
            Self::Bh1 => (0.4474, 0.4066),
            Self::Rgb1 => (0.4557, 0.4211),
            Self::V1 => (0.4560, 0.4548),
            Self::V2 => (0.3781, 0.3775),
        };
        Chromaticity::new(x, y)
    }
}

/// The scene illuminant a transform pass adapts away from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Illuminant {
    /// Trust the pipeline white point (D50); adaptation becomes a no-op.
    Pipe,
    /// CIE A, tungsten incandescent (~2856 K).
    A,
    /// CIE D series daylight at a correlated color temperature.
    Daylight {
        /// Correlated color temperature in Kelvin, clamped to 4000-25000.
        cct: f32,
    },
    /// CIE E, equal energy.
    E,
    /// A fluorescent tube from the F-series table.
    Fluorescent(Fluorescent),
    /// An LED source from the CIE LED table.
    Led(LedSource),
    /// Planckian radiator at a color temperature.
    Blackbody {
        /// Color temperature in Kelvin, clamped to 1667-25000.
        cct: f32,
    },
    /// Freestyle chromaticity picked by the user.
    Custom(Chromaticity),
    /// The camera's as-shot white balance, resolved upstream from RAW
    /// metadata into a chromaticity.
    Camera(Chromaticity),
}

impl Default for Illuminant {
    fn default() -> Self {
        Self::Daylight { cct: 5003.0 }
    }
}

impl Illuminant {
    /// The (x, y) chromaticity of this illuminant.
    pub fn chromaticity(&self) -> Chromaticity {
        match *self {
            Self::Pipe => D50,
            Self::A => Chromaticity::new(0.44757, 0.40745),
            Self::Daylight { cct } => daylight_chromaticity(cct),
            Self::E => Chromaticity::new(1.0 / 3.0, 1.0 / 3.0),
            Self::Fluorescent(f) => f.chromaticity(),
            Self::Led(l) => l.chromaticity(),
            Self::Blackbody { cct } => blackbody_chromaticity(cct),
            Self::Custom(xy) | Self::Camera(xy) => xy,
        }
    }
}

/// CIE D-series daylight chromaticity for a CCT.
///
/// Kang's polynomial fit of the daylight locus; input is clamped to the
/// model's 4000-25000 K validity range.
pub fn daylight_chromaticity(cct: f32) -> Chromaticity {
    let t = cct.clamp(4000.0, 25000.0);
    let t2 = t * t;
    let t3 = t2 * t;

    let x = if t <= 7000.0 {
        -4.6070e9 / t3 + 2.9678e6 / t2 + 0.09911e3 / t + 0.244063
    } else {
        -2.0064e9 / t3 + 1.9018e6 / t2 + 0.24748e3 / t + 0.237040
    };
    let y = -3.0 * x * x + 2.87 * x - 0.275;

    Chromaticity::new(x, y)
}

/// Planckian locus chromaticity for a color temperature.
///
/// Kim et al. cubic spline approximation, clamped to 1667-25000 K.
pub fn blackbody_chromaticity(cct: f32) -> Chromaticity {
    let t = cct.clamp(1667.0, 25000.0);
    let t2 = t * t;
    let t3 = t2 * t;

    let x = if t <= 4000.0 {
        -0.2661239e9 / t3 - 0.2343589e6 / t2 + 0.8776956e3 / t + 0.179910
    } else {
        -3.0258469e9 / t3 + 2.1070379e6 / t2 + 0.2226347e3 / t + 0.240390
    };

    let x2 = x * x;
    let x3 = x2 * x;
    let y = if t <= 2222.0 {
        -1.1063814 * x3 - 1.34811020 * x2 + 2.18555832 * x - 0.20219683
    } else if t <= 4000.0 {
        -0.9549476 * x3 - 1.37418593 * x2 + 2.09137015 * x - 0.16748867
    } else {
        3.0817580 * x3 - 5.87338670 * x2 + 3.75112997 * x - 0.37001483
    };

    Chromaticity::new(x, y)
}

/// Correlated color temperature of a chromaticity, McCamy's formula.
///
/// Accurate on and near the Planckian locus between roughly 3000 K and
/// 25000 K; below that use [`cct_reverse_lookup`].
pub fn xy_to_cct(xy: Chromaticity) -> f32 {
    let n = (xy.x - 0.3320) / (xy.y - 0.1858);
    -449.0 * n * n * n + 3525.0 * n * n - 6823.3 * n + 5520.33
}

/// CCT by brute-force search along the blackbody locus.
///
/// McCamy's fit degrades below 3000 K; this scans the Planckian locus in
/// 10 K steps over the tungsten range and returns the closest point.
pub fn cct_reverse_lookup(xy: Chromaticity) -> f32 {
    let mut best_t = 1667.0_f32;
    let mut best_d = f32::INFINITY;

    let mut t = 1667.0_f32;
    while t <= 3500.0 {
        let candidate = blackbody_chromaticity(t);
        let d = (candidate.x - xy.x).hypot(candidate.y - xy.y);
        if d < best_d {
            best_d = d;
            best_t = t;
        }
        t += 10.0;
    }
    best_t
}

/// Result of [`check_close_to_daylight`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaylightCheck {
    /// Estimated correlated color temperature in Kelvin.
    pub cct: f32,
    /// Suggested illuminant model for this chromaticity.
    pub illuminant: Illuminant,
    /// Suggested adaptation method.
    pub adaptation: AdaptationMethod,
}

/// Decides whether a chromaticity is well described by a CCT-based model.
///
/// The candidate daylight and blackbody chromaticities at the estimated CCT
/// are compared against the input in CIE 1960 uv; within 0.005 the CCT
/// models are trustworthy and Bradford is the accurate choice. Outside
/// that, a CCT would misrepresent the source, so the suggestion falls back
/// to the raw custom chromaticity with CAT16, which degrades more
/// gracefully far from daylight.
pub fn check_close_to_daylight(xy: Chromaticity) -> DaylightCheck {
    let mut cct = xy_to_cct(xy);

    // McCamy is only trustworthy above 3000 K
    if cct < 3000.0 && cct > 1667.0 {
        cct = cct_reverse_lookup(xy);
    }

    let delta_daylight = xy.uv_distance(daylight_chromaticity(cct));
    let delta_blackbody = xy.uv_distance(blackbody_chromaticity(cct));

    if delta_blackbody < 0.005 || delta_daylight < 0.005 {
        let illuminant = if delta_blackbody < delta_daylight {
            Illuminant::Blackbody { cct }
        } else {
            Illuminant::Daylight { cct }
        };
        DaylightCheck {
            cct,
            illuminant,
            adaptation: AdaptationMethod::LinearBradford,
        }
    } else {
        DaylightCheck {
            cct,
            illuminant: Illuminant::Custom(xy),
            adaptation: AdaptationMethod::Cat16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pipe_is_d50() {
        let xy = Illuminant::Pipe.chromaticity();
        assert_relative_eq!(xy.x, 0.34567, epsilon = 1e-6);
        assert_relative_eq!(xy.y, 0.35850, epsilon = 1e-6);
    }

    #[test]
    fn test_daylight_at_6500k_is_near_d65() {
        let xy = daylight_chromaticity(6504.0);
        assert_relative_eq!(xy.x, 0.3127, epsilon = 2e-3);
        assert_relative_eq!(xy.y, 0.3290, epsilon = 2e-3);
    }

    #[test]
    fn test_daylight_clamps_range() {
        assert_eq!(daylight_chromaticity(100.0), daylight_chromaticity(4000.0));
        assert_eq!(
            daylight_chromaticity(90000.0),
            daylight_chromaticity(25000.0)
        );
    }

    #[test]
    fn test_cct_of_d65() {
        let cct = xy_to_cct(Chromaticity::new(0.31271, 0.32902));
        assert!((cct - 6500.0).abs() < 50.0, "cct = {}", cct);
    }

    #[test]
    fn test_cct_roundtrip_on_daylight_locus() {
        for t in [4500.0_f32, 5500.0, 6500.0, 8000.0] {
            let xy = daylight_chromaticity(t);
            let recovered = xy_to_cct(xy);
            assert!(
                (recovered - t).abs() / t < 0.02,
                "t = {}, recovered = {}",
                t,
                recovered
            );
        }
    }

    #[test]
    fn test_reverse_lookup_tungsten() {
        let xy = blackbody_chromaticity(2400.0);
        let recovered = cct_reverse_lookup(xy);
        assert!((recovered - 2400.0).abs() <= 20.0, "got {}", recovered);
    }

    #[test]
    fn test_daylight_check_accepts_daylight() {
        let xy = daylight_chromaticity(5600.0);
        let check = check_close_to_daylight(xy);
        assert_eq!(check.adaptation, AdaptationMethod::LinearBradford);
        assert!(matches!(
            check.illuminant,
            Illuminant::Daylight { .. } | Illuminant::Blackbody { .. }
        ));
    }

    #[test]
    fn test_daylight_check_rejects_green_spike() {
        // A strongly green chromaticity is nothing like a CCT source
        let xy = Chromaticity::new(0.30, 0.55);
        let check = check_close_to_daylight(xy);
        assert_eq!(check.adaptation, AdaptationMethod::Cat16);
        assert!(matches!(check.illuminant, Illuminant::Custom(_)));
    }

    #[test]
    fn test_fluorescent_and_led_tables() {
        // Spot checks against the CIE tables
        let f3 = Fluorescent::F3.chromaticity();
        assert_relative_eq!(f3.x, 0.40910, epsilon = 1e-6);
        let b5 = LedSource::B5.chromaticity();
        assert_relative_eq!(b5.y, 0.3236, epsilon = 1e-6);
    }

    #[test]
    fn test_a_illuminant() {
        let xy = Illuminant::A.chromaticity();
        assert_relative_eq!(xy.x, 0.44757, epsilon = 1e-6);
    }
}
