//! Color-vision-deficiency simulation.
//!
//! Each deficiency is a 3×3 transform applied to linear RGB before
//! re-encoding with sRGB gamma. Dichromacies (protanopia, deuteranopia,
//! tritanopia) use the full transform. The anomalous trichromacies
//! interpolate between the identity and the matching dichromacy transform by
//! a configurable severity.

use crate::color::{delta_e, linear_to_rgb, rgb_to_linear, Color, LinearRgb};
use crate::error::ColorError;
use crate::params::param_f64;
use glam::DMat3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Default severity for the anomalous forms.
pub const DEFAULT_SEVERITY: f64 = 0.6;

/// ΔE (CIE76) below which two colors count as indistinguishable.
pub const DISTINGUISHABLE_DELTA_E: f64 = 10.0;

/// Row-major dichromacy transforms in linear RGB.
const PROTANOPIA: [[f64; 3]; 3] = [
    [0.567, 0.433, 0.000],
    [0.558, 0.442, 0.000],
    [0.000, 0.242, 0.758],
];
const DEUTERANOPIA: [[f64; 3]; 3] = [
    [0.625, 0.375, 0.000],
    [0.700, 0.300, 0.000],
    [0.000, 0.300, 0.700],
];
const TRITANOPIA: [[f64; 3]; 3] = [
    [0.950, 0.050, 0.000],
    [0.000, 0.433, 0.567],
    [0.000, 0.475, 0.525],
];

/// The supported color-vision deficiencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deficiency {
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Protanomaly,
    Deuteranomaly,
    Tritanomaly,
}

impl Deficiency {
    /// All six deficiencies, dichromacies first.
    pub const ALL: [Deficiency; 6] = [
        Deficiency::Protanopia,
        Deficiency::Deuteranopia,
        Deficiency::Tritanopia,
        Deficiency::Protanomaly,
        Deficiency::Deuteranomaly,
        Deficiency::Tritanomaly,
    ];

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Deficiency::Protanopia => "protanopia",
            Deficiency::Deuteranopia => "deuteranopia",
            Deficiency::Tritanopia => "tritanopia",
            Deficiency::Protanomaly => "protanomaly",
            Deficiency::Deuteranomaly => "deuteranomaly",
            Deficiency::Tritanomaly => "tritanomaly",
        }
    }

    /// True for the partial (anomalous trichromacy) forms.
    pub fn is_anomaly(self) -> bool {
        matches!(
            self,
            Deficiency::Protanomaly | Deficiency::Deuteranomaly | Deficiency::Tritanomaly
        )
    }

    fn dichromacy(self) -> &'static [[f64; 3]; 3] {
        match self {
            Deficiency::Protanopia | Deficiency::Protanomaly => &PROTANOPIA,
            Deficiency::Deuteranopia | Deficiency::Deuteranomaly => &DEUTERANOPIA,
            Deficiency::Tritanopia | Deficiency::Tritanomaly => &TRITANOPIA,
        }
    }

    /// The linear-RGB transform for this deficiency at the given severity.
    ///
    /// Severity only affects the anomalous forms.
    pub fn matrix(self, options: &SimulationOptions) -> DMat3 {
        let full = DMat3::from_cols_array_2d(self.dichromacy()).transpose();
        if self.is_anomaly() {
            let t = options.severity();
            DMat3::IDENTITY * (1.0 - t) + full * t
        } else {
            full
        }
    }
}

impl fmt::Display for Deficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Deficiency {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Deficiency::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| ColorError::FormatError(format!("unknown deficiency: {s}")))
    }
}

/// Tunables for simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    severity: f64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            severity: DEFAULT_SEVERITY,
        }
    }
}

impl SimulationOptions {
    /// Creates options with the given anomaly severity in [0, 1].
    pub fn new(severity: f64) -> Result<Self, ColorError> {
        if !severity.is_finite() || !(0.0..=1.0).contains(&severity) {
            return Err(ColorError::range("severity", severity));
        }
        Ok(Self { severity })
    }

    /// Reads `severity` from a JSON object, falling back to the default when absent.
    pub fn from_json(params: &Value) -> Result<Self, ColorError> {
        Self::new(param_f64(params, "severity", DEFAULT_SEVERITY))
    }

    /// Interpolation factor between identity (0) and the full dichromacy (1).
    pub fn severity(&self) -> f64 {
        self.severity
    }
}

/// Simulates how `color` appears with the given deficiency. Alpha is kept.
pub fn simulate(color: Color, deficiency: Deficiency, options: &SimulationOptions) -> Color {
    let linear = rgb_to_linear(color).to_vec3();
    let simulated = deficiency.matrix(options) * linear;
    linear_to_rgb(LinearRgb::from_vec3(simulated)).with_alpha(color.a)
}

/// Simulates every deficiency, in [`Deficiency::ALL`] order.
pub fn simulate_all(color: Color, options: &SimulationOptions) -> Vec<(Deficiency, Color)> {
    Deficiency::ALL
        .into_iter()
        .map(|d| (d, simulate(color, d, options)))
        .collect()
}

/// True when the CIE76 difference reaches [`DISTINGUISHABLE_DELTA_E`].
pub fn distinguishable(a: Color, b: Color) -> bool {
    delta_e(a, b) >= DISTINGUISHABLE_DELTA_E
}

/// Result of checking a set of colors for confusable pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteAudit {
    /// Index pairs `(i, j)`, `i < j`, that collapse under at least one deficiency.
    pub problematic_pairs: Vec<(usize, usize)>,
    /// `1 - problems / pairs`, or 1.0 with fewer than two colors.
    pub score: f64,
}

/// Finds color pairs that become indistinguishable under any of `deficiencies`.
pub fn audit_palette(
    colors: &[Color],
    deficiencies: &[Deficiency],
    options: &SimulationOptions,
) -> PaletteAudit {
    let simulated: Vec<Vec<Color>> = deficiencies
        .iter()
        .map(|&d| colors.iter().map(|&c| simulate(c, d, options)).collect())
        .collect();

    let mut problematic_pairs = Vec::new();
    for i in 0..colors.len() {
        for j in i + 1..colors.len() {
            if simulated.iter().any(|sim| !distinguishable(sim[i], sim[j])) {
                problematic_pairs.push((i, j));
            }
        }
    }

    let total = colors.len() * colors.len().saturating_sub(1) / 2;
    let score = if total == 0 {
        1.0
    } else {
        1.0 - problematic_pairs.len() as f64 / total as f64
    };
    PaletteAudit {
        problematic_pairs,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> SimulationOptions {
        SimulationOptions::default()
    }

    #[test]
    fn greys_are_unchanged_by_every_deficiency() {
        for v in [0u8, 64, 128, 200, 255] {
            let grey = Color::rgb(v, v, v);
            for d in Deficiency::ALL {
                assert_eq!(simulate(grey, d, &defaults()), grey, "{d} changed grey {v}");
            }
        }
    }

    #[test]
    fn protanopia_collapses_red_toward_yellow() {
        let sim = simulate(Color::rgb(255, 0, 0), Deficiency::Protanopia, &defaults());
        assert_eq!(sim.b, 0);
        assert!((sim.r as i16 - sim.g as i16).abs() <= 3, "{sim:?}");
    }

    #[test]
    fn red_and_green_confusable_under_deuteranopia() {
        let red = Color::rgb(200, 60, 40);
        let green = Color::rgb(110, 110, 40);
        let r = simulate(red, Deficiency::Deuteranopia, &defaults());
        let g = simulate(green, Deficiency::Deuteranopia, &defaults());
        assert!(delta_e(r, g) < delta_e(red, green));
    }

    #[test]
    fn zero_severity_anomaly_is_identity() {
        let opts = SimulationOptions::new(0.0).unwrap();
        let c = Color::rgb(12, 200, 99);
        for d in [
            Deficiency::Protanomaly,
            Deficiency::Deuteranomaly,
            Deficiency::Tritanomaly,
        ] {
            assert_eq!(simulate(c, d, &opts), c);
        }
    }

    #[test]
    fn full_severity_anomaly_matches_dichromacy() {
        let opts = SimulationOptions::new(1.0).unwrap();
        let c = Color::rgb(220, 40, 180);
        assert_eq!(
            simulate(c, Deficiency::Protanomaly, &opts),
            simulate(c, Deficiency::Protanopia, &opts)
        );
        assert_eq!(
            simulate(c, Deficiency::Tritanomaly, &opts),
            simulate(c, Deficiency::Tritanopia, &opts)
        );
    }

    #[test]
    fn severity_does_not_affect_dichromacies() {
        let c = Color::rgb(220, 40, 180);
        let low = SimulationOptions::new(0.1).unwrap();
        let high = SimulationOptions::new(0.9).unwrap();
        assert_eq!(
            simulate(c, Deficiency::Deuteranopia, &low),
            simulate(c, Deficiency::Deuteranopia, &high)
        );
    }

    #[test]
    fn simulation_preserves_alpha() {
        let c = Color::rgba(255, 0, 0, 17);
        assert_eq!(simulate(c, Deficiency::Tritanopia, &defaults()).a, Some(17));
    }

    #[test]
    fn options_validate_severity() {
        assert!(SimulationOptions::new(1.5).is_err());
        assert!(SimulationOptions::new(f64::NAN).is_err());
        assert_eq!(SimulationOptions::default().severity(), DEFAULT_SEVERITY);
    }

    #[test]
    fn options_from_json() {
        let opts = SimulationOptions::from_json(&json!({"severity": 0.25})).unwrap();
        assert_eq!(opts.severity(), 0.25);
        let fallback = SimulationOptions::from_json(&json!({})).unwrap();
        assert_eq!(fallback.severity(), DEFAULT_SEVERITY);
        assert!(SimulationOptions::from_json(&json!({"severity": -1})).is_err());
    }

    #[test]
    fn deficiency_names_parse() {
        for d in Deficiency::ALL {
            assert_eq!(d.name().parse::<Deficiency>().unwrap(), d);
        }
        assert_eq!(" Protanopia ".parse::<Deficiency>().unwrap(), Deficiency::Protanopia);
        assert!("achromatopsia".parse::<Deficiency>().is_err());
    }

    #[test]
    fn simulate_all_covers_six_deficiencies() {
        let all = simulate_all(Color::rgb(1, 2, 3), &defaults());
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].0, Deficiency::Protanopia);
    }

    #[test]
    fn audit_flags_confusable_pairs() {
        let colors = [
            Color::rgb(255, 0, 0),
            Color::rgb(0, 128, 0),
            Color::rgb(0, 0, 255),
            Color::rgb(0, 0, 250),
        ];
        let audit = audit_palette(&colors, &Deficiency::ALL, &defaults());
        assert!(audit.problematic_pairs.contains(&(2, 3)));
        assert!(audit.score < 1.0 && audit.score >= 0.0);
    }

    #[test]
    fn audit_of_single_color_scores_one() {
        let audit = audit_palette(&[Color::BLACK], &Deficiency::ALL, &defaults());
        assert!(audit.problematic_pairs.is_empty());
        assert_eq!(audit.score, 1.0);
    }

    #[test]
    fn black_and_white_stay_distinguishable() {
        let audit = audit_palette(&[Color::BLACK, Color::WHITE], &Deficiency::ALL, &defaults());
        assert!(audit.problematic_pairs.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn simulation_is_total(r: u8, g: u8, b: u8, severity in 0.0_f64..=1.0) {
                let opts = SimulationOptions::new(severity).unwrap();
                for d in Deficiency::ALL {
                    let _ = simulate(Color::rgb(r, g, b), d, &opts);
                }
            }
        }
    }
}
