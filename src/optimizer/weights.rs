//! Solver weights and seasonal presets

use super::OptimizerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PRESET_TOLERANCE: f64 = 1e-9;

/// Upper bound for the five base weights.
pub const MAX_BASE_WEIGHT: f64 = 2.0;

/// Upper bound for the `diferencia` weight (recalculation only).
pub const MAX_DIFFERENCE_WEIGHT: f64 = 4.0;

/// Seasonal weight preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WeightPreset {
    /// Low season: cost dominates.
    #[default]
    Baja,
    /// High season: delivery time dominates.
    Alta,
}

impl FromStr for WeightPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baja" => Ok(WeightPreset::Baja),
            "alta" => Ok(WeightPreset::Alta),
            _ => Err(format!("Invalid weight preset: {}", s)),
        }
    }
}

impl fmt::Display for WeightPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightPreset::Baja => write!(f, "baja"),
            WeightPreset::Alta => write!(f, "alta"),
        }
    }
}

/// How a weight set relates to the presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetMatch {
    Preset(WeightPreset),
    Custom,
}

/// Objective weights sent to the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub inventario: f64,
    pub tiempo: f64,
    pub costo: f64,
    pub nodo: f64,
    pub ruta: f64,
    pub diferencia: f64,
}

impl Weights {
    pub const NAMES: [&'static str; 6] =
        ["inventario", "tiempo", "costo", "nodo", "ruta", "diferencia"];

    pub fn preset(preset: WeightPreset) -> Self {
        match preset {
            WeightPreset::Baja => Self {
                inventario: 0.5,
                tiempo: 1.0,
                costo: 2.0,
                nodo: 0.5,
                ruta: 0.5,
                diferencia: 0.0,
            },
            WeightPreset::Alta => Self {
                inventario: 0.4,
                tiempo: 2.0,
                costo: 0.1,
                nodo: 0.5,
                ruta: 0.5,
                diferencia: 4.0,
            },
        }
    }

    /// Weights for a regular run: the preset with `diferencia` forced to zero.
    pub fn standard(preset: WeightPreset) -> Self {
        Self {
            diferencia: 0.0,
            ..Self::preset(preset)
        }
    }

    /// Weights for a recalculation run: high-season base weights plus `diferencia`.
    pub fn recalculation(diferencia: f64) -> Result<Self, OptimizerError> {
        check_range("diferencia", diferencia, MAX_DIFFERENCE_WEIGHT)?;
        Ok(Self {
            diferencia,
            ..Self::preset(WeightPreset::Alta)
        })
    }

    /// Override one base weight by name.
    ///
    /// `diferencia` is not a base weight; it is only set through
    /// [`Weights::recalculation`].
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), OptimizerError> {
        let slot = match name {
            "inventario" => &mut self.inventario,
            "tiempo" => &mut self.tiempo,
            "costo" => &mut self.costo,
            "nodo" => &mut self.nodo,
            "ruta" => &mut self.ruta,
            _ => {
                return Err(OptimizerError::InvalidRequest(format!(
                    "unknown weight '{}'",
                    name
                )))
            }
        };
        check_range(name, value, MAX_BASE_WEIGHT)?;
        *slot = value;
        Ok(())
    }

    /// Pairs of `(name, value)` in wire order.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("inventario", self.inventario),
            ("tiempo", self.tiempo),
            ("costo", self.costo),
            ("nodo", self.nodo),
            ("ruta", self.ruta),
            ("diferencia", self.diferencia),
        ]
    }

    /// Classify a regular-run weight set against the presets.
    ///
    /// High season matches on the base weights with `diferencia == 0`, since
    /// regular runs never send a difference weight.
    pub fn classify(&self) -> PresetMatch {
        let close = |a: f64, b: f64| (a - b).abs() < PRESET_TOLERANCE;
        let base_matches = |other: &Weights| {
            close(self.inventario, other.inventario)
                && close(self.tiempo, other.tiempo)
                && close(self.costo, other.costo)
                && close(self.nodo, other.nodo)
                && close(self.ruta, other.ruta)
        };

        let baja = Weights::preset(WeightPreset::Baja);
        if base_matches(&baja) && close(self.diferencia, baja.diferencia) {
            return PresetMatch::Preset(WeightPreset::Baja);
        }
        if base_matches(&Weights::preset(WeightPreset::Alta)) && close(self.diferencia, 0.0) {
            return PresetMatch::Preset(WeightPreset::Alta);
        }
        PresetMatch::Custom
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::standard(WeightPreset::default())
    }
}

fn check_range(name: &str, value: f64, max: f64) -> Result<(), OptimizerError> {
    if !(0.0..=max).contains(&value) {
        return Err(OptimizerError::InvalidRequest(format!(
            "weight '{}' must be between 0.0 and {:.1}, got {}",
            name, max, value
        )));
    }
    Ok(())
}

/// Parse a `name=value` weight override.
pub fn parse_weight_override(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim().to_lowercase();
    if !Weights::NAMES.contains(&name.as_str()) {
        return Err(format!("unknown weight '{}'", name));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for weight '{}': {}", name, e))?;
    Ok((name, value))
}
