//! # Hydraulic Calculations
//!
//! The formula engine. Every calculation follows the same pattern:
//!
//! - `FIELDS` - ordered input schema
//! - `calculate(&NormalizedInputs) -> ResultMap` - closed-form SI formula
//! - `steps(&NormalizedInputs) -> Vec<CalculationStep>` - worked explanation
//!
//! [`compute`] ties them together: raw strings are parsed, converted to SI
//! per field kind, then dispatched on the calculation id.
//!
//! ## Failure Policy
//!
//! Nothing in this module returns an error. Unparseable input becomes `0`,
//! every division by a derived quantity is guarded to yield `0`, and an
//! unknown id produces a single "not implemented" entry. Validation belongs
//! to the caller (see [`crate::validation`]).
//!
//! ## Available Calculations
//!
//! - [`head_loss`] - local (minor) loss through fittings, `h = K·V²/2g`
//! - [`pipe_flow`] - laminar flow rate, Hagen–Poiseuille
//! - [`pressure_drop`] - Darcy–Weisbach with an assumed friction factor
//! - [`pump_power`] - hydraulic shaft power
//! - [`flow_velocity`] - mean velocity `V = Q/A`
//! - [`reynolds_number`] - Reynolds number and flow regime
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use hydro_core::calculations::compute;
//! use hydro_core::fields::fields_for;
//!
//! let raw = HashMap::from([
//!     ("flowRate".to_string(), "10".to_string()),
//!     ("pipeDiameter".to_string(), "50".to_string()),
//!     ("lossCoefficient".to_string(), "0,75".to_string()),
//! ]);
//! let result = compute("head-loss", &raw, &HashMap::new(), fields_for("head-loss"));
//! let h = result.number("Perda de Carga (m)").unwrap();
//! assert!((h - 0.992).abs() < 1e-3);
//! ```

pub mod flow_velocity;
pub mod head_loss;
pub mod pipe_flow;
pub mod pressure_drop;
pub mod pump_power;
pub mod reynolds_number;

use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fields::{CalculationField, FieldKind};
use crate::results::{labels, ResultMap};
use crate::steps::CalculationStep;
use crate::units::convert_unit;

pub use reynolds_number::FlowRegime;

/// Standard gravity used by the head and power formulas, m/s²
pub const GRAVITY: f64 = 9.81;

/// Water density assumed when a calculation has no density field, kg/m³
pub const WATER_DENSITY: f64 = 1000.0;

// ============================================================================
// Catalog
// ============================================================================

/// The six calculations the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationKind {
    HeadLoss,
    PipeFlow,
    PressureDrop,
    PumpPower,
    FlowVelocity,
    ReynoldsNumber,
}

impl CalculationKind {
    /// Catalog order.
    pub const ALL: [CalculationKind; 6] = [
        CalculationKind::HeadLoss,
        CalculationKind::PipeFlow,
        CalculationKind::PressureDrop,
        CalculationKind::PumpPower,
        CalculationKind::FlowVelocity,
        CalculationKind::ReynoldsNumber,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CalculationKind::HeadLoss => "head-loss",
            CalculationKind::PipeFlow => "pipe-flow",
            CalculationKind::PressureDrop => "pressure-drop",
            CalculationKind::PumpPower => "pump-power",
            CalculationKind::FlowVelocity => "flow-velocity",
            CalculationKind::ReynoldsNumber => "reynolds-number",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Display title; also the `type` of history entries.
    pub fn title(self) -> &'static str {
        match self {
            CalculationKind::HeadLoss => "Perda de Carga Localizada",
            CalculationKind::PipeFlow => "Vazão em Tubulações",
            CalculationKind::PressureDrop => "Perda de Pressão",
            CalculationKind::PumpPower => "Potência da Bomba",
            CalculationKind::FlowVelocity => "Velocidade do Fluxo",
            CalculationKind::ReynoldsNumber => "Número de Reynolds",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CalculationKind::HeadLoss => {
                "Calcule perdas de pressão em conexões, válvulas e componentes"
            }
            CalculationKind::PipeFlow => "Determine a vazão através de tubos usando vários métodos",
            CalculationKind::PressureDrop => "Calcule a perda de pressão ao longo de tubulações",
            CalculationKind::PumpPower => "Calcule a potência necessária e eficiência da bomba",
            CalculationKind::FlowVelocity => "Determine a velocidade do fluido em tubos e canais",
            CalculationKind::ReynoldsNumber => {
                "Calcule o número de Reynolds para determinação do regime de fluxo"
            }
        }
    }

    /// Grouping used by the catalog listing.
    pub fn category(self) -> &'static str {
        match self {
            CalculationKind::HeadLoss | CalculationKind::PressureDrop => "Perda de Pressão",
            CalculationKind::PipeFlow
            | CalculationKind::FlowVelocity
            | CalculationKind::ReynoldsNumber => "Análise de Fluxo",
            CalculationKind::PumpPower => "Projeto de Bombas",
        }
    }

    pub fn fields(self) -> &'static [CalculationField] {
        match self {
            CalculationKind::HeadLoss => head_loss::FIELDS,
            CalculationKind::PipeFlow => pipe_flow::FIELDS,
            CalculationKind::PressureDrop => pressure_drop::FIELDS,
            CalculationKind::PumpPower => pump_power::FIELDS,
            CalculationKind::FlowVelocity => flow_velocity::FIELDS,
            CalculationKind::ReynoldsNumber => reynolds_number::FIELDS,
        }
    }

    /// Apply the formula to already-normalized SI inputs.
    ///
    /// A number that overflows along the way is reported as `0`.
    pub fn calculate(self, inputs: &NormalizedInputs) -> ResultMap {
        let result = match self {
            CalculationKind::HeadLoss => head_loss::calculate(inputs),
            CalculationKind::PipeFlow => pipe_flow::calculate(inputs),
            CalculationKind::PressureDrop => pressure_drop::calculate(inputs),
            CalculationKind::PumpPower => pump_power::calculate(inputs),
            CalculationKind::FlowVelocity => flow_velocity::calculate(inputs),
            CalculationKind::ReynoldsNumber => reynolds_number::calculate(inputs),
        };
        result.zero_non_finite()
    }

    pub fn steps(self, inputs: &NormalizedInputs) -> Vec<CalculationStep> {
        match self {
            CalculationKind::HeadLoss => head_loss::steps(inputs),
            CalculationKind::PipeFlow => pipe_flow::steps(inputs),
            CalculationKind::PressureDrop => pressure_drop::steps(inputs),
            CalculationKind::PumpPower => pump_power::steps(inputs),
            CalculationKind::FlowVelocity => flow_velocity::steps(inputs),
            CalculationKind::ReynoldsNumber => reynolds_number::steps(inputs),
        }
    }
}

impl std::fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

/// Every calculation, in catalog order.
pub fn catalog() -> Vec<CatalogEntry> {
    CalculationKind::ALL
        .into_iter()
        .map(|kind| CatalogEntry {
            id: kind.id(),
            title: kind.title(),
            description: kind.description(),
            category: kind.category(),
        })
        .collect()
}

// ============================================================================
// Normalization
// ============================================================================

/// Field name → value in the field's SI base unit (fractions for percentages).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInputs {
    values: HashMap<String, f64>,
}

impl NormalizedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Builder form of [`NormalizedInputs::insert`].
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of `name`, or `0` when the field was never supplied.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// Whether the calculation's schema defines `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse a user-typed number, accepting a decimal comma.
///
/// `None` for empty, unparseable or non-finite input.
pub fn try_parse_input(raw: &str) -> Option<f64> {
    raw.trim()
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Lenient form of [`try_parse_input`]: anything it rejects becomes `0`.
pub fn parse_input(raw: &str) -> f64 {
    try_parse_input(raw).unwrap_or(0.0)
}

/// Normalize one raw value according to its field definition.
pub fn normalize_value(field: &CalculationField, raw: &str, selected_unit: Option<&str>) -> f64 {
    let parsed = parse_input(raw);
    match field.kind {
        FieldKind::Coefficient => parsed,
        FieldKind::Percentage => parsed / 100.0,
        FieldKind::Numeric => match field.category {
            Some(category) => {
                let from = selected_unit.unwrap_or(field.default_input_unit);
                convert_unit(parsed, from, field.base_unit, category)
            }
            None => parsed,
        },
    }
}

/// Normalize every field of `fields`; fields absent from `raw` count as `0`.
pub fn normalize_inputs(
    fields: &[CalculationField],
    raw_inputs: &HashMap<String, String>,
    selected_units: &HashMap<String, String>,
) -> NormalizedInputs {
    let mut normalized = NormalizedInputs::new();
    for field in fields {
        let raw = raw_inputs.get(field.name).map(String::as_str).unwrap_or("");
        let unit = selected_units.get(field.name).map(String::as_str);
        normalized.insert(field.name, normalize_value(field, raw, unit));
    }
    normalized
}

// ============================================================================
// Entry Points
// ============================================================================

/// Result map returned for an id outside the catalog.
pub fn not_implemented() -> ResultMap {
    ResultMap::new().with(labels::NOT_IMPLEMENTED_KEY, labels::NOT_IMPLEMENTED)
}

/// Normalize raw inputs and run the calculation named by `calculation_id`.
///
/// Deterministic and infallible; see the module docs for the failure policy.
pub fn compute(
    calculation_id: &str,
    raw_inputs: &HashMap<String, String>,
    selected_units: &HashMap<String, String>,
    fields: &[CalculationField],
) -> ResultMap {
    let Some(kind) = CalculationKind::from_id(calculation_id) else {
        debug!(calculation = calculation_id, "unknown calculation id");
        return not_implemented();
    };

    let inputs = normalize_inputs(fields, raw_inputs, selected_units);
    let result = kind.calculate(&inputs);
    debug!(calculation = calculation_id, ?inputs, ?result, "computed");
    result
}

/// Worked steps for the same inputs [`compute`] would use. Empty for an
/// unknown id.
pub fn compute_steps(
    calculation_id: &str,
    raw_inputs: &HashMap<String, String>,
    selected_units: &HashMap<String, String>,
    fields: &[CalculationField],
) -> Vec<CalculationStep> {
    match CalculationKind::from_id(calculation_id) {
        Some(kind) => kind.steps(&normalize_inputs(fields, raw_inputs, selected_units)),
        None => Vec::new(),
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Circular cross-section area from diameter, m².
pub(crate) fn circle_area(diameter: f64) -> f64 {
    let radius = diameter / 2.0;
    PI * radius * radius
}

/// `numerator / denominator`, or `0` when the denominator is not positive.
pub(crate) fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
