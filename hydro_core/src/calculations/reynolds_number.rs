//! # Reynolds Number
//!
//! ```text
//! Re = V·D / ν
//! ```
//!
//! ## Flow Regime
//!
//! | Range                 | Regime     |
//! |-----------------------|------------|
//! | `Re < 2300`           | laminar    |
//! | `2300 ≤ Re ≤ 4000`    | transition |
//! | `Re > 4000`           | turbulent  |
//!
//! Both transition bounds are inclusive.

use crate::fields::CalculationField;
use crate::results::{labels, ResultMap};
use crate::steps::{quantity, CalculationStep, KNOWN_VALUES};
use crate::units::UnitCategory;

use super::{guarded_div, NormalizedInputs};

/// Upper bound of laminar flow (exclusive)
pub const LAMINAR_LIMIT: f64 = 2300.0;

/// Upper bound of transitional flow (inclusive)
pub const TURBULENT_LIMIT: f64 = 4000.0;

pub const FIELDS: &[CalculationField] = &[
    CalculationField::numeric(
        "fluidVelocity",
        "Velocidade (V)",
        UnitCategory::Velocity,
        "m/s",
        "m/s",
    )
    .with_placeholder("Ex: 1.5"),
    CalculationField::numeric(
        "characteristicLength",
        "Diâmetro Hidráulico (D)",
        UnitCategory::Diameter,
        "m",
        "mm",
    )
    .with_placeholder("Ex: 100"),
    CalculationField::numeric(
        "kinematicViscosity",
        "Viscosidade Cinemática (ν)",
        UnitCategory::KinematicViscosity,
        "m2/s",
        "cSt",
    )
    .with_placeholder("Ex: 1"),
];

/// Flow regime classified from a Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Transition,
    Turbulent,
}

impl FlowRegime {
    pub fn classify(reynolds: f64) -> Self {
        if reynolds < LAMINAR_LIMIT {
            FlowRegime::Laminar
        } else if reynolds <= TURBULENT_LIMIT {
            FlowRegime::Transition
        } else {
            FlowRegime::Turbulent
        }
    }

    /// Text reported under [`labels::FLOW_REGIME`].
    pub fn description(self) -> &'static str {
        match self {
            FlowRegime::Laminar => "Laminar (Re < 2300)",
            FlowRegime::Transition => "Transição (2300 <= Re <= 4000)",
            FlowRegime::Turbulent => "Turbulento (Re > 4000)",
        }
    }
}

fn reynolds(inputs: &NormalizedInputs) -> f64 {
    guarded_div(
        inputs.get("fluidVelocity") * inputs.get("characteristicLength"),
        inputs.get("kinematicViscosity"),
    )
}

pub fn calculate(inputs: &NormalizedInputs) -> ResultMap {
    let re = reynolds(inputs);
    ResultMap::new()
        .with(labels::REYNOLDS_NUMBER, re)
        .with(labels::FLOW_REGIME, FlowRegime::classify(re).description())
}

pub fn steps(inputs: &NormalizedInputs) -> Vec<CalculationStep> {
    let v = inputs.get("fluidVelocity");
    let d = inputs.get("characteristicLength");
    let nu = inputs.get("kinematicViscosity");
    let re = reynolds(inputs);

    vec![
        CalculationStep::new(
            1,
            KNOWN_VALUES,
            "Re = V·D/ν",
            format!(
                "V = {}, D = {}, ν = {}",
                quantity(v, "m/s"),
                quantity(d, "m"),
                quantity(nu, "m²/s")
            ),
            "Valores identificados e convertidos",
        ),
        CalculationStep::new(
            2,
            "Calcular o número de Reynolds",
            "Re = V·D/ν",
            format!("Re = {}·{} / {}", quantity(v, ""), quantity(d, ""), quantity(nu, "")),
            quantity(re, ""),
        ),
        CalculationStep::new(
            3,
            "Determinar o regime de fluxo",
            "Re < 2300 laminar, 2300 ≤ Re ≤ 4000 transição, Re > 4000 turbulento",
            format!("Re = {}", quantity(re, "")),
            FlowRegime::classify(re).description(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reynolds_turbulent() {
        let inputs = NormalizedInputs::new()
            .with("fluidVelocity", 1.0)
            .with("characteristicLength", 0.05)
            .with("kinematicViscosity", 1e-6);
        let result = calculate(&inputs);
        assert_relative_eq!(
            result.number(labels::REYNOLDS_NUMBER).unwrap(),
            50_000.0,
            max_relative = 1e-12
        );
        assert_eq!(result.text(labels::FLOW_REGIME), Some("Turbulento (Re > 4000)"));
    }

    #[test]
    fn test_regime_boundaries() {
        assert_eq!(FlowRegime::classify(2299.999), FlowRegime::Laminar);
        assert_eq!(FlowRegime::classify(2300.0), FlowRegime::Transition);
        assert_eq!(FlowRegime::classify(4000.0), FlowRegime::Transition);
        assert_eq!(FlowRegime::classify(4000.001), FlowRegime::Turbulent);
        assert_eq!(
            FlowRegime::classify(2300.0).description(),
            "Transição (2300 <= Re <= 4000)"
        );
    }

    #[test]
    fn test_zero_viscosity_is_laminar_zero() {
        let inputs = NormalizedInputs::new()
            .with("fluidVelocity", 1.0)
            .with("characteristicLength", 0.05);
        let result = calculate(&inputs);
        assert_eq!(result.number(labels::REYNOLDS_NUMBER), Some(0.0));
        assert_eq!(result.text(labels::FLOW_REGIME), Some("Laminar (Re < 2300)"));
    }

    #[test]
    fn test_steps_report_regime() {
        let inputs = NormalizedInputs::new()
            .with("fluidVelocity", 1.0)
            .with("characteristicLength", 0.05)
            .with("kinematicViscosity", 1e-6);
        let steps = steps(&inputs);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].result, "Turbulento (Re > 4000)");
    }
}
