//! # Local Head Loss
//!
//! Minor loss through a fitting, valve or other component:
//!
//! ```text
//! A   = π·(D/2)²
//! V   = Q / A              (0 when A ≤ 0)
//! h_L = K·V² / (2g)
//! ```
//!
//! `K` is the dimensionless loss coefficient of the component and is used
//! exactly as entered.

use crate::fields::CalculationField;
use crate::results::{labels, ResultMap};
use crate::steps::{quantity, CalculationStep, KNOWN_VALUES};
use crate::units::UnitCategory;

use super::{circle_area, guarded_div, NormalizedInputs, GRAVITY};

pub const FIELDS: &[CalculationField] = &[
    CalculationField::numeric("flowRate", "Vazão", UnitCategory::FlowRate, "m3/s", "L/s")
        .with_placeholder("Ex: 10"),
    CalculationField::numeric(
        "pipeDiameter",
        "Diâmetro da Tubulação",
        UnitCategory::Diameter,
        "m",
        "mm",
    )
    .with_placeholder("Ex: 50"),
    CalculationField::coefficient("lossCoefficient", "Coeficiente de Perda (K)")
        .with_placeholder("Ex: 0.75"),
];

struct HeadLoss {
    area: f64,
    velocity: f64,
    head_loss: f64,
}

fn evaluate(inputs: &NormalizedInputs) -> HeadLoss {
    let area = circle_area(inputs.get("pipeDiameter"));
    let velocity = guarded_div(inputs.get("flowRate"), area);
    let head_loss = inputs.get("lossCoefficient") * velocity * velocity / (2.0 * GRAVITY);
    HeadLoss {
        area,
        velocity,
        head_loss,
    }
}

pub fn calculate(inputs: &NormalizedInputs) -> ResultMap {
    ResultMap::new().with(labels::HEAD_LOSS, evaluate(inputs).head_loss)
}

pub fn steps(inputs: &NormalizedInputs) -> Vec<CalculationStep> {
    let r = evaluate(inputs);
    let q = inputs.get("flowRate");
    let d = inputs.get("pipeDiameter");
    let k = inputs.get("lossCoefficient");

    vec![
        CalculationStep::new(
            1,
            KNOWN_VALUES,
            "h_L = K·V²/(2g)",
            format!(
                "Q = {}, D = {}, K = {}, g = {}",
                quantity(q, "m³/s"),
                quantity(d, "m"),
                quantity(k, ""),
                quantity(GRAVITY, "m/s²")
            ),
            "Valores identificados e convertidos",
        ),
        CalculationStep::new(
            2,
            "Calcular a área da seção transversal",
            "A = π·(D/2)²",
            format!("A = π·({}/2)²", quantity(d, "m")),
            quantity(r.area, "m²"),
        ),
        CalculationStep::new(
            3,
            "Calcular a velocidade do fluxo",
            "V = Q/A",
            format!("V = {} / {}", quantity(q, "m³/s"), quantity(r.area, "m²")),
            quantity(r.velocity, "m/s"),
        ),
        CalculationStep::new(
            4,
            "Calcular a perda de carga localizada",
            "h_L = K·V²/(2g)",
            format!(
                "h_L = {}·{}²/(2·{})",
                quantity(k, ""),
                quantity(r.velocity, ""),
                quantity(GRAVITY, "")
            ),
            quantity(r.head_loss, "m"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> NormalizedInputs {
        NormalizedInputs::new()
            .with("flowRate", 0.01)
            .with("pipeDiameter", 0.05)
            .with("lossCoefficient", 0.75)
    }

    #[test]
    fn test_head_loss() {
        let result = calculate(&scenario());
        let h = result.number(labels::HEAD_LOSS).unwrap();
        // A ≈ 0.0019635 m², V ≈ 5.093 m/s
        assert_relative_eq!(h, 0.75 * 5.092_958_178_940_651f64.powi(2) / 19.62, max_relative = 1e-9);
        assert_relative_eq!(h, 0.992, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_diameter_gives_zero() {
        let inputs = scenario().with("pipeDiameter", 0.0);
        let h = calculate(&inputs).number(labels::HEAD_LOSS).unwrap();
        assert_eq!(h, 0.0);
        assert!(h.is_finite());
    }

    #[test]
    fn test_zero_coefficient() {
        let inputs = scenario().with("lossCoefficient", 0.0);
        assert_eq!(calculate(&inputs).number(labels::HEAD_LOSS), Some(0.0));
    }

    #[test]
    fn test_steps_end_with_result() {
        let steps = steps(&scenario());
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3].result, "0,992 m");
        assert_eq!(steps[2].result, "5,093 m/s");
    }
}
