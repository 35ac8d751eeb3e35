//! # Pipe Flow (Hagen–Poiseuille)
//!
//! Volumetric flow through a circular pipe under a pressure difference,
//! assuming fully developed laminar flow:
//!
//! ```text
//! Q = π·ΔP·D⁴ / (128·μ·L)
//! ```
//!
//! The result is only physically meaningful for `Re < 2300`; no regime check
//! is made here.

use std::f64::consts::PI;

use crate::fields::CalculationField;
use crate::results::{labels, ResultMap};
use crate::steps::{quantity, CalculationStep, KNOWN_VALUES};
use crate::units::UnitCategory;

use super::{guarded_div, NormalizedInputs};

pub const FIELDS: &[CalculationField] = &[
    CalculationField::numeric(
        "pressureDifference",
        "Diferença de Pressão",
        UnitCategory::Pressure,
        "Pa",
        "kPa",
    )
    .with_placeholder("Ex: 10"),
    CalculationField::numeric(
        "pipeLength",
        "Comprimento da Tubulação",
        UnitCategory::Length,
        "m",
        "m",
    )
    .with_placeholder("Ex: 100"),
    CalculationField::numeric(
        "pipeDiameter",
        "Diâmetro da Tubulação",
        UnitCategory::Diameter,
        "m",
        "mm",
    )
    .with_placeholder("Ex: 50"),
    CalculationField::numeric(
        "fluidViscosity",
        "Viscosidade Dinâmica (µ)",
        UnitCategory::DynamicViscosity,
        "Pa·s",
        "cP",
    )
    .with_placeholder("Ex: 1"),
];

fn terms(inputs: &NormalizedInputs) -> (f64, f64) {
    let dp = inputs.get("pressureDifference");
    let l = inputs.get("pipeLength");
    let d = inputs.get("pipeDiameter");
    let mu = inputs.get("fluidViscosity");
    (PI * dp * d.powi(4), 128.0 * mu * l)
}

pub fn calculate(inputs: &NormalizedInputs) -> ResultMap {
    let (numerator, denominator) = terms(inputs);
    ResultMap::new().with(labels::FLOW_RATE, guarded_div(numerator, denominator))
}

pub fn steps(inputs: &NormalizedInputs) -> Vec<CalculationStep> {
    let (numerator, denominator) = terms(inputs);
    let q = guarded_div(numerator, denominator);

    vec![
        CalculationStep::new(
            1,
            KNOWN_VALUES,
            "Q = π·ΔP·D⁴/(128·μ·L)",
            format!(
                "ΔP = {}, L = {}, D = {}, μ = {}",
                quantity(inputs.get("pressureDifference"), "Pa"),
                quantity(inputs.get("pipeLength"), "m"),
                quantity(inputs.get("pipeDiameter"), "m"),
                quantity(inputs.get("fluidViscosity"), "Pa·s")
            ),
            "Valores identificados e convertidos",
        ),
        CalculationStep::new(
            2,
            "Calcular o numerador",
            "π·ΔP·D⁴",
            format!(
                "π·{}·{}⁴",
                quantity(inputs.get("pressureDifference"), ""),
                quantity(inputs.get("pipeDiameter"), "")
            ),
            quantity(numerator, ""),
        ),
        CalculationStep::new(
            3,
            "Calcular o denominador",
            "128·μ·L",
            format!(
                "128·{}·{}",
                quantity(inputs.get("fluidViscosity"), ""),
                quantity(inputs.get("pipeLength"), "")
            ),
            quantity(denominator, ""),
        ),
        CalculationStep::new(
            4,
            "Calcular a vazão",
            "Q = numerador/denominador",
            format!("Q = {} / {}", quantity(numerator, ""), quantity(denominator, "")),
            quantity(q, "m³/s"),
        ),
    ]
}
