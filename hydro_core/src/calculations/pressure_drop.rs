//! # Pressure Drop (Darcy–Weisbach)
//!
//! Distributed pressure loss along a straight pipe:
//!
//! ```text
//! V  = Q / (π·(D/2)²)
//! ΔP = f·(L/D)·(ρ·V²/2)
//! ```
//!
//! ## Limitations
//!
//! The friction factor is fixed at `f = 0.02` rather than computed from
//! Reynolds number and relative roughness. The roughness input is collected
//! but does not enter the formula. The result reports the assumed factor
//! alongside the pressure loss so it is never mistaken for a computed one.
//!
//! Density is `1000 kg/m³` unless the schema defines a `fluidDensity` field.

use crate::fields::CalculationField;
use crate::results::{labels, ResultMap};
use crate::steps::{quantity, CalculationStep, KNOWN_VALUES};
use crate::units::UnitCategory;

use super::{circle_area, guarded_div, NormalizedInputs, WATER_DENSITY};

/// Darcy friction factor used in place of a Colebrook solution
pub const ASSUMED_FRICTION_FACTOR: f64 = 0.02;

/// Value reported under [`labels::FRICTION_FACTOR`]
pub const FRICTION_FACTOR_NOTE: &str = "0.02 (assumido)";

pub const FIELDS: &[CalculationField] = &[
    CalculationField::numeric("flowRate", "Vazão", UnitCategory::FlowRate, "m3/s", "L/s")
        .with_placeholder("Ex: 10"),
    CalculationField::numeric("pipeLength", "Comprimento", UnitCategory::Length, "m", "m")
        .with_placeholder("Ex: 50"),
    CalculationField::numeric(
        "pipeDiameter",
        "Diâmetro Interno",
        UnitCategory::Diameter,
        "m",
        "mm",
    )
    .with_placeholder("Ex: 50"),
    CalculationField::numeric(
        "roughness",
        "Rugosidade (ε)",
        UnitCategory::Diameter,
        "m",
        "mm",
    )
    .with_placeholder("Ex: 0.05"),
];

struct PressureDrop {
    density: f64,
    velocity: f64,
    length_ratio: f64,
    dynamic_pressure: f64,
    pressure_drop: f64,
}

fn evaluate(inputs: &NormalizedInputs) -> PressureDrop {
    let density = if inputs.contains("fluidDensity") {
        inputs.get("fluidDensity")
    } else {
        WATER_DENSITY
    };
    let diameter = inputs.get("pipeDiameter");
    let velocity = guarded_div(inputs.get("flowRate"), circle_area(diameter));
    let length_ratio = guarded_div(inputs.get("pipeLength"), diameter);
    let dynamic_pressure = density * velocity * velocity / 2.0;

    PressureDrop {
        density,
        velocity,
        length_ratio,
        dynamic_pressure,
        pressure_drop: ASSUMED_FRICTION_FACTOR * length_ratio * dynamic_pressure,
    }
}

pub fn calculate(inputs: &NormalizedInputs) -> ResultMap {
    ResultMap::new()
        .with(labels::PRESSURE_LOSS, evaluate(inputs).pressure_drop)
        .with(labels::FRICTION_FACTOR, FRICTION_FACTOR_NOTE)
}

pub fn steps(inputs: &NormalizedInputs) -> Vec<CalculationStep> {
    let r = evaluate(inputs);

    vec![
        CalculationStep::new(
            1,
            KNOWN_VALUES,
            "ΔP = f·(L/D)·(ρ·V²/2)",
            format!(
                "Q = {}, L = {}, D = {}, f = {}, ρ = {}",
                quantity(inputs.get("flowRate"), "m³/s"),
                quantity(inputs.get("pipeLength"), "m"),
                quantity(inputs.get("pipeDiameter"), "m"),
                FRICTION_FACTOR_NOTE,
                quantity(r.density, "kg/m³")
            ),
            "Valores identificados e convertidos",
        ),
        CalculationStep::new(
            2,
            "Calcular a velocidade do fluxo",
            "V = Q/(π·(D/2)²)",
            format!(
                "V = {} / (π·({}/2)²)",
                quantity(inputs.get("flowRate"), ""),
                quantity(inputs.get("pipeDiameter"), "")
            ),
            quantity(r.velocity, "m/s"),
        ),
        CalculationStep::new(
            3,
            "Calcular L/D",
            "L/D",
            format!(
                "{} / {}",
                quantity(inputs.get("pipeLength"), ""),
                quantity(inputs.get("pipeDiameter"), "")
            ),
            quantity(r.length_ratio, ""),
        ),
        CalculationStep::new(
            4,
            "Calcular ρV²/2",
            "ρ·V²/2",
            format!("{}·{}²/2", quantity(r.density, ""), quantity(r.velocity, "")),
            quantity(r.dynamic_pressure, "Pa"),
        ),
        CalculationStep::new(
            5,
            "Calcular a perda de pressão",
            "ΔP = f·(L/D)·(ρ·V²/2)",
            format!(
                "ΔP = {}·{}·{}",
                quantity(ASSUMED_FRICTION_FACTOR, ""),
                quantity(r.length_ratio, ""),
                quantity(r.dynamic_pressure, "")
            ),
            quantity(r.pressure_drop, "Pa"),
        ),
    ]
}
