//! # Pump Shaft Power
//!
//! ```text
//! P = ρ·g·Q·H / η
//! ```
//!
//! Reported both in W and kW. Efficiency arrives as a fraction (the
//! percentage field is divided by 100 during normalization).

use crate::fields::CalculationField;
use crate::results::{labels, ResultMap};
use crate::steps::{quantity, CalculationStep, KNOWN_VALUES};
use crate::units::UnitCategory;

use super::{guarded_div, NormalizedInputs, GRAVITY};

pub const FIELDS: &[CalculationField] = &[
    CalculationField::numeric("flowRate", "Vazão (Q)", UnitCategory::FlowRate, "m3/s", "m3/h")
        .with_placeholder("Ex: 36"),
    CalculationField::numeric(
        "head",
        "Altura Manométrica (H)",
        UnitCategory::Length,
        "m",
        "m",
    )
    .with_placeholder("Ex: 20"),
    CalculationField::numeric(
        "fluidDensity",
        "Densidade do Fluido (ρ)",
        UnitCategory::Density,
        "kg/m3",
        "kg/m3",
    )
    .with_placeholder("Ex: 1000"),
    CalculationField::percentage("pumpEfficiency", "Eficiência da Bomba (η)")
        .with_placeholder("Ex: 75"),
];

fn hydraulic_power(inputs: &NormalizedInputs) -> f64 {
    inputs.get("fluidDensity") * GRAVITY * inputs.get("flowRate") * inputs.get("head")
}

fn shaft_power(inputs: &NormalizedInputs) -> f64 {
    guarded_div(hydraulic_power(inputs), inputs.get("pumpEfficiency"))
}

pub fn calculate(inputs: &NormalizedInputs) -> ResultMap {
    let watts = shaft_power(inputs);
    ResultMap::new()
        .with(labels::SHAFT_POWER_W, watts)
        .with(labels::SHAFT_POWER_KW, watts / 1000.0)
}

pub fn steps(inputs: &NormalizedInputs) -> Vec<CalculationStep> {
    let hydraulic = hydraulic_power(inputs);
    let shaft = shaft_power(inputs);

    vec![
        CalculationStep::new(
            1,
            KNOWN_VALUES,
            "P = ρ·g·Q·H/η",
            format!(
                "ρ = {}, g = {}, Q = {}, H = {}, η = {}",
                quantity(inputs.get("fluidDensity"), "kg/m³"),
                quantity(GRAVITY, "m/s²"),
                quantity(inputs.get("flowRate"), "m³/s"),
                quantity(inputs.get("head"), "m"),
                quantity(inputs.get("pumpEfficiency"), "")
            ),
            "Valores identificados e convertidos",
        ),
        CalculationStep::new(
            2,
            "Calcular a potência hidráulica",
            "P_h = ρ·g·Q·H",
            format!(
                "P_h = {}·{}·{}·{}",
                quantity(inputs.get("fluidDensity"), ""),
                quantity(GRAVITY, ""),
                quantity(inputs.get("flowRate"), ""),
                quantity(inputs.get("head"), "")
            ),
            quantity(hydraulic, "W"),
        ),
        CalculationStep::new(
            3,
            "Calcular a potência de eixo",
            "P = P_h/η",
            format!(
                "P = {} / {}",
                quantity(hydraulic, ""),
                quantity(inputs.get("pumpEfficiency"), "")
            ),
            quantity(shaft, "W"),
        ),
        CalculationStep::new(
            4,
            "Converter para kW",
            "P_kW = P/1000",
            format!("P_kW = {} / 1000", quantity(shaft, "")),
            quantity(shaft / 1000.0, "kW"),
        ),
    ]
}
