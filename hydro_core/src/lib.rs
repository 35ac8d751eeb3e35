//! # hydro_core - Hydraulic Calculation Engine
//!
//! `hydro_core` is the computational heart of HydroCalc: unit conversion,
//! calculation form schemas, six closed-form hydraulic formulas and result
//! formatting. Every input and output type is JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: the engine is pure functions over values
//! - **Never fails**: bad input degrades to `0`, unknown units pass through
//! - **Validation up front**: [`validation`] runs before the engine, not inside it
//! - **Persistence at the edge**: history and settings live in [`file_io`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use hydro_core::{compute, fields_for, format_result_value};
//!
//! let raw = HashMap::from([
//!     ("fluidVelocity".to_string(), "1".to_string()),
//!     ("characteristicLength".to_string(), "50".to_string()),
//!     ("kinematicViscosity".to_string(), "1".to_string()),
//! ]);
//! let result = compute("reynolds-number", &raw, &HashMap::new(), fields_for("reynolds-number"));
//!
//! assert_eq!(result.text("Regime de Fluxo"), Some("Turbulento (Re > 4000)"));
//! let re = result.number("Número de Reynolds").unwrap();
//! assert_eq!(format_result_value("Número de Reynolds", re, None), "50.000,000");
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Unit registry and conversion
//! - [`fields`] - Input field schema per calculation
//! - [`calculations`] - Normalization and the formula engine
//! - [`results`] - Result maps, display units and formatting
//! - [`format`] - Locale-aware number formatting
//! - [`steps`] - Worked calculation steps
//! - [`validation`] - Pre-engine input validation
//! - [`history`] - History entries, cap, streak and the store trait
//! - [`ordered_map`] - Insertion-ordered map behind results and history inputs
//! - [`settings`] - User preferences
//! - [`file_io`] - JSON persistence with atomic saves and locking
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod fields;
pub mod format;
pub mod history;
pub mod ordered_map;
pub mod results;
pub mod settings;
pub mod steps;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{catalog, compute, compute_steps, CalculationKind, NormalizedInputs};
pub use errors::{HydroError, HydroResult};
pub use fields::{fields_for, CalculationField, FieldKind};
pub use format::{format_number, NumberLocale};
pub use history::{CalculationHistoryEntry, History, HistoryStore, Streak, HISTORY_CAP};
pub use results::{format_result_value, result_unit_options, ResultMap, ResultValue};
pub use settings::Settings;
pub use units::{convert_unit, UnitCategory};
pub use validation::{validate_inputs, validate_inputs_in_units};
