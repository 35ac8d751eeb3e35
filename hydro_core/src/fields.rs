//! # Field Schema
//!
//! Input field definitions for every calculation. Each field carries its
//! unit category explicitly, so normalization never has to guess a category
//! from the field name.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::fields::{fields_for, FieldKind};
//!
//! let fields = fields_for("pump-power");
//! assert_eq!(fields.len(), 4);
//! assert_eq!(fields[3].name, "pumpEfficiency");
//! assert_eq!(fields[3].kind, FieldKind::Percentage);
//!
//! // Unknown ids degrade to a single generic field
//! assert_eq!(fields_for("nope")[0].name, "param1");
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::CalculationKind;
use crate::units::{UnitCategory, UnitOption};

/// How a field's raw value is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Physical quantity converted to its category's base unit
    Numeric,
    /// Entered in `%`, normalized to a 0–1 fraction
    Percentage,
    /// Dimensionless, never converted
    Coefficient,
}

/// One input of a calculation form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationField {
    /// Unique key within the calculation
    pub name: &'static str,
    pub label: &'static str,
    /// `None` for percentage and coefficient fields
    pub category: Option<UnitCategory>,
    pub base_unit: &'static str,
    pub default_input_unit: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl CalculationField {
    /// A unit-bearing field normalized to `category`'s base unit.
    pub const fn numeric(
        name: &'static str,
        label: &'static str,
        category: UnitCategory,
        base_unit: &'static str,
        default_input_unit: &'static str,
    ) -> Self {
        CalculationField {
            name,
            label,
            category: Some(category),
            base_unit,
            default_input_unit,
            kind: FieldKind::Numeric,
            placeholder: None,
        }
    }

    /// A field entered in percent.
    pub const fn percentage(name: &'static str, label: &'static str) -> Self {
        CalculationField {
            name,
            label,
            category: None,
            base_unit: "%",
            default_input_unit: "%",
            kind: FieldKind::Percentage,
            placeholder: None,
        }
    }

    /// A dimensionless coefficient.
    pub const fn coefficient(name: &'static str, label: &'static str) -> Self {
        CalculationField {
            name,
            label,
            category: None,
            base_unit: "",
            default_input_unit: "",
            kind: FieldKind::Coefficient,
            placeholder: None,
        }
    }

    pub const fn with_placeholder(self, placeholder: &'static str) -> Self {
        CalculationField {
            placeholder: Some(placeholder),
            ..self
        }
    }

    /// Units the user may choose from. Empty for percentage/coefficient fields.
    pub fn unit_options(&self) -> &'static [UnitOption] {
        match self.category {
            Some(category) => category.options(),
            None => &[],
        }
    }

    /// Unit shown next to the value in summaries (`%` for percentages).
    pub fn display_unit<'a>(&self, selected: Option<&'a str>) -> &'a str {
        match self.kind {
            FieldKind::Numeric => selected.unwrap_or(self.default_input_unit),
            FieldKind::Percentage | FieldKind::Coefficient => self.default_input_unit,
        }
    }
}

/// Form shown for a calculation id the catalog does not know.
pub const FALLBACK_FIELDS: &[CalculationField] = &[CalculationField {
    name: "param1",
    label: "Parâmetro 1",
    category: None,
    base_unit: "",
    default_input_unit: "",
    kind: FieldKind::Numeric,
    placeholder: Some("Valor"),
}];

/// Ordered input fields for `calculation_id`.
///
/// Never fails: an unknown id yields [`FALLBACK_FIELDS`].
pub fn fields_for(calculation_id: &str) -> &'static [CalculationField] {
    match CalculationKind::from_id(calculation_id) {
        Some(kind) => kind.fields(),
        None => FALLBACK_FIELDS,
    }
}
