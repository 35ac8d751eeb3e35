//! # Calculation History
//!
//! Value types for completed calculations and the usage streak, plus the
//! [`HistoryStore`] seam the front end persists through.
//!
//! ## Structure
//!
//! ```text
//! HistoryState
//! ├── history: History (newest first, at most HISTORY_CAP entries)
//! │   └── CalculationHistoryEntry (id, type, timestamp, inputs, result, steps)
//! └── streak: Streak (consecutive days with a calculation)
//! ```
//!
//! The engine never touches storage; it only builds these values. A store
//! implementation ([`MemoryHistoryStore`] here, a JSON file store in
//! `file_io`) decides where they live.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculations::{parse_input, CalculationKind};
use crate::errors::HydroResult;
use crate::fields::CalculationField;
use crate::format::format_number;
use crate::ordered_map::OrderedMap;
use crate::results::ResultMap;
use crate::steps::CalculationStep;

/// Maximum number of retained history entries
pub const HISTORY_CAP: usize = 50;

// ============================================================================
// Entries
// ============================================================================

/// One completed calculation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationHistoryEntry {
    /// `<calculation id>-<unix millis>`
    pub id: String,

    pub calculation_id: String,

    /// Calculation title, e.g. "Potência da Bomba"
    #[serde(rename = "type")]
    pub title: String,

    pub timestamp: DateTime<Utc>,

    /// Field name → `"<formatted value> <unit>"`, in form order
    pub inputs: OrderedMap<String>,

    pub result: ResultMap,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<CalculationStep>,
}

impl CalculationHistoryEntry {
    /// Build the entry for a finished calculation.
    ///
    /// Input values are re-rendered from the raw strings with the default
    /// number format, followed by the unit the user had selected.
    pub fn new(
        kind: CalculationKind,
        fields: &[CalculationField],
        raw_inputs: &HashMap<String, String>,
        selected_units: &HashMap<String, String>,
        result: ResultMap,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let inputs = fields
            .iter()
            .map(|field| {
                let raw = raw_inputs.get(field.name).map(String::as_str).unwrap_or("");
                let unit = field.display_unit(selected_units.get(field.name).map(String::as_str));
                let value = format_number(parse_input(raw));
                let shown = if unit.is_empty() {
                    value
                } else {
                    format!("{value} {unit}")
                };
                (field.name.to_string(), shown)
            })
            .collect();

        CalculationHistoryEntry {
            id: format!("{}-{}", kind.id(), timestamp.timestamp_millis()),
            calculation_id: kind.id().to_string(),
            title: kind.title().to_string(),
            timestamp,
            inputs,
            result,
            steps: Vec::new(),
        }
    }

    /// Attach the worked steps.
    pub fn with_steps(mut self, steps: Vec<CalculationStep>) -> Self {
        self.steps = steps;
        self
    }

    /// Calendar day of the entry in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

/// Newest-first list of entries, capped at [`HISTORY_CAP`].
///
/// Eviction is FIFO by insertion order, independent of timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<CalculationHistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries already in newest-first order, dropping any past the cap.
    pub fn from_entries(mut entries: Vec<CalculationHistoryEntry>) -> Self {
        entries.truncate(HISTORY_CAP);
        History { entries }
    }

    /// Add `entry` as the newest; returns the evicted oldest entry, if any.
    pub fn push(&mut self, entry: CalculationHistoryEntry) -> Option<CalculationHistoryEntry> {
        self.entries.insert(0, entry);
        if self.entries.len() > HISTORY_CAP {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[CalculationHistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&CalculationHistoryEntry> {
        self.entries.first()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Streak
// ============================================================================

/// Consecutive calendar days with at least one calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub count: u32,
    pub last_calculation: Option<NaiveDate>,
}

impl Streak {
    /// Record a calculation made on `today` and return the new count.
    ///
    /// - first calculation: 1
    /// - same day: unchanged
    /// - the next day: +1
    /// - after a gap: back to 1
    /// - a day before the last one (clock skew): ignored
    pub fn record(&mut self, today: NaiveDate) -> u32 {
        match self.last_calculation {
            None => {
                self.count = 1;
                self.last_calculation = Some(today);
            }
            Some(last) => {
                let days = (today - last).num_days();
                if days < 0 {
                    return self.count;
                }
                match days {
                    0 => {}
                    1 => self.count += 1,
                    _ => self.count = 1,
                }
                self.last_calculation = Some(today);
            }
        }
        self.count
    }
}

// ============================================================================
// Store
// ============================================================================

/// Everything a history store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    pub history: History,
    pub streak: Streak,
}

impl HistoryState {
    /// Push the entry and advance the streak by the entry's local date.
    pub fn record(&mut self, entry: CalculationHistoryEntry) {
        self.streak.record(entry.local_date());
        self.history.push(entry);
    }
}

/// Persistence seam for history and streak.
pub trait HistoryStore {
    /// Current state; an empty state when nothing was stored yet.
    fn load(&self) -> HydroResult<HistoryState>;

    /// Record `entry` (history and streak) and return the new state.
    fn append(&mut self, entry: CalculationHistoryEntry) -> HydroResult<HistoryState>;

    /// Remove every history entry. The streak is kept.
    fn clear(&mut self) -> HydroResult<()>;
}

/// Store that keeps state in memory, for tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    state: HistoryState,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> HydroResult<HistoryState> {
        Ok(self.state.clone())
    }

    fn append(&mut self, entry: CalculationHistoryEntry) -> HydroResult<HistoryState> {
        info!(id = %entry.id, "history entry recorded");
        self.state.record(entry);
        Ok(self.state.clone())
    }

    fn clear(&mut self) -> HydroResult<()> {
        info!(entries = self.state.history.len(), "history cleared");
        self.state.history.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::fields_for;
    use crate::results::labels;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(n: i64) -> CalculationHistoryEntry {
        let timestamp = Utc.timestamp_millis_opt(1_700_000_000_000 + n).unwrap();
        CalculationHistoryEntry::new(
            CalculationKind::FlowVelocity,
            fields_for("flow-velocity"),
            &HashMap::new(),
            &HashMap::new(),
            ResultMap::new().with(labels::VELOCITY, n as f64),
            timestamp,
        )
    }

    #[test]
    fn test_entry_shape() {
        let raw = HashMap::from([
            ("flowRate".to_string(), "36".to_string()),
            ("head".to_string(), "20".to_string()),
            ("fluidDensity".to_string(), "1000".to_string()),
            ("pumpEfficiency".to_string(), "75".to_string()),
        ]);
        let units = HashMap::from([("head".to_string(), "ft".to_string())]);
        let timestamp = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let entry = CalculationHistoryEntry::new(
            CalculationKind::PumpPower,
            fields_for("pump-power"),
            &raw,
            &units,
            ResultMap::new(),
            timestamp,
        );

        assert_eq!(entry.id, "pump-power-1700000000123");
        assert_eq!(entry.title, "Potência da Bomba");
        assert_eq!(entry.inputs["flowRate"], "36,000 m3/h");
        assert_eq!(entry.inputs["head"], "20,000 ft");
        assert_eq!(entry.inputs["fluidDensity"], "1.000,000 kg/m3");
        assert_eq!(entry.inputs["pumpEfficiency"], "75,000 %");
        // Form order, not alphabetical
        let names: Vec<_> = entry.inputs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["flowRate", "head", "fluidDensity", "pumpEfficiency"]);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"Potência da Bomba\""));
        assert!(json.contains("\"calculationId\":\"pump-power\""));
        assert!(!json.contains("\"steps\""));
        let roundtrip: CalculationHistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, entry);
        let names: Vec<_> = roundtrip.inputs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["flowRate", "head", "fluidDensity", "pumpEfficiency"]);
    }

    #[test]
    fn test_history_cap_evicts_oldest() {
        let mut history = History::new();
        for n in 0..HISTORY_CAP as i64 {
            assert!(history.push(entry(n)).is_none());
        }
        let evicted = history.push(entry(50)).unwrap();
        assert_eq!(evicted, entry(0));
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.latest(), Some(&entry(50)));
        assert_eq!(history.entries().last(), Some(&entry(1)));
    }

    #[test]
    fn test_from_entries_truncates() {
        let entries: Vec<_> = (0..60).map(entry).collect();
        let history = History::from_entries(entries);
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.latest(), Some(&entry(0)));
    }

    #[test]
    fn test_streak() {
        let mut streak = Streak::default();
        assert_eq!(streak.record(date(2024, 3, 1)), 1);
        assert_eq!(streak.record(date(2024, 3, 1)), 1);
        assert_eq!(streak.record(date(2024, 3, 2)), 2);
        assert_eq!(streak.record(date(2024, 3, 3)), 3);
        // Gap of two days resets
        assert_eq!(streak.record(date(2024, 3, 5)), 1);
        assert_eq!(streak.last_calculation, Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_streak_ignores_earlier_dates() {
        let mut streak = Streak {
            count: 4,
            last_calculation: Some(date(2024, 3, 10)),
        };
        assert_eq!(streak.record(date(2024, 3, 8)), 4);
        assert_eq!(streak.last_calculation, Some(date(2024, 3, 10)));
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let mut streak = Streak {
            count: 2,
            last_calculation: Some(date(2024, 2, 29)),
        };
        assert_eq!(streak.record(date(2024, 3, 1)), 3);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryHistoryStore::new();
        assert!(store.load().unwrap().history.is_empty());

        let state = store.append(entry(1)).unwrap();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.streak.count, 1);

        store.clear().unwrap();
        let state = store.load().unwrap();
        assert!(state.history.is_empty());
        assert_eq!(state.streak.count, 1);
    }
}
