//! # HydroCalc CLI
//!
//! Command-line front end for `hydro_core`. It plays the UI role: validates
//! the form, calls the engine, renders results in the preferred display
//! units and records history.
//!
//! ```text
//! hydrocalc list
//! hydrocalc fields pump-power
//! hydrocalc calc pump-power -i flowRate=36:m3/h -i head=20 -i fluidDensity=1000 -i pumpEfficiency=75
//! hydrocalc calc head-loss -i flowRate=10 -i pipeDiameter=50 -i lossCoefficient=0,75 -r "Perda de Carga (m)=kPa"
//! hydrocalc convert 10 bar psi --category pressure
//! hydrocalc history
//! hydrocalc streak
//! ```

mod tracing;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use hydro_core::file_io::{load_settings, JsonFileHistoryStore};
use hydro_core::format::format_number_with;
use hydro_core::results::{display_result, result_unit_table};
use hydro_core::settings::DEFAULT_SETTINGS_FILE;
use hydro_core::{
    catalog, compute, compute_steps, convert_unit, validate_inputs_in_units, CalculationHistoryEntry,
    CalculationKind, HistoryStore, HydroError, NumberLocale, ResultMap, ResultValue, Settings,
    UnitCategory,
};
use serde::Serialize;
use serde_json::json;

use crate::tracing::setup_tracing;

#[derive(Parser)]
#[command(author, version, about = "Hydraulic calculations from the command line", long_about = None)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// History file, overriding the settings
    #[arg(long, global = true, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Number locale (pt-BR or en-US), overriding the settings
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available calculations
    List,

    /// Show the input fields of a calculation
    Fields { id: String },

    /// Run a calculation
    Calc {
        id: String,
        /// Input as name=value or name=value:unit
        #[arg(short, long = "input", value_parser = parse_input_arg)]
        inputs: Vec<InputArg>,
        /// Display unit for a result, as "label=unit"
        #[arg(short, long = "result-unit", value_parser = parse_result_unit)]
        result_units: Vec<(String, String)>,
        /// Do not record the calculation in history
        #[arg(long, default_value_t = false)]
        no_save: bool,
        /// Print the worked steps
        #[arg(long, default_value_t = false)]
        steps: bool,
    },

    /// Convert a value between two units of a category
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,
        /// Category key, e.g. flowRate, pressure, kinematicViscosity
        #[arg(short, long)]
        category: String,
    },

    /// Show or clear the calculation history
    History {
        #[arg(long, default_value_t = false)]
        clear: bool,
    },

    /// Show the current usage streak
    Streak,
}

#[derive(Debug, Clone)]
struct InputArg {
    name: String,
    value: String,
    unit: Option<String>,
}

fn parse_input_arg(s: &str) -> Result<InputArg, String> {
    let (name, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value[:unit], got '{s}'"))?;
    let (value, unit) = match rest.split_once(':') {
        Some((value, unit)) => (value, Some(unit.trim().to_string())),
        None => (rest, None),
    };
    Ok(InputArg {
        name: name.trim().to_string(),
        value: value.to_string(),
        unit,
    })
}

fn parse_result_unit(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(label, unit)| (label.trim().to_string(), unit.trim().to_string()))
        .ok_or_else(|| format!("expected label=unit, got '{s}'"))
}

/// Resolved settings plus output preferences.
struct Session {
    settings: Settings,
    locale: NumberLocale,
    json: bool,
}

impl Session {
    fn load(cli: &Cli) -> Result<Self> {
        let settings_path = cli
            .settings
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        let mut settings = load_settings(&settings_path)
            .with_context(|| format!("loading settings from {}", settings_path.display()))?;

        if let Some(history) = &cli.history {
            settings.history_file = history.clone();
        }
        if let Some(locale) = &cli.locale {
            if NumberLocale::from_tag(locale).is_none() {
                bail!("unknown locale '{locale}', expected pt-BR or en-US");
            }
            settings.locale = locale.clone();
        }

        Ok(Session {
            locale: settings.number_locale(),
            settings,
            json: cli.json,
        })
    }

    fn store(&self) -> JsonFileHistoryStore {
        JsonFileHistoryStore::new(&self.settings.history_file)
    }

    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.debug)?;
    let ctx = Session::load(&cli)?;

    match &cli.command {
        Commands::List => list(&ctx),
        Commands::Fields { id } => fields(&ctx, id),
        Commands::Calc {
            id,
            inputs,
            result_units,
            no_save,
            steps,
        } => calc(&ctx, id, inputs, result_units, *no_save, *steps),
        Commands::Convert {
            value,
            from,
            to,
            category,
        } => convert(&ctx, *value, from, to, category),
        Commands::History { clear } => history(&ctx, *clear),
        Commands::Streak => streak(&ctx),
    }
}

fn kind_for(id: &str) -> Result<CalculationKind> {
    CalculationKind::from_id(id).ok_or_else(|| HydroError::unknown_calculation(id).into())
}

fn list(ctx: &Session) -> Result<()> {
    let entries = catalog();
    if ctx.json {
        return ctx.print_json(&entries);
    }

    for entry in entries {
        println!("{:<16} {} ({})", entry.id, entry.title, entry.category);
        println!("{:<16} {}", "", entry.description);
    }
    Ok(())
}

fn fields(ctx: &Session, id: &str) -> Result<()> {
    let kind = kind_for(id)?;
    if ctx.json {
        let fields: Vec<_> = kind
            .fields()
            .iter()
            .map(|f| json!({ "field": f, "unitOptions": f.unit_options() }))
            .collect();
        return ctx.print_json(&fields);
    }

    println!("{}", kind.title());
    for field in kind.fields() {
        let options: Vec<_> = field.unit_options().iter().map(|o| o.value).collect();
        let units = if options.is_empty() {
            field.default_input_unit.to_string()
        } else {
            format!("{} [{}]", field.default_input_unit, options.join(", "))
        };
        println!("  {:<22} {:<30} {}", field.name, field.label, units);
    }
    Ok(())
}

/// Display unit for a result: command line first, then settings.
fn target_unit<'a>(
    ctx: &'a Session,
    overrides: &'a [(String, String)],
    label: &str,
) -> Option<&'a str> {
    overrides
        .iter()
        .rev()
        .find(|(l, _)| l == label)
        .map(|(_, unit)| unit.as_str())
        .or_else(|| ctx.settings.display_unit(label))
}

fn render_results(
    ctx: &Session,
    result: &ResultMap,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    result
        .iter()
        .map(|(label, value)| {
            let table = result_unit_table(label);
            // Units the label cannot be converted to fall back to its base unit
            let target = target_unit(ctx, overrides, label)
                .filter(|unit| table.is_some_and(|t| t.options.iter().any(|o| o.value == *unit)));
            let shown = display_result(label, value, target, &ctx.locale);
            let unit = match value {
                ResultValue::Number(_) => target.or(table.map(|t| t.base_unit)).unwrap_or(""),
                ResultValue::Text(_) => "",
            };
            let text = if unit.is_empty() {
                shown
            } else {
                format!("{shown} {unit}")
            };
            (label.to_string(), text)
        })
        .collect()
}

fn calc(
    ctx: &Session,
    id: &str,
    inputs: &[InputArg],
    result_units: &[(String, String)],
    no_save: bool,
    show_steps: bool,
) -> Result<()> {
    let kind = kind_for(id)?;
    let fields = kind.fields();

    let mut raw = HashMap::new();
    let mut units = HashMap::new();
    for input in inputs {
        if !fields.iter().any(|f| f.name == input.name) {
            bail!("'{}' is not a field of {}", input.name, kind.id());
        }
        raw.insert(input.name.clone(), input.value.clone());
        if let Some(unit) = &input.unit {
            units.insert(input.name.clone(), unit.clone());
        }
    }

    validate_inputs_in_units(fields, &raw, &units)?;

    let result = compute(kind.id(), &raw, &units, fields);
    let steps = compute_steps(kind.id(), &raw, &units, fields);
    let rendered = render_results(ctx, &result, result_units);

    let streak = if no_save {
        None
    } else {
        let mut entry =
            CalculationHistoryEntry::new(kind, fields, &raw, &units, result.clone(), Utc::now());
        if ctx.settings.save_steps {
            entry = entry.with_steps(steps.clone());
        }
        let mut store = ctx.store();
        let state = store
            .append(entry)
            .with_context(|| format!("saving history to {}", store.path().display()))?;
        Some(state.streak.count)
    };

    if ctx.json {
        let display: serde_json::Map<_, _> = rendered
            .iter()
            .map(|(label, text)| (label.clone(), json!(text)))
            .collect();
        return ctx.print_json(&json!({
            "calculation": kind.id(),
            "result": result,
            "display": display,
            "steps": if show_steps { json!(steps) } else { json!(null) },
            "streak": streak,
        }));
    }

    println!("{}", kind.title());
    println!("{}", "=".repeat(kind.title().chars().count()));
    for (label, text) in &rendered {
        println!("  {label}: {text}");
    }

    if show_steps {
        println!();
        for step in &steps {
            println!("{}. {}", step.step, step.description);
            println!("   {}", step.formula);
            println!("   {}", step.calculation);
            println!("   = {}", step.result);
        }
    }

    if let Some(count) = streak {
        println!();
        println!("Sequência: {count} dia(s)");
    }
    Ok(())
}

fn convert(ctx: &Session, value: f64, from: &str, to: &str, category: &str) -> Result<()> {
    let Some(category) = UnitCategory::from_key(category) else {
        let keys: Vec<_> = UnitCategory::ALL.iter().map(|c| c.key()).collect();
        bail!("unknown category '{category}', expected one of: {}", keys.join(", "));
    };

    let converted = convert_unit(value, from, to, category);
    if ctx.json {
        return ctx.print_json(&json!({
            "value": value,
            "from": from,
            "to": to,
            "category": category,
            "result": converted,
        }));
    }

    println!(
        "{} {} = {} {}",
        format_number_with(value, &ctx.locale),
        from,
        format_number_with(converted, &ctx.locale),
        to
    );
    Ok(())
}

fn history(ctx: &Session, clear: bool) -> Result<()> {
    if clear {
        ctx.store().clear()?;
        if !ctx.json {
            println!("Histórico apagado");
        }
        return Ok(());
    }

    let state = ctx.store().load()?;
    if ctx.json {
        return ctx.print_json(&state.history);
    }

    if state.history.is_empty() {
        println!("Nenhum cálculo no histórico");
        return Ok(());
    }

    for entry in state.history.entries() {
        let when = entry.timestamp.with_timezone(&Local).format("%d/%m/%Y %H:%M");
        println!("{when}  {}", entry.title);
        for (name, value) in entry.inputs.iter() {
            println!("    {name}: {value}");
        }
        for (label, text) in render_results(ctx, &entry.result, &[]) {
            println!("  → {label}: {text}");
        }
    }
    Ok(())
}

fn streak(ctx: &Session) -> Result<()> {
    let state = ctx.store().load()?;
    if ctx.json {
        return ctx.print_json(&state.streak);
    }

    match state.streak.last_calculation {
        Some(last) => println!(
            "Sequência: {} dia(s), último cálculo em {}",
            state.streak.count,
            last.format("%d/%m/%Y")
        ),
        None => println!("Nenhum cálculo registrado"),
    }
    Ok(())
}
