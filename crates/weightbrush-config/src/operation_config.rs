//! Textual operations such as `absolute:0.4` or `smooth:3`.

use weightbrush_core::EditOperation;

use crate::error::ConfigError;
use crate::settings::SmoothSettings;

/// Parse a numeric argument.
///
/// Accepts plain numbers and percentages (`"25%"` → `0.25`).
///
/// # Example
///
/// ```rust
/// use weightbrush_config::parse_value;
///
/// assert_eq!(parse_value("0.4"), Some(0.4));
/// assert_eq!(parse_value("50%"), Some(0.5));
/// assert_eq!(parse_value("half"), None);
/// ```
pub fn parse_value(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f64>().ok().map(|v| v / 100.0);
    }
    value.parse::<f64>().ok()
}

fn required(name: &str, arg: Option<&str>) -> Result<f64, ConfigError> {
    let arg = arg.ok_or_else(|| ConfigError::invalid_argument(name, "", "missing value"))?;
    parse_value(arg).ok_or_else(|| ConfigError::invalid_argument(name, arg, "not a number"))
}

/// Optional blend strength, full strength when omitted.
fn strength(name: &str, arg: Option<&str>) -> Result<f64, ConfigError> {
    match arg {
        None => Ok(1.0),
        Some(_) => required(name, arg),
    }
}

fn iterations(name: &str, arg: Option<&str>, default: u32) -> Result<u32, ConfigError> {
    match arg {
        None => Ok(default),
        Some(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::invalid_argument(name, text, "expected a whole number")),
    }
}

/// Parse `name[:argument]` into an [`EditOperation`].
///
/// | Text | Operation |
/// |------|-----------|
/// | `absolute:V` | [`EditOperation::Absolute`] |
/// | `add:D` | [`EditOperation::Add`] |
/// | `add_percent:P` / `percent:P` | [`EditOperation::AddPercent`] |
/// | `average[:S]` | [`EditOperation::Average`], strength `S` |
/// | `smooth[:N]` / `sharpen[:N]` | [`EditOperation::Smooth`], `N` rounds |
/// | `prune:T` | [`EditOperation::Prune`] |
/// | `normalize` | [`EditOperation::Normalize`] |
/// | `reassign[:S]` | [`EditOperation::ReassignLocally`] |
///
/// Smooth strength and default round count come from `smooth`. The parsed
/// operation is range-checked before it is returned.
pub fn parse_operation(text: &str, smooth: &SmoothSettings) -> Result<EditOperation, ConfigError> {
    let text = text.trim();
    let (name, arg) = match text.split_once(':') {
        Some((name, arg)) => (name.trim(), Some(arg)),
        None => (text, None),
    };
    let lower = name.to_ascii_lowercase();

    let operation = match lower.as_str() {
        "absolute" | "abs" | "set" => EditOperation::Absolute(required(name, arg)?),
        "add" => EditOperation::Add(required(name, arg)?),
        "add_percent" | "percent" => EditOperation::AddPercent(required(name, arg)?),
        "average" | "avg" => EditOperation::Average {
            strength: strength(name, arg)?,
        },
        "smooth" | "sharpen" => {
            let mut params = smooth.params(lower == "sharpen");
            params.iterations = iterations(name, arg, smooth.repeat)?;
            EditOperation::Smooth(params)
        }
        "prune" => EditOperation::Prune(required(name, arg)?),
        "normalize" | "norm" => EditOperation::Normalize,
        "reassign" | "reassign_locally" => EditOperation::ReassignLocally {
            strength: strength(name, arg)?,
        },
        _ => return Err(ConfigError::UnknownOperation(name.to_string())),
    };

    operation.validate()?;
    Ok(operation)
}

/// Canonical text for an operation; parses back to the same value.
pub fn format_operation(operation: &EditOperation) -> String {
    match *operation {
        EditOperation::Absolute(v) => format!("absolute:{v}"),
        EditOperation::Add(d) => format!("add:{d}"),
        EditOperation::AddPercent(p) => format!("add_percent:{p}"),
        EditOperation::Average { strength } => format!("average:{strength}"),
        EditOperation::Smooth(params) => format!("{}:{}", operation.name(), params.iterations),
        EditOperation::Prune(t) => format!("prune:{t}"),
        EditOperation::Normalize => "normalize".to_string(),
        EditOperation::ReassignLocally { strength } => format!("reassign:{strength}"),
    }
}
