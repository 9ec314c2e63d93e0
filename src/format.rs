//! Substitution of format arguments into resolved translations.
//!
//! Two styles are supported. A single JSON object as argument selects named substitution of
//! `%(name)s` placeholders. Any other arguments are substituted positionally into printf-style
//! directives (`%s`, `%d`, `%i`, `%f`, `%j`, `%o`, `%O` and the escape `%%`).

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Named placeholders, whitespace around the identifier is ignored (`%( name )s`).
static NAMED_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\(\s*([^)]+)\s*\)s").expect("expected valid placeholder regex"));

/// The text of a named placeholder whose identifier is absent from the arguments.
pub const UNDEFINED: &str = "undefined";

/// Substitutes the arguments into the template.
///
/// Without arguments, the template is returned as-is, so literal `%` sequences in plain strings are
/// never interpreted. A single object argument performs named substitution, a single array argument
/// spreads its elements as positional arguments.
pub fn format(template: &str, args: &[Value]) -> String {
    match args {
        [] => template.to_owned(),
        [Value::Object(params)] => format_named(template, params),
        [Value::Array(items)] => format_positional(template, items),
        _ => format_positional(template, args),
    }
}

fn format_named(template: &str, params: &Map<String, Value>) -> String {
    NAMED_PLACEHOLDER
        .replace_all(template, |caps: &Captures| match params.get(caps[1].trim()) {
            Some(value) => display(value),
            None => UNDEFINED.to_owned(),
        })
        .into_owned()
}

fn format_positional(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&directive) = chars.peek() else {
            out.push('%');
            break;
        };
        match directive {
            '%' => {
                chars.next();
                out.push('%');
            }
            's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(&render(directive, arg)),
                    // keep directives without argument visible
                    None => {
                        out.push('%');
                        out.push(directive);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

fn render(directive: char, arg: &Value) -> String {
    match directive {
        's' => display(arg),
        'd' => render_number(arg, false),
        'i' => render_number(arg, true),
        'f' => as_number(arg).map_or_else(|| "NaN".to_owned(), format_float),
        // 'j', 'o' and 'O'
        _ => arg.to_string(),
    }
}

/// The string form of a value: strings are inserted raw, everything else as compact JSON.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_number(arg: &Value, truncate: bool) -> String {
    if let Value::Number(number) = arg
        && (number.is_i64() || number.is_u64())
    {
        return number.to_string();
    }
    match as_number(arg) {
        Some(f) if truncate => format_float(f.trunc()),
        Some(f) => format_float(f),
        None => "NaN".to_owned(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Formats a number the way it reads in JavaScript: exponent notation outside of
/// `1e-6..1e21`, otherwise plain decimals without a trailing `.0`.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if f == 0.0 {
        "0".to_owned()
    } else if f.abs() >= 1e21 || f.abs() < 1e-6 {
        let formatted = format!("{f:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}
