//! Implementation of the `loquat format` command.

use std::fs::read_to_string;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use loquat::{Binding, Bundle, Number, Value};
use serde::Serialize;

/// Arguments for the format command.
#[derive(Debug, clap::Args)]
pub struct FormatArgs {
    /// Message id to format, optionally `id.attribute`
    #[arg(required = true)]
    pub message: String,

    /// Resource files to load (.ftl), in priority order (repeatable)
    #[arg(short = 'r', long = "resource", required = true)]
    pub resources: Vec<PathBuf>,

    /// Locale for plural rules and locale-aware functions
    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Arguments in name=value format (repeatable). Values parse as a
    /// number, a JSON array, or fall back to a plain string.
    #[arg(short = 'a', long = "arg", value_parser = parse_key_val)]
    pub args: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for format results.
#[derive(Serialize)]
struct FormatResult {
    result: String,
    errors: Vec<String>,
}

/// Parse a key=value argument string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid argument format '{}': expected name=value", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Interpret one raw argument value: number, JSON array, or string.
fn to_binding(raw: &str) -> Binding {
    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(raw) {
        let values: Vec<Value> = items.iter().map(json_scalar).collect();
        return Binding::from(values);
    }
    match Number::parse(raw) {
        Some(number) => Binding::from(number),
        None => Binding::from(raw),
    }
}

fn json_scalar(item: &serde_json::Value) -> Value {
    match item {
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Number(n) => {
            Number::parse(&n.to_string()).map_or_else(|| Value::from(n.to_string()), Value::from)
        }
        other => Value::from(other.to_string()),
    }
}

/// Run the format command.
pub fn run_format(args: FormatArgs) -> miette::Result<i32> {
    let mut bundle = Bundle::builder().locale(&args.locale).build();

    for path in &args.resources {
        let content = read_to_string(path)
            .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
        let resource = loquat::parse(&content);
        for error in &resource.errors {
            eprintln!("warning: {}: {}", path.display(), error);
        }
        if let Err(errors) = bundle.add_resource(resource) {
            for error in errors {
                eprintln!("warning: {}: {}", path.display(), error);
            }
        }
    }

    let reported: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);
    bundle.set_error_listener(move |report| {
        let mut reported = sink.lock().unwrap_or_else(PoisonError::into_inner);
        reported.extend(report.errors.iter().map(ToString::to_string));
    });

    let format_args = args
        .args
        .iter()
        .map(|(name, value)| (name.clone(), to_binding(value)))
        .collect();

    let result = match args.message.split_once('.') {
        Some((id, attribute)) => bundle.format_attribute(id, attribute, Some(&format_args)),
        None => bundle.format(&args.message, Some(&format_args)),
    };

    let errors = {
        let reported = reported.lock().unwrap_or_else(PoisonError::into_inner);
        reported.clone()
    };

    if args.json {
        let output = FormatResult {
            result,
            errors: errors.clone(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("JSON serialization should not fail")
        );
    } else {
        println!("{}", result);
        for error in &errors {
            eprintln!("error: {}", error);
        }
    }

    Ok(if errors.is_empty() {
        exitcode::OK
    } else {
        exitcode::DATAERR
    })
}
