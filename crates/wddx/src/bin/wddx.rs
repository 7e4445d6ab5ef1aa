//! `wddx` — convert between JSON and WDDX packets (stdin → stdout).
//!
//! Usage:
//!   wddx [--action bx2wddx|wddx2bx|bx2js|wddx2js] [--cfml] [--var NAME]
//!        [--case-insensitive] [--recordset-type NAME]
//!
//! `*2wddx` and `*2js` read JSON; `wddx2*` read a WDDX packet.
//! `wddx2bx` / `wddx2cfml` write JSON.

use std::io::{self, Read, Write};

use tracing_subscriber::EnvFilter;
use wddx::{run, to_json, Action, Dialect, KeyPolicy, Value, WddxOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut options = WddxOptions::default();
    let mut action_name: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--cfml" => options.dialect = Dialect::Cfml,
            "--case-insensitive" => options.key_policy = KeyPolicy::CaseInsensitive,
            "--action" => {
                i += 1;
                action_name = args.get(i).cloned();
            }
            "--var" => {
                i += 1;
                options.top_level_variable = args.get(i).cloned();
            }
            "--recordset-type" => {
                i += 1;
                if let Some(t) = args.get(i) {
                    options.recordset_type = t.clone();
                }
            }
            other => tracing::warn!(arg = other, "ignoring unknown argument"),
        }
        i += 1;
    }
    options.action = action_name.unwrap_or_else(|| Action::ToWddx.name(options.dialect));

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match convert(&options, buf.trim()) {
        Ok(out) => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{out}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn convert(options: &WddxOptions, input: &str) -> Result<String, Box<dyn std::error::Error>> {
    let action = Action::from_name(&options.action, options.dialect)?;
    let value = if action.reads_packet() {
        Value::string(input)
    } else {
        Value::from(serde_json::from_str::<serde_json::Value>(input)?)
    };
    let out = run(options, value)?;
    Ok(match (action, out) {
        (Action::FromWddx, decoded) => serde_json::to_string_pretty(&to_json(&decoded))?,
        (_, Value::Scalar { text, .. }) => text,
        (_, other) => to_json(&other).to_string(),
    })
}
