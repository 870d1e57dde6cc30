use playground_sandbox::{Catalog, SandboxError, SourceBundle, Synthesizer};
use std::env;
use std::fs;
use std::process;

/// What to render, as given on the command line.
#[derive(Debug, PartialEq)]
enum Input {
    Challenge(String),
    Files {
        component: String,
        style: Option<String>,
    },
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(input) = parse_args(&args) else {
        print_usage();
        process::exit(1);
    };

    match bundle_for(&input) {
        Ok(bundle) => {
            let doc = Synthesizer::default().synthesize(&bundle);
            print!("{}", doc.as_str());
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            if let SandboxError::UnknownChallenge { .. } = e {
                if let Ok(catalog) = Catalog::builtin() {
                    eprintln!();
                    eprintln!("Available challenges:");
                    for c in catalog.iter() {
                        eprintln!("  {:<24} {}", c.id, c.title);
                    }
                }
            }
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: sandbox-render <component.jsx> [style.css]");
    eprintln!("       sandbox-render --challenge <id>");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  sandbox-render app.jsx app.css > preview.html");
    eprintln!("  sandbox-render --challenge iv-todo-app");
}

/// `None` means the arguments do not match either usage form.
fn parse_args(args: &[String]) -> Option<Input> {
    match args {
        [flag, id] if flag == "--challenge" => Some(Input::Challenge(id.clone())),
        [flag, ..] if flag == "--challenge" => None,
        [component] => Some(Input::Files {
            component: component.clone(),
            style: None,
        }),
        [component, style] => Some(Input::Files {
            component: component.clone(),
            style: Some(style.clone()),
        }),
        _ => None,
    }
}

fn bundle_for(input: &Input) -> Result<SourceBundle, SandboxError> {
    match input {
        Input::Challenge(id) => {
            let catalog = Catalog::builtin()?;
            Ok(catalog.require(id)?.default_bundle())
        }
        Input::Files { component, style } => {
            let component = read(component)?;
            let style = match style {
                Some(path) => read(path)?,
                None => String::new(),
            };
            Ok(SourceBundle::new(component).with_style(style))
        }
    }
}

fn read(path: &str) -> Result<String, SandboxError> {
    fs::read_to_string(path)
        .map_err(|e| SandboxError::Io(format!("Failed to read {}: {}", path, e)))
}
