use crate::CliError;
use mine_core::{Application, Parameters};

pub fn run(app: &mut Application, keys: &[String]) -> Result<(), CliError> {
    let mut failed = None;

    for key in keys {
        let canonical = app.get_alias(key).to_string();
        match app.resolve(key, &Parameters::new()) {
            Ok(_) => println!("{key}: resolved ({canonical})"),
            Err(error) => {
                println!("{key}: {error}");
                failed.get_or_insert(error);
            }
        }
    }

    println!();
    println!("Configuration units:");
    for (unit, source) in app.loaded_configurations() {
        match source {
            Some(source) => println!("  {unit} ({source})"),
            None => println!("  {unit} (missing)"),
        }
    }

    println!("Providers:");
    for provider in app.loaded_providers() {
        match &provider.version {
            Some(version) => println!("  {} v{}", provider.name, version),
            None => println!("  {}", provider.name),
        }
    }

    match failed {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}
