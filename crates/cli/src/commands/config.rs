use crate::CliError;
use mine_core::config::CONFIG_EXTENSIONS;
use mine_core::{keys, Application, ConfigLoad, CoreError, Filesystem};

pub fn run(app: &mut Application, unit: Option<&str>, key: Option<&str>) -> Result<(), CliError> {
    let value = match unit {
        Some(unit) => {
            report(unit, app.configure(unit)?);
            let path = match key {
                Some(key) => format!("{unit}.{key}"),
                None => unit.to_string(),
            };
            app.config()?.get(&path).unwrap_or_default()
        }
        None => {
            for unit in directory_units(app)? {
                report(&unit, app.configure(&unit)?);
            }
            app.config()?.all()
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn report(unit: &str, load: ConfigLoad) {
    match load {
        ConfigLoad::Loaded(source) => eprintln!("{unit}: loaded from {source}"),
        ConfigLoad::Missing => eprintln!("{unit}: no configuration file found"),
        ConfigLoad::AlreadyLoaded => {}
    }
}

/// Units with a file in the configuration directory in use
fn directory_units(app: &mut Application) -> Result<Vec<String>, CoreError> {
    let Some(dir) = app.configuration_path(None) else {
        return Ok(Vec::new());
    };

    let files = app.make::<Filesystem>(keys::FILES)?;
    let mut units: Vec<String> = files
        .files(&dir)?
        .into_iter()
        .filter(|path| {
            path.extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| CONFIG_EXTENSIONS.contains(&extension))
        })
        .filter_map(|path| Some(path.file_stem()?.to_str()?.to_string()))
        .collect();
    units.dedup();
    Ok(units)
}
