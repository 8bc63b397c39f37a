use mine_core::Application;

pub fn run(app: &Application) {
    let paths = app.paths();
    println!("base:     {}", paths.base().display());
    println!("app:      {}", app.app_path().display());
    println!("api:      {}", app.api_path().display());
    println!("config:   {}", paths.config_path().display());
    println!("package:  {}", paths.package_config_path().display());
    println!("lang:     {}", app.language_path().display());
}
