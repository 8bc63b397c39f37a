use mine_core::Application;

pub fn run(app: &Application) {
    println!("Aliases:");
    for (alias, target) in app.container().aliases().entries() {
        println!("  {alias} -> {target}");
    }

    println!("Deferred bindings:");
    for (key, binder) in app.deferred_bindings().entries() {
        let state = if app.deferred_bindings().has_run(binder) {
            "registered"
        } else {
            "pending"
        };
        println!("  {key} [{binder}, {state}]");
    }

    println!("Providers available by name:");
    for name in app.provider_catalog().names() {
        println!("  {name}");
    }
}
