//! Integration tests for service provider registration

mod common;

use common::Sandbox;
use mine_core::providers::{BaseProvider, ProviderError};
use mine_core::{keys, provider, CoreError, ProviderRef, Registration};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_provider_runs_once_per_name() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let first = app
        .register_provider(ProviderRef::instance(BaseProvider::new("marker")))
        .unwrap();
    let second = app
        .register_provider(ProviderRef::instance(BaseProvider::new("marker")))
        .unwrap();

    assert_eq!(first, Registration::Registered);
    assert_eq!(second, Registration::AlreadyRegistered);
    assert_eq!(app.loaded_providers().len(), 1);
    assert_eq!(app.loaded_providers()[0].name, "marker");
}

#[test]
fn test_named_provider_is_not_rebuilt_once_loaded() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = constructed.clone();
    app.provide("reports::ReportServiceProvider", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::new(BaseProvider::new("reports::ReportServiceProvider"))
    });

    for _ in 0..3 {
        app.register_provider("reports::ReportServiceProvider").unwrap();
    }

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(app.provider_loaded("reports::ReportServiceProvider"));
}

#[test]
fn test_register_then_boot() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let provider = provider! {
        name: "greeting::GreetingServiceProvider",
        version: "1.0.0",
        register: |app| {
            app.singleton("greeting", |_, _| Ok(String::from("hello")));
            Ok(())
        },
        boot: |app| {
            let greeting = app.make::<String>("greeting")?;
            app.instance("greeting.length", greeting.len());
            Ok(())
        }
    };

    app.register_provider(ProviderRef::instance(provider)).unwrap();
    assert_eq!(*app.make::<usize>("greeting.length").unwrap(), 5);
    assert_eq!(
        app.loaded_providers()[0].version.as_deref(),
        Some("1.0.0")
    );
}

#[test]
fn test_failed_boot_stays_marked() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let broken = || {
        provider! {
            name: "broken::BrokenServiceProvider",
            register: |_app| { Ok(()) },
            boot: |_app| {
                Err(ProviderError::BootFailed {
                    provider: "broken::BrokenServiceProvider".to_string(),
                    message: "no socket".to_string(),
                })
            }
        }
    };

    match app.register_provider(ProviderRef::instance(broken())) {
        Err(CoreError::Provider(ProviderError::BootFailed { provider, .. })) => {
            assert_eq!(provider, "broken::BrokenServiceProvider");
        }
        other => panic!("expected a boot failure, got {other:?}"),
    }

    assert!(app.provider_loaded("broken::BrokenServiceProvider"));
    assert_eq!(
        app.register_provider(ProviderRef::instance(broken())).unwrap(),
        Registration::AlreadyRegistered
    );
}

#[test]
fn test_failed_register_stays_marked() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let failing = provider! {
        name: "failing::FailingServiceProvider",
        register: |app| {
            app.make::<String>("missing")?;
            Ok(())
        }
    };

    let error = app.register_provider(ProviderRef::instance(failing)).unwrap_err();
    assert!(matches!(
        error,
        CoreError::Provider(ProviderError::RegistrationFailed { .. })
    ));
    assert!(app.provider_loaded("failing::FailingServiceProvider"));
}

#[test]
fn test_unknown_provider_is_not_marked() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let error = app.register_provider("mail::MailServiceProvider").unwrap_err();
    assert!(matches!(
        error,
        CoreError::Provider(ProviderError::UnknownProvider { ref provider })
            if provider == "mail::MailServiceProvider"
    ));
    assert!(!app.provider_loaded("mail::MailServiceProvider"));
}

#[test]
fn test_database_without_provider_fails() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let error = app.with_eloquent().unwrap_err();
    assert!(error.is_provider());
    assert!(app.configuration_loaded("database"));
    assert!(!app.resolved(keys::DB));
}

#[test]
fn test_database_with_provided_provider() {
    let sandbox = Sandbox::new();
    sandbox.project_config("database.yaml", "default: sqlite\n");
    let mut app = sandbox.app();

    app.provide(keys::providers::DATABASE, |_| {
        Box::new(provider! {
            name: keys::providers::DATABASE,
            register: |app| {
                app.singleton(keys::DB, |app, _| {
                    let config = app.config()?;
                    config
                        .get("database.default")
                        .and_then(|driver| driver.as_str().map(String::from))
                        .ok_or_else(|| CoreError::initialization(keys::DB, "no default connection"))
                });
                Ok(())
            }
        })
    });
    app.provide(keys::providers::PAGINATION, |_| {
        Box::new(BaseProvider::new(keys::providers::PAGINATION))
    });

    app.with_eloquent().unwrap();
    let aliased = app.make::<String>("database::DatabaseManager").unwrap();
    assert_eq!(aliased.as_str(), "sqlite");
    assert!(app.provider_loaded(keys::providers::PAGINATION));
}

#[test]
fn test_deferred_provider_registration() {
    let sandbox = Sandbox::new();
    let mut app = sandbox.app();

    let registration = app
        .register_deferred_provider(keys::providers::EVENTS, Some(keys::EVENTS))
        .unwrap();
    assert_eq!(registration, Registration::Registered);
    assert!(app.container().bound(keys::EVENTS));
}
