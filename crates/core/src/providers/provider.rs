use crate::errors::CoreError;
use crate::foundation::Application;

/// Provider error type
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider '{provider}' is not registered in the provider catalog")]
    UnknownProvider { provider: String },

    #[error("Provider registration failed for '{provider}': {message}")]
    RegistrationFailed { provider: String, message: String },

    #[error("Provider boot failed for '{provider}': {message}")]
    BootFailed { provider: String, message: String },

    #[error("Container error: {0}")]
    Container(Box<CoreError>),
}

impl From<CoreError> for ProviderError {
    fn from(error: CoreError) -> Self {
        ProviderError::Container(Box::new(error))
    }
}

/// A unit of related service registrations plus post-registration wiring.
///
/// The application runs `register` and then `boot` exactly once per
/// provider name. A provider is marked as run before `register` starts
/// and stays marked even if either phase fails.
pub trait ServiceProvider: Send + Sync {
    /// Provider identity; two providers with the same name are the same provider
    fn name(&self) -> &'static str;

    /// Bind this provider's services into the application
    fn register(&self, app: &mut Application) -> Result<(), ProviderError>;

    /// Wire up services that `register` made available
    fn boot(&self, app: &mut Application) -> Result<(), ProviderError> {
        let _ = app;
        Ok(())
    }

    /// Provider version for introspection
    fn version(&self) -> Option<&'static str> {
        None
    }

    /// Provider description
    fn description(&self) -> Option<&'static str> {
        None
    }
}

impl std::fmt::Debug for dyn ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("name", &self.name())
            .finish()
    }
}

/// Reference to a provider handed to `Application::register_provider`
pub enum ProviderRef {
    /// Not yet constructed; instantiated through the provider catalog
    Named(String),
    /// Already constructed
    Instance(Box<dyn ServiceProvider>),
}

impl ProviderRef {
    pub fn named(name: impl Into<String>) -> Self {
        ProviderRef::Named(name.into())
    }

    pub fn instance<P: ServiceProvider + 'static>(provider: P) -> Self {
        ProviderRef::Instance(Box::new(provider))
    }
}

impl From<&str> for ProviderRef {
    fn from(name: &str) -> Self {
        ProviderRef::Named(name.to_string())
    }
}

impl From<String> for ProviderRef {
    fn from(name: String) -> Self {
        ProviderRef::Named(name)
    }
}

impl From<Box<dyn ServiceProvider>> for ProviderRef {
    fn from(provider: Box<dyn ServiceProvider>) -> Self {
        ProviderRef::Instance(provider)
    }
}

impl std::fmt::Debug for ProviderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ProviderRef::Instance(provider) => {
                f.debug_tuple("Instance").field(&provider.name()).finish()
            }
        }
    }
}

/// Result of a provider registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// `register` and `boot` ran during this call
    Registered,
    /// The provider had already run; nothing happened
    AlreadyRegistered,
}

/// Provider metadata for introspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl ProviderMetadata {
    /// Create metadata from a provider
    pub fn from_provider<P: ServiceProvider + ?Sized>(provider: &P) -> Self {
        Self {
            name: provider.name().to_string(),
            version: provider.version().map(|v| v.to_string()),
            description: provider.description().map(|d| d.to_string()),
        }
    }
}

/// Provider that registers nothing; useful as a marker
#[derive(Debug)]
pub struct BaseProvider {
    name: &'static str,
    version: Option<&'static str>,
    description: Option<&'static str>,
}

impl BaseProvider {
    /// Create a new base provider
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            version: None,
            description: None,
        }
    }

    /// Set provider version
    pub fn with_version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    /// Set provider description
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

impl ServiceProvider for BaseProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn register(&self, _app: &mut Application) -> Result<(), ProviderError> {
        Ok(())
    }

    fn version(&self) -> Option<&'static str> {
        self.version
    }

    fn description(&self) -> Option<&'static str> {
        self.description
    }
}

/// Macro to simplify provider creation
#[macro_export]
macro_rules! provider {
    (
        name: $name:expr,
        $(version: $version:expr,)?
        $(description: $description:expr,)?
        register: |$app:ident| $register:block
        $(, boot: |$boot_app:ident| $boot:block)?
        $(,)?
    ) => {
        {
            struct CustomProvider;

            impl $crate::providers::ServiceProvider for CustomProvider {
                fn name(&self) -> &'static str {
                    $name
                }

                $(fn version(&self) -> Option<&'static str> {
                    Some($version)
                })?

                $(fn description(&self) -> Option<&'static str> {
                    Some($description)
                })?

                fn register(&self, $app: &mut $crate::foundation::Application)
                    -> Result<(), $crate::providers::ProviderError>
                {
                    $register
                }

                $(fn boot(&self, $boot_app: &mut $crate::foundation::Application)
                    -> Result<(), $crate::providers::ProviderError>
                {
                    $boot
                })?
            }

            CustomProvider
        }
    };
}
