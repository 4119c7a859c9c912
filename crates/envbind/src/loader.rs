//! Loading a whole configuration from the environment.
//!
//! This module provides the [`Loader`] for populating every leaf of a
//! configuration in one pass. For each flattened key the loader:
//!
//! 1. Looks up an environment variable with exactly that name
//! 2. Binds it if present, even when the value is empty
//! 3. Otherwise binds the field's default literal, if it has one
//! 4. Otherwise leaves the field as it is
//!
//! A key that fails to bind never stops the others. [`load`] discards those
//! failures; [`Loader::load`] returns them in a [`LoadReport`] and
//! [`try_load`] turns them into a [`LoadError`].

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::hash::BuildHasher;

use crate::{binder, EnvConfig, KeyFailure, LoadError};

/// Read-only lookup of environment variables by exact name.
pub trait EnvSource {
    /// The value of `key`, or `None` if it is not set.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The process environment.
///
/// Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

/// Where a key's value came from during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    /// An environment variable, possibly empty.
    Environment,
    /// The field's default literal.
    Default,
    /// Neither; the field kept its previous value.
    Unset,
}

impl ValueOrigin {
    fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Default => "default",
            Self::Unset => "unset",
        }
    }
}

/// Outcome of a load: the origin of every bound key and every failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    origins: Vec<(String, ValueOrigin)>,
    failures: Vec<KeyFailure>,
}

impl LoadReport {
    /// Keys that were bound or left unset, in schema order.
    pub fn origins(&self) -> &[(String, ValueOrigin)] {
        &self.origins
    }

    /// Origin of `key`, or `None` if the key failed or is unknown.
    pub fn origin_of(&self, key: &str) -> Option<ValueOrigin> {
        self.origins
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|&(_, origin)| origin)
    }

    /// Keys whose value was rejected, in schema order.
    pub fn failures(&self) -> &[KeyFailure] {
        &self.failures
    }

    /// Returns `true` if no key failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fail if any key failed to bind.
    pub fn into_result(self) -> Result<Self, LoadError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(LoadError::new(self.failures))
        }
    }
}

/// Populates configurations from an [`EnvSource`].
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use envbind::{EnvConfig, Loader, ValueOrigin};
///
/// #[derive(Default, EnvConfig)]
/// struct Database {
///     #[env(d = "localhost")]
///     host: String,
///     #[env(d = "5432")]
///     port: u16,
/// }
///
/// #[derive(Default, EnvConfig)]
/// struct Config {
///     database: Database,
/// }
///
/// let env = HashMap::from([("DATABASE_HOST".to_string(), "db.internal".to_string())]);
///
/// let mut config = Config::default();
/// let report = Loader::with_source(env).load(&mut config);
///
/// assert_eq!(config.database.host, "db.internal");
/// assert_eq!(config.database.port, 5432);
/// assert_eq!(report.origin_of("DATABASE_PORT"), Some(ValueOrigin::Default));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader<S = ProcessEnv> {
    source: S,
}

impl Loader {
    /// Create a loader reading the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self { source: ProcessEnv }
    }
}

impl<S: EnvSource> Loader<S> {
    /// Create a loader reading from `source`.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// The environment source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Bind every key of `config`'s schema, collecting failures.
    pub fn load(&self, config: &mut dyn EnvConfig) -> LoadReport {
        let schema = config.env_schema();
        let _span = tracing::debug_span!("envbind.load", schema = %schema.name()).entered();

        // Presence of every key is recorded before anything is bound.
        let found: Vec<_> = schema
            .entries()
            .iter()
            .map(|entry| (entry, self.source.lookup(entry.key())))
            .collect();

        let mut report = LoadReport::default();
        for (entry, value) in found {
            let key = entry.key();
            let (origin, raw) = match (value, entry.default()) {
                (Some(value), _) => (ValueOrigin::Environment, value),
                (None, Some(default)) => (ValueOrigin::Default, default.to_owned()),
                (None, None) => {
                    tracing::debug!(
                        key,
                        origin = ValueOrigin::Unset.as_str(),
                        "configuration key not set"
                    );
                    report.origins.push((key.to_owned(), ValueOrigin::Unset));
                    continue;
                }
            };

            match binder::bind_entry(&mut *config, entry, &raw) {
                Ok(()) => {
                    tracing::debug!(key, origin = origin.as_str(), "bound configuration key");
                    report.origins.push((key.to_owned(), origin));
                }
                Err(error) => {
                    tracing::warn!(
                        key,
                        origin = origin.as_str(),
                        error = %error,
                        "ignoring configuration value that failed to bind"
                    );
                    report.failures.push(KeyFailure {
                        key: key.to_owned(),
                        error,
                    });
                }
            }
        }

        report
    }
}

/// Populate `config` from the process environment.
///
/// Failures are ignored: a malformed value leaves its field unchanged. Use
/// [`try_load`] or [`Loader::load`] to see them.
pub fn load<C: EnvConfig>(config: &mut C) {
    let _ = Loader::new().load(config);
}

/// Populate `config` from the process environment, failing if any key was
/// rejected.
///
/// Every key is still attempted; the error lists all failures.
pub fn try_load<C: EnvConfig>(config: &mut C) -> Result<LoadReport, LoadError> {
    Loader::new().load(config).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindError, EnvConfig, LeafType};

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[derive(Debug, Default, EnvConfig)]
    struct SingleLevel {
        f: String,
        g: i64,
        k: bool,
    }

    #[derive(Debug, Default, EnvConfig)]
    struct DoubleLevel {
        e: SingleLevel,
        h: i64,
        j: String,
    }

    #[derive(Debug, Default, EnvConfig)]
    struct TestConfig {
        a: String,
        b: i64,
        c: SingleLevel,
        d: DoubleLevel,
    }

    #[test]
    fn test_load_nested() {
        let source = env(&[
            ("C_F", "hello"),
            ("C_G", "10"),
            ("C_K", "false"),
            ("D_E_F", "hello"),
            ("D_E_G", "15"),
            ("D_E_K", "true"),
        ]);

        let mut config = TestConfig::default();
        let report = Loader::with_source(&source).load(&mut config);

        assert!(report.is_clean());
        assert_eq!(config.c.f, "hello");
        assert_eq!(config.c.g, 10);
        assert!(!config.c.k);
        assert_eq!(config.d.e.f, "hello");
        assert_eq!(config.d.e.g, 15);
        assert!(config.d.e.k);
        assert_eq!(report.origin_of("A"), Some(ValueOrigin::Unset));
        assert_eq!(report.origin_of("C_F"), Some(ValueOrigin::Environment));
    }

    #[test]
    fn test_load_keys_are_exact_names() {
        let source = env(&[("c_f", "lowercase")]);
        let mut config = TestConfig::default();
        Loader::with_source(source).load(&mut config);
        assert_eq!(config.c.f, "");
    }

    #[derive(Debug, Default, EnvConfig)]
    struct DbConfig {
        #[env(d = "localhost")]
        host: String,
        #[env(d = "5432")]
        port: i64,
        #[env(d = "35")]
        max_conns: i64,
    }

    #[derive(Debug, Default, EnvConfig)]
    struct AppConfig {
        database: DbConfig,
    }

    #[test]
    fn test_load_defaults() {
        let mut config = AppConfig::default();
        let report = Loader::with_source(env(&[])).load(&mut config);

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_conns, 35);
        assert!(report
            .origins()
            .iter()
            .all(|(_, origin)| *origin == ValueOrigin::Default));
    }

    #[test]
    fn test_environment_overrides_defaults_even_when_empty() {
        let source = env(&[("DATABASE_HOST", ""), ("DATABASE_PORT", "9090")]);
        let mut config = AppConfig::default();
        Loader::with_source(source).load(&mut config);

        assert_eq!(config.database.host, "");
        assert_eq!(config.database.port, 9090);
        assert_eq!(config.database.max_conns, 35);
    }

    #[test]
    fn test_malformed_value_is_absorbed() {
        let source = env(&[("DATABASE_PORT", "notanumber"), ("DATABASE_HOST", "db")]);
        let mut config = AppConfig::default();
        let report = Loader::with_source(source).load(&mut config);

        // The bad key keeps its prior value and does not stop the rest.
        assert_eq!(config.database.port, 0);
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.max_conns, 35);

        assert_eq!(report.failures().len(), 1);
        let failure = &report.failures()[0];
        assert_eq!(failure.key, "DATABASE_PORT");
        assert!(matches!(
            failure.error,
            BindError::TypeCoercion { expected: LeafType::Integer, .. }
        ));
        assert_eq!(report.origin_of("DATABASE_PORT"), None);
    }

    #[test]
    fn test_malformed_default_is_reported() {
        #[derive(Debug, Default, EnvConfig)]
        struct Flags {
            #[env(d = "sometimes")]
            verbose: bool,
        }

        let mut config = Flags::default();
        let err = Loader::with_source(env(&[]))
            .load(&mut config)
            .into_result()
            .unwrap_err();
        assert_eq!(err.failures()[0].key, "VERBOSE");
        assert!(!config.verbose);
    }

    #[test]
    fn test_into_result_ok_when_clean() {
        let mut config = AppConfig::default();
        let report = Loader::with_source(env(&[])).load(&mut config).into_result();
        assert!(report.is_ok());
    }

    #[test]
    fn test_unset_without_default_keeps_prior_value() {
        let mut config = TestConfig {
            a: "kept".to_string(),
            ..Default::default()
        };
        Loader::with_source(env(&[])).load(&mut config);
        assert_eq!(config.a, "kept");
    }

    #[test]
    fn test_btreemap_source() {
        let source: BTreeMap<String, String> =
            [("A".to_string(), "tree".to_string())].into_iter().collect();
        let mut config = TestConfig::default();
        Loader::with_source(source).load(&mut config);
        assert_eq!(config.a, "tree");
    }

    #[test]
    fn test_process_env_rejects_invalid_names() {
        assert_eq!(ProcessEnv.lookup(""), None);
        assert_eq!(ProcessEnv.lookup("A=B"), None);
        assert_eq!(ProcessEnv.lookup("A\0B"), None);
    }
}
