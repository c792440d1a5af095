use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::validator::ValidatorSet;

/// Process-wide validator set for an embedded service definition.
///
/// Construction runs on first access and exactly once, however many threads
/// race for it; every caller observes the same outcome. Meant to live in a
/// `static` next to the embedded definition:
///
/// ```
/// use rpcstub_schema::LazyValidators;
///
/// static VALIDATORS: LazyValidators =
///     LazyValidators::new(r#"{"name":"Echo","methods":{"Echo":{"args":{"text":"string"}}}}"#);
///
/// let set = VALIDATORS.get();
/// assert!(set.contains("Echo"));
/// ```
pub struct LazyValidators {
    source: &'static str,
    config: SchemaConfig,
    cell: OnceLock<Result<Arc<ValidatorSet>, SchemaError>>,
    builds: AtomicUsize,
}

impl LazyValidators {
    /// Lazy validators for `source` with the default config.
    pub const fn new(source: &'static str) -> Self {
        Self::with_config(source, SchemaConfig::new())
    }

    /// Lazy validators with an explicit config.
    pub const fn with_config(source: &'static str, config: SchemaConfig) -> Self {
        Self {
            source,
            config,
            cell: OnceLock::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// Build (once) and return the validator set or the initialization error.
    pub fn try_get(&self) -> Result<&Arc<ValidatorSet>, &SchemaError> {
        self.cell
            .get_or_init(|| {
                self.builds.fetch_add(1, Ordering::SeqCst);
                ValidatorSet::from_source(self.source.as_bytes(), &self.config)
                    .map(Arc::new)
                    .inspect_err(|err| {
                        tracing::error!(error = %err, "service definition failed to initialize");
                    })
            })
            .as_ref()
    }

    /// Build (once) and return the validator set.
    ///
    /// # Panics
    ///
    /// Panics if the embedded definition is malformed. A service whose schema
    /// set cannot be built must never serve or issue calls.
    pub fn get(&self) -> Arc<ValidatorSet> {
        match self.try_get() {
            Ok(set) => Arc::clone(set),
            Err(err) => panic!("service definition failed to initialize: {err}"),
        }
    }

    /// Whether construction has already completed.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Number of constructions that ran. Never more than one.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// The embedded definition source.
    pub fn source(&self) -> &'static str {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use crate::validator::Direction;

    use super::*;

    const COUNTER: &str = r#"{
        "name": "Counter",
        "methods": {
            "Add": { "args": { "n": "integer" }, "required_args": ["n"], "result": "integer" }
        }
    }"#;

    #[test]
    fn builds_on_first_access_only() {
        static VALIDATORS: LazyValidators = LazyValidators::new(COUNTER);
        assert!(!VALIDATORS.is_initialized());
        assert_eq!(VALIDATORS.build_count(), 0);

        let first = VALIDATORS.get();
        let second = VALIDATORS.get();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(VALIDATORS.is_initialized());
        assert_eq!(VALIDATORS.build_count(), 1);
        assert!(first.get("Add", Direction::Args).is_some());
    }

    #[test]
    fn concurrent_first_access_builds_once() {
        static VALIDATORS: LazyValidators = LazyValidators::new(COUNTER);
        const THREADS: usize = 16;

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    VALIDATORS.get()
                })
            })
            .collect();

        let sets: Vec<Arc<ValidatorSet>> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert_eq!(VALIDATORS.build_count(), 1);
        assert!(sets.iter().all(|set| Arc::ptr_eq(set, &sets[0])));
    }

    #[test]
    fn malformed_definition_is_sticky() {
        static BROKEN: LazyValidators = LazyValidators::new(r#"{"name":"Broken"}"#);
        assert!(matches!(BROKEN.try_get(), Err(SchemaError::Malformed(_))));
        assert!(BROKEN.try_get().is_err());
        assert_eq!(BROKEN.build_count(), 1);
    }

    #[test]
    #[should_panic(expected = "service definition failed to initialize")]
    fn get_panics_on_malformed_definition() {
        static BROKEN: LazyValidators = LazyValidators::new("not json");
        let _ = BROKEN.get();
    }

    #[test]
    fn strict_config_is_applied() {
        static STRICT: LazyValidators = LazyValidators::with_config(COUNTER, SchemaConfig::strict());
        let set = STRICT.get();
        let args = set.get("Add", Direction::Args).unwrap();
        assert!(args.validate(&serde_json::json!({ "n": 1 })).is_ok());
        assert!(args.validate(&serde_json::json!({ "n": 1, "m": 2 })).is_err());
    }
}
