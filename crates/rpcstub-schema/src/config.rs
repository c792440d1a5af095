/// Default upper bound for a service definition read from disk.
pub const DEFAULT_MAX_DEFINITION_SIZE: usize = 256 * 1024;

/// Controls how service definitions are loaded and compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaConfig {
    /// When true, object schemas reject properties they do not declare.
    pub strict_mode: bool,
    /// Maximum bytes accepted when loading a definition file.
    pub max_definition_size: usize,
}

impl SchemaConfig {
    /// Default config, usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            strict_mode: false,
            max_definition_size: DEFAULT_MAX_DEFINITION_SIZE,
        }
    }

    /// Same as [`SchemaConfig::new`] with strict mode switched on.
    pub const fn strict() -> Self {
        Self {
            strict_mode: true,
            max_definition_size: DEFAULT_MAX_DEFINITION_SIZE,
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self::new()
    }
}
