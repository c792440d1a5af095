//! Schema-validated RPC stubs.
//!
//! A service is described once by a JSON definition. Every call is checked
//! against that definition on both sides: the client refuses to send invalid
//! arguments and refuses to decode invalid results, the dispatcher refuses to
//! run an implementation on invalid arguments and withholds invalid results.
//!
//! # Crate Structure
//!
//! - [`schema`]: definitions, normalization and per-method validators
//! - [`envelope`]: command/response envelopes and the JSON codec
//! - [`transport`]: transport contract, call context, in-process loopback
//! - [`service`]: client proxy and server dispatcher
//! - [`i2c`]: bindings for the I2C bus service (behind `i2c` feature)

/// Re-export schema types.
pub mod schema {
    pub use rpcstub_schema::*;
}

/// Re-export envelope types.
pub mod envelope {
    pub use rpcstub_envelope::*;
}

/// Re-export transport types.
pub mod transport {
    pub use rpcstub_transport::*;
}

/// Re-export client and dispatcher types.
pub mod service {
    pub use rpcstub_service::*;
}

/// Re-export I2C bindings (requires `i2c` feature).
#[cfg(feature = "i2c")]
pub mod i2c {
    pub use rpcstub_i2c::*;
}
