//! I2C bus service bindings.
//!
//! Six methods (`Read`, `ReadRegB`, `ReadRegW`, `Scan`, `Write`, `WriteRegB`)
//! described by an embedded definition. [`I2cClient`] calls a remote bus,
//! [`register`] puts an [`I2c`] implementation behind a dispatcher. Both share
//! one validator set, built on first use.

use std::sync::Arc;

use rpcstub_schema::{LazyValidators, ValidatorSet};

pub mod client;
pub mod service;
pub mod types;

pub use client::I2cClient;
pub use service::{dispatcher, register, I2c};
pub use types::*;

/// Embedded service definition.
pub const DEFINITION: &str = include_str!("i2c.json");

/// Service identifier: namespace followed by name.
pub const SERVICE_ID: &str = "http://mongoose-iot.com/fwI2C";

/// Validators for [`DEFINITION`], shared by every client and dispatcher.
pub static VALIDATORS: LazyValidators = LazyValidators::new(DEFINITION);

/// The shared validator set.
///
/// # Panics
///
/// If the embedded definition fails to compile.
pub fn validators() -> Arc<ValidatorSet> {
    VALIDATORS.get()
}
