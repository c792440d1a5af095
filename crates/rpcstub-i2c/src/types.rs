//! Typed payloads and method bindings of the I2C service.
//!
//! Field names match the schema property names. Every field is optional and
//! left out of the encoded JSON when unset.

use rpcstub_service::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadArgs {
    /// Address of the device, 7 or 10 bits (not including the r/w bit).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<i64>,
    /// Number of bytes to read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResult {
    /// Hex-encoded data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_hex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRegBArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<i64>,
    /// Register number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRegBResult {
    /// Register value read from the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRegWArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRegWResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<i64>,
    /// Hex-encoded data to write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_hex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRegBArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg: Option<i64>,
    /// Register value to write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

/// Read specified number of bytes from the specified device.
#[derive(Debug, Clone, Copy)]
pub struct Read;

impl Method for Read {
    const NAME: &'static str = "Read";
    type Args = ReadArgs;
    type Output = ReadResult;
}

/// Read value of a byte-sized (8-bit) register.
#[derive(Debug, Clone, Copy)]
pub struct ReadRegB;

impl Method for ReadRegB {
    const NAME: &'static str = "ReadRegB";
    type Args = ReadRegBArgs;
    type Output = ReadRegBResult;
}

/// Read value of a word-sized (16-bit) register.
#[derive(Debug, Clone, Copy)]
pub struct ReadRegW;

impl Method for ReadRegW {
    const NAME: &'static str = "ReadRegW";
    type Args = ReadRegWArgs;
    type Output = ReadRegWResult;
}

/// Scan the bus, returning addresses of devices that responded.
#[derive(Debug, Clone, Copy)]
pub struct Scan;

impl Method for Scan {
    const NAME: &'static str = "Scan";
    type Args = ();
    type Output = Vec<i64>;
}

/// Write data to the device with the specified address.
#[derive(Debug, Clone, Copy)]
pub struct Write;

impl Method for Write {
    const NAME: &'static str = "Write";
    type Args = WriteArgs;
    type Output = ();
}

/// Write value of a byte-sized register.
#[derive(Debug, Clone, Copy)]
pub struct WriteRegB;

impl Method for WriteRegB {
    const NAME: &'static str = "WriteRegB";
    type Args = WriteRegBArgs;
    type Output = ();
}
