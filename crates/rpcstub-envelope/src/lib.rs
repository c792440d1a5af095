//! Call envelopes and the JSON payload codec.
//!
//! A call is a [`Command`] (method identifier + raw JSON arguments) answered by
//! a [`Response`] (status code, optional message, raw JSON result). Both are
//! created per call and dropped when it completes.

pub mod codec;
pub mod envelope;
pub mod error;

pub use codec::{decode, encode, is_absent, reparse};
pub use envelope::{Command, Response, STATUS_OK};
pub use error::{CodecError, Result};
