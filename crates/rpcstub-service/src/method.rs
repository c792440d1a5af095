use serde::de::DeserializeOwned;
use serde::Serialize;

/// Typed binding of one declared method.
///
/// `Args` and `Output` mirror the method's normalized schemas: structs with
/// `Option` fields named after the schema properties, skipped when absent.
/// Methods that take no arguments or return nothing use `()`.
///
/// ```
/// use rpcstub_service::Method;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct EchoArgs {
///     #[serde(skip_serializing_if = "Option::is_none")]
///     text: Option<String>,
/// }
///
/// struct Echo;
///
/// impl Method for Echo {
///     const NAME: &'static str = "Echo";
///     type Args = EchoArgs;
///     type Output = ();
/// }
/// ```
pub trait Method {
    /// Unqualified method name as declared in the definition.
    const NAME: &'static str;
    /// Decoded argument envelope. `Default` stands for "no arguments provided".
    type Args: Serialize + DeserializeOwned + Default;
    /// Decoded result. `Default` is returned for methods without a declared result.
    type Output: Serialize + DeserializeOwned + Default;
}
