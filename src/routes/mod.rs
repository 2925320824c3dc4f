/// Router Module Index
///
/// Routes are split by access level so that authentication is applied to a whole
/// module at once (via an Axum route layer) instead of handler by handler.

/// Routes accessible to anonymous clients: reads and the identity gateways.
pub mod public;

/// Routes protected by the `AuthUser` middleware. Requires a valid bearer credential.
pub mod authenticated;
