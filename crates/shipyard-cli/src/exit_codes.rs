//! Process exit codes. Part of the public contract of the `shipyard` binary.

use shipyard_authz::AuthzError;
use shipyard_core::DocumentError;

pub const SUCCESS: i32 = 0;
pub const PERMISSION_DENIED: i32 = 1; // Check answered, permission not granted
pub const CONFIG_ERROR: i32 = 2; // Bad flags, references or client setup
pub const INPUT_ERROR: i32 = 3; // Unreadable, unparsable or unrepresentable input
pub const AUTH_ERROR: i32 = 4; // Token rejected
pub const NETWORK_ERROR: i32 = 5; // Connect/TLS failure or timeout
pub const REMOTE_ERROR: i32 = 6; // Service error or undecodable response

/// Pick the exit code for the first library error in the chain.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<DocumentError>() {
                Some(e.exit_code())
            } else {
                cause.downcast_ref::<AuthzError>().map(AuthzError::exit_code)
            }
        })
        .unwrap_or(CONFIG_ERROR)
}
