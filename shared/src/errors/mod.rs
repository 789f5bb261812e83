//! Numeric envelope codes shared by the domain and the HTTP surface

/// Stable codes carried in the `code` field of the response envelope
///
/// Provider failures carry the provider's own code instead.
pub mod error_codes {
    pub const OK: i32 = 0;
    pub const INVALID_INPUT: i32 = 1;
    pub const UNAUTHORIZED: i32 = -1;
    pub const STORE_WRITE: i32 = 20001;
    pub const STORE_READ: i32 = 20002;
    pub const NOT_FOUND: i32 = 20404;
    pub const RATE_LIMITED: i32 = 20429;
    pub const INTERNAL: i32 = 20500;
}
