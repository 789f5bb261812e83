//! Response records and the short-lived tokens minted for them.

mod exchange;


pub(crate) use exchange::discard_transient_fields;
pub use exchange::TokenExchange;
