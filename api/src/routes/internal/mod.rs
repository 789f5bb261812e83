//! Internal endpoints for downstream systems and operators

pub mod change_provider;
pub mod find_token;

pub use change_provider::change_provider;
pub use find_token::find_token;
