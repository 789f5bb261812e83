pub mod internal;
pub mod verification;

pub use internal::{FindTokenRequest, ProviderQuery};
pub use verification::{SendCodeRequest, VerifyCodeRequest};
