pub mod claims;
pub mod identity;
pub mod jwt;

pub use claims::Claims;
pub use identity::Identity;
pub use jwt::{mint_access_token, verify_access_token, VerificationError};
