//! Session handling: token persistence, local claim decoding and the
//! session store.

pub mod claims;
pub mod store;
pub mod token;

pub use claims::{decode_claims, validate_claims};
pub use store::{SessionState, SessionStore};
pub use token::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
