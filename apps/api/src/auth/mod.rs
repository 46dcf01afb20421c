//! Accounts and request identity.
//!
//! Every authenticated handler receives an [`AuthUser`] extracted from the
//! bearer token and passes its id explicitly to the repositories.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod token;
pub mod users;

pub use extractor::AuthUser;
pub use token::TokenIssuer;
