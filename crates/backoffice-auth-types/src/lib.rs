//! Identity types shared by Backoffice services.
//!
//! Provides access-token validation and the `IdentityHeaders` extractor for the
//! principal injected in front of each service.

pub mod identity;
pub mod token;
