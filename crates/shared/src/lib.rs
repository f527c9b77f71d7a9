//! Wire payloads, normalized routine model and error types shared by the
//! search client and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
