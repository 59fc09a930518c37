//! Services that tie the matchers together and persist their results.

pub mod history;
pub mod verification;

pub use history::record_pass;
pub use verification::{Verifier, VerifyError};
