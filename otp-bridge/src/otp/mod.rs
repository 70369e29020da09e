//! OTP extraction and the shared slot it is written to.
//!
//! ```text
//! message text → extract_otp() → OtpCode → OtpStore::put()
//! ```

pub mod extract;
pub mod store;

pub use extract::{extract_otp, OtpCode};
pub use store::{FileOtpStore, MemoryOtpStore, OtpStore};
