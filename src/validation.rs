//! Form Submission Guard
//!
//! The "signature required" rule, kept as plain logic so host pages (and the
//! web glue in this crate) only have to feed it two booleans.

use crate::error::{PadError, PadResult};

/// Message shown when a required signature is missing
pub const DEFAULT_MISSING_SIGNATURE_MESSAGE: &str = "Please sign the photo release form";

/// Decides whether a form may be submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitGuard {
    /// Message carried by the error when submission is blocked
    pub message: String,
}

impl SubmitGuard {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Check a submission attempt
    ///
    /// Blocks only when a signature is required and the pad is empty.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::SignatureRequired`] carrying the user message.
    pub fn check(&self, signature_required: bool, pad_is_empty: bool) -> PadResult<()> {
        if signature_required && pad_is_empty {
            log::info!("Submission blocked: signature required but pad is empty");
            return Err(PadError::SignatureRequired(self.message.clone()));
        }
        Ok(())
    }
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MISSING_SIGNATURE_MESSAGE)
    }
}
