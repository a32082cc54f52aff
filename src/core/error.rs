/// Failures that are the user's to fix: they abort the run before anything is written or sent.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum InputError {
    #[display("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[display("missing credentials: `{variable}` is not set")]
    MissingCredentials { variable: &'static str },
}

impl InputError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    pub const fn missing(variable: &'static str) -> Self {
        Self::MissingCredentials { variable }
    }
}
