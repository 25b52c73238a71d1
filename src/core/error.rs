use thiserror::Error;

/// Failures raised by the calculators. Every variant is terminal for the
/// request that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{0}")]
    InvalidInput(String),

    /// The constant payment never exceeds the interest accrued in a period.
    #[error("Extra payment too small - loan won't amortize with this payment")]
    InsufficientPayment,

    #[error("Loan did not amortize within {periods} periods")]
    DidNotConverge { periods: u32 },
}

impl CalcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CalcError::InvalidInput(msg.into())
    }

    /// Whether the input was well-formed but the scenario itself is unworkable.
    pub fn is_domain_error(&self) -> bool {
        !matches!(self, CalcError::InvalidInput(_))
    }
}
