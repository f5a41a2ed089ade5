use crate::record::Stage;

// Error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum EscrowError {
    /// A sale already exists for the property id.
    AlreadyExists,
    /// No sale exists for the property id.
    NotFound,
    /// Caller does not hold the role the operation requires.
    Unauthorized,
    /// The sale is not in the stage the operation requires.
    InvalidTransition { expected: Stage, actual: Stage },
    /// Payment differs from price, price is zero, or tax exceeds price.
    InvalidAmount,
    /// Role addresses are missing or not pairwise distinct.
    InvalidParties,
    /// Funds could not be moved; nothing was committed.
    SettlementFailure,
    /// New sales are not accepted while the contract is paused.
    ContractPaused,
}

pub type Result<T> = core::result::Result<T, EscrowError>;

/// Failure reported by the layer that actually moves funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum SettlementError {
    /// The custodied balance cannot cover the distribution.
    InsufficientCustody,
    /// A transfer leg was refused.
    TransferFailed,
}

impl From<SettlementError> for EscrowError {
    fn from(_: SettlementError) -> Self {
        EscrowError::SettlementFailure
    }
}
