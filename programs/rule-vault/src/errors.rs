use anchor_lang::error::{Error, ERROR_CODE_OFFSET};
use anchor_lang::prelude::*;

/// Custom error codes for the Rule Vault program
///
/// Every failed precondition has its own code so keepers and owners can tell
/// "try again later" from "not allowed" from "fix your input".
#[error_code]
pub enum VaultError {
    // Authorization
    #[msg("Unauthorized - only the vault owner can perform this action")]
    Unauthorized,

    #[msg("Unauthorized - only the factory governor can perform this action")]
    NotGovernor,

    #[msg("Unauthorized - only the feed authority can publish prices")]
    NotFeedAuthority,

    // State
    #[msg("Vault is no longer locked")]
    VaultNotLocked,

    #[msg("Vault has not completed its rule sequence")]
    VaultNotCompleted,

    #[msg("Failsafe timer not expired")]
    FailsafeNotExpired,

    #[msg("Current rule already advanced by another caller")]
    RuleAlreadyAdvanced,

    #[msg("Rule account does not match the vault's current rule")]
    RuleMismatch,

    #[msg("Vault has reached the maximum number of rules")]
    TooManyRules,

    // Validation
    #[msg("Deposit amount must be greater than zero")]
    ZeroDepositAmount,

    #[msg("Deposit fee too high (max 1%)")]
    DepositFeeTooHigh,

    #[msg("Success fee too high (max 10%)")]
    SuccessFeeTooHigh,

    #[msg("Failsafe must be at least 1 day")]
    FailsafeTooShort,

    #[msg("Failsafe too long (max 100 years)")]
    FailsafeTooLong,

    #[msg("A vault needs at least one rule")]
    NoRules,

    #[msg("Identity must not be the default pubkey")]
    InvalidIdentity,

    #[msg("Account is not a rule created by this program")]
    InvalidRule,

    #[msg("Rule accounts must be supplied in the same order as the rule list")]
    RuleAccountsMismatch,

    #[msg("Account is not a price feed created by this program")]
    InvalidPriceFeed,

    #[msg("Target value must be greater than zero")]
    InvalidTarget,

    #[msg("Feed description too long - maximum 32 characters")]
    DescriptionTooLong,

    #[msg("Invalid token mint - does not match vault deposit mint")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Treasury account does not match the vault's fee recipient")]
    InvalidTreasury,

    #[msg("Registry record does not match the requested index")]
    InvalidRecord,

    #[msg("Too many registry records requested in one call")]
    PageTooLarge,

    // Condition
    #[msg("Rule condition not met")]
    ConditionNotMet,

    // Arithmetic
    #[msg("Math overflow occurred during calculation")]
    MathOverflow,
}

/// Coarse classification of a failure, for callers deciding whether to retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    State,
    Validation,
    ConditionNotMet,
    Transfer,
    Arithmetic,
}

impl VaultError {
    pub const ALL: [VaultError; 28] = [
        VaultError::Unauthorized,
        VaultError::NotGovernor,
        VaultError::NotFeedAuthority,
        VaultError::VaultNotLocked,
        VaultError::VaultNotCompleted,
        VaultError::FailsafeNotExpired,
        VaultError::RuleAlreadyAdvanced,
        VaultError::RuleMismatch,
        VaultError::TooManyRules,
        VaultError::ZeroDepositAmount,
        VaultError::DepositFeeTooHigh,
        VaultError::SuccessFeeTooHigh,
        VaultError::FailsafeTooShort,
        VaultError::FailsafeTooLong,
        VaultError::NoRules,
        VaultError::InvalidIdentity,
        VaultError::InvalidRule,
        VaultError::RuleAccountsMismatch,
        VaultError::InvalidPriceFeed,
        VaultError::InvalidTarget,
        VaultError::DescriptionTooLong,
        VaultError::InvalidMint,
        VaultError::InvalidOwner,
        VaultError::InvalidTreasury,
        VaultError::InvalidRecord,
        VaultError::PageTooLarge,
        VaultError::ConditionNotMet,
        VaultError::MathOverflow,
    ];

    pub fn kind(&self) -> ErrorKind {
        match self {
            VaultError::Unauthorized | VaultError::NotGovernor | VaultError::NotFeedAuthority => {
                ErrorKind::Authorization
            }
            VaultError::VaultNotLocked
            | VaultError::VaultNotCompleted
            | VaultError::FailsafeNotExpired
            | VaultError::RuleAlreadyAdvanced
            | VaultError::RuleMismatch
            | VaultError::TooManyRules => ErrorKind::State,
            VaultError::ConditionNotMet => ErrorKind::ConditionNotMet,
            VaultError::MathOverflow => ErrorKind::Arithmetic,
            _ => ErrorKind::Validation,
        }
    }
}

/// Classify any error surfaced by an instruction of this program.
///
/// Anchor framework codes (account constraint failures) are `Validation`.
/// Errors that did not originate here (SPL token CPI failures such as
/// insufficient funds) are reported as `Transfer`.
pub fn classify(err: &Error) -> ErrorKind {
    match err {
        Error::AnchorError(e) if e.error_code_number < ERROR_CODE_OFFSET => ErrorKind::Validation,
        Error::AnchorError(e) => VaultError::ALL
            .iter()
            .find(|v| u32::from(**v) == e.error_code_number)
            .map(|v| v.kind())
            .unwrap_or(ErrorKind::Transfer),
        Error::ProgramError(_) => ErrorKind::Transfer,
    }
}
