use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use rule_vault::{
    constants::*,
    errors::{classify, ErrorKind, VaultError},
    state::{
        factory_address, fee_for, vault_address, vault_record_address, vault_tokens_address,
    },
};

// =============================================================================
// PDA derivation
// =============================================================================

#[test]
fn test_factory_pda_is_singleton() {
    let program_id = rule_vault::id();
    let (expected, expected_bump) = Pubkey::find_program_address(&[FACTORY_SEED], &program_id);
    assert_eq!(factory_address(), (expected, expected_bump));
}

#[test]
fn test_vault_pda_unique_per_index() {
    let (factory, _) = factory_address();
    let (first, _) = vault_address(&factory, 0);
    let (second, _) = vault_address(&factory, 1);
    assert_ne!(first, second, "Each creation index gets its own vault");

    let (expected, _) = Pubkey::find_program_address(
        &[VAULT_SEED, factory.as_ref(), &1u64.to_le_bytes()],
        &rule_vault::id(),
    );
    assert_eq!(second, expected);
}

#[test]
fn test_pda_uniqueness_across_seeds() {
    let (factory, _) = factory_address();
    let (vault, _) = vault_address(&factory, 7);
    let (record, _) = vault_record_address(&factory, 7);
    let (tokens, _) = vault_tokens_address(&vault);

    assert_ne!(vault, record);
    assert_ne!(vault, tokens);
    assert_ne!(record, tokens);
    assert_ne!(factory, vault);
}

// =============================================================================
// Fee math
// =============================================================================

#[test]
fn test_fee_caps() {
    assert_eq!(MAX_DEPOSIT_FEE_BPS, 100);
    assert_eq!(MAX_SUCCESS_FEE_BPS, 1_000);
    // 1% of 1_000_000 at the deposit cap
    assert_eq!(fee_for(1_000_000, MAX_DEPOSIT_FEE_BPS).unwrap(), 10_000);
    // 10% of 1_000_000 at the success cap
    assert_eq!(fee_for(1_000_000, MAX_SUCCESS_FEE_BPS).unwrap(), 100_000);
}

#[test]
fn test_fee_floor_on_small_amounts() {
    for amount in 1..=99u64 {
        assert_eq!(fee_for(amount, MAX_DEPOSIT_FEE_BPS).unwrap(), 0);
    }
    assert_eq!(fee_for(100, MAX_DEPOSIT_FEE_BPS).unwrap(), 1);
}

// =============================================================================
// Error classification
// =============================================================================

#[test]
fn test_every_error_has_a_kind() {
    for error in VaultError::ALL {
        let err: Error = error.into();
        assert_eq!(classify(&err), error.kind(), "{:?}", error);
    }
}

#[test]
fn test_error_kinds() {
    assert_eq!(VaultError::Unauthorized.kind(), ErrorKind::Authorization);
    assert_eq!(VaultError::NotGovernor.kind(), ErrorKind::Authorization);
    assert_eq!(VaultError::VaultNotLocked.kind(), ErrorKind::State);
    assert_eq!(VaultError::FailsafeNotExpired.kind(), ErrorKind::State);
    assert_eq!(VaultError::RuleAlreadyAdvanced.kind(), ErrorKind::State);
    assert_eq!(VaultError::NoRules.kind(), ErrorKind::Validation);
    assert_eq!(VaultError::DepositFeeTooHigh.kind(), ErrorKind::Validation);
    assert_eq!(VaultError::ConditionNotMet.kind(), ErrorKind::ConditionNotMet);
    assert_eq!(VaultError::MathOverflow.kind(), ErrorKind::Arithmetic);
}

#[test]
fn test_token_program_failures_are_transfer_errors() {
    let err: Error = ProgramError::InsufficientFunds.into();
    assert_eq!(classify(&err), ErrorKind::Transfer);
}

#[test]
fn test_framework_constraint_failures_are_validation_errors() {
    let err: Error = ErrorCode::ConstraintHasOne.into();
    assert_eq!(classify(&err), ErrorKind::Validation);
}

#[test]
fn test_error_codes_are_distinct() {
    let mut codes: Vec<u32> = VaultError::ALL.iter().map(|e| u32::from(*e)).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), VaultError::ALL.len());
}
