use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Singleton factory configuration: governance, fee policy and registry counter
///
/// Security considerations:
/// - Governor stored in state, checked via ensure_governor on every governance call
/// - Fee caps validated before any value is accepted
/// - policy_version lets each vault record which policy it snapshotted
#[account]
pub struct FactoryConfig {
    /// Only signer allowed to change fees, treasury, logic module or governor
    pub governor: Pubkey,           // 32 bytes

    /// Wallet receiving deposit and success fees
    pub treasury: Pubkey,           // 32 bytes

    /// Logic module reference bound into newly created vaults
    pub logic_module: Pubkey,       // 32 bytes

    /// Fee charged on every deposit, in bps
    pub deposit_fee_bps: u16,       // 2 bytes

    /// Fee charged on realized profit at successful withdrawal, in bps
    pub success_fee_bps: u16,       // 2 bytes

    /// Number of vaults created; also the next registry index
    pub vault_count: u64,           // 8 bytes

    /// Incremented on every policy change
    pub policy_version: u64,        // 8 bytes

    pub bump: u8,                   // 1 byte

    pub _reserved: [u8; 64],        // 64 bytes
}

/// Registry entry: creation index -> vault address. Never closed.
#[account]
pub struct VaultRecord {
    pub factory: Pubkey,
    pub index: u64,
    pub vault: Pubkey,
    pub bump: u8,
}

/// Policy values copied into a vault at creation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicySnapshot {
    pub treasury: Pubkey,
    pub logic_module: Pubkey,
    pub deposit_fee_bps: u16,
    pub success_fee_bps: u16,
    pub policy_version: u64,
}

impl FactoryConfig {
    pub fn validate_fees(deposit_fee_bps: u16, success_fee_bps: u16) -> Result<()> {
        require!(
            deposit_fee_bps <= MAX_DEPOSIT_FEE_BPS,
            VaultError::DepositFeeTooHigh
        );
        require!(
            success_fee_bps <= MAX_SUCCESS_FEE_BPS,
            VaultError::SuccessFeeTooHigh
        );
        Ok(())
    }

    pub fn validate_failsafe_duration(duration: i64) -> Result<()> {
        require!(duration >= MIN_FAILSAFE_DURATION, VaultError::FailsafeTooShort);
        require!(duration <= MAX_FAILSAFE_DURATION, VaultError::FailsafeTooLong);
        Ok(())
    }

    pub fn ensure_governor(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(self.governor, *signer, VaultError::NotGovernor);
        Ok(())
    }

    pub fn initialize(
        &mut self,
        governor: Pubkey,
        logic_module: Pubkey,
        treasury: Pubkey,
        deposit_fee_bps: u16,
        success_fee_bps: u16,
        bump: u8,
    ) -> Result<()> {
        require_keys_neq!(logic_module, Pubkey::default(), VaultError::InvalidIdentity);
        require_keys_neq!(treasury, Pubkey::default(), VaultError::InvalidIdentity);
        Self::validate_fees(deposit_fee_bps, success_fee_bps)?;

        self.governor = governor;
        self.treasury = treasury;
        self.logic_module = logic_module;
        self.deposit_fee_bps = deposit_fee_bps;
        self.success_fee_bps = success_fee_bps;
        self.vault_count = 0;
        self.policy_version = 1;
        self.bump = bump;
        self._reserved = [0; 64];
        Ok(())
    }

    /// Replace both fees after validating each. Nothing changes on error.
    pub fn set_fees(&mut self, deposit_fee_bps: u16, success_fee_bps: u16) -> Result<()> {
        Self::validate_fees(deposit_fee_bps, success_fee_bps)?;
        self.deposit_fee_bps = deposit_fee_bps;
        self.success_fee_bps = success_fee_bps;
        self.bump_version()
    }

    /// Only vaults created after this call bind to `logic_module`.
    pub fn set_logic_module(&mut self, logic_module: Pubkey) -> Result<()> {
        require_keys_neq!(logic_module, Pubkey::default(), VaultError::InvalidIdentity);
        self.logic_module = logic_module;
        self.bump_version()
    }

    pub fn set_treasury(&mut self, treasury: Pubkey) -> Result<()> {
        require_keys_neq!(treasury, Pubkey::default(), VaultError::InvalidIdentity);
        self.treasury = treasury;
        self.bump_version()
    }

    pub fn set_governor(&mut self, governor: Pubkey) -> Result<()> {
        require_keys_neq!(governor, Pubkey::default(), VaultError::InvalidIdentity);
        self.governor = governor;
        Ok(())
    }

    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            treasury: self.treasury,
            logic_module: self.logic_module,
            deposit_fee_bps: self.deposit_fee_bps,
            success_fee_bps: self.success_fee_bps,
            policy_version: self.policy_version,
        }
    }

    /// Reserve the next registry index
    pub fn register_vault(&mut self) -> Result<u64> {
        let index = self.vault_count;
        self.vault_count = self
            .vault_count
            .checked_add(1)
            .ok_or(error!(VaultError::MathOverflow))?;
        Ok(index)
    }

    fn bump_version(&mut self) -> Result<()> {
        self.policy_version = self
            .policy_version
            .checked_add(1)
            .ok_or(error!(VaultError::MathOverflow))?;
        Ok(())
    }
}

impl VaultRecord {
    /// Check a record loaded from an untyped account against the expected slot
    pub fn ensure_slot(&self, factory: &Pubkey, index: u64) -> Result<()> {
        require_keys_eq!(self.factory, *factory, VaultError::InvalidRecord);
        require!(self.index == index, VaultError::InvalidRecord);
        Ok(())
    }

    pub fn load(info: &AccountInfo) -> Result<VaultRecord> {
        require_keys_eq!(*info.owner, crate::ID, VaultError::InvalidRecord);
        let data = info.try_borrow_data()?;
        VaultRecord::try_deserialize(&mut &data[..]).map_err(|_| error!(VaultError::InvalidRecord))
    }
}

pub fn factory_address() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FACTORY_SEED], &crate::ID)
}

pub fn vault_address(factory: &Pubkey, index: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_SEED, factory.as_ref(), &index.to_le_bytes()],
        &crate::ID,
    )
}

pub fn vault_tokens_address(vault: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_TOKENS_SEED, vault.as_ref()], &crate::ID)
}

pub fn vault_record_address(factory: &Pubkey, index: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_RECORD_SEED, factory.as_ref(), &index.to_le_bytes()],
        &crate::ID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_factory() -> FactoryConfig {
        let mut factory = FactoryConfig {
            governor: Pubkey::default(),
            treasury: Pubkey::default(),
            logic_module: Pubkey::default(),
            deposit_fee_bps: 0,
            success_fee_bps: 0,
            vault_count: 0,
            policy_version: 0,
            bump: 0,
            _reserved: [0; 64],
        };
        factory
            .initialize(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                10,
                200,
                255,
            )
            .unwrap();
        factory
    }

    #[test]
    fn test_governor_check_follows_transfer() {
        let mut factory = mock_factory();
        let original = factory.governor;
        assert!(factory.ensure_governor(&original).is_ok());
        assert!(factory.ensure_governor(&Pubkey::new_unique()).is_err());

        let successor = Pubkey::new_unique();
        factory.set_governor(successor).unwrap();
        assert!(factory.ensure_governor(&successor).is_ok());
        assert!(factory.ensure_governor(&original).is_err());
    }

    #[test]
    fn test_initialize_sets_version_one() {
        let factory = mock_factory();
        assert_eq!(factory.policy_version, 1);
        assert_eq!(factory.vault_count, 0);
        assert_eq!(factory.deposit_fee_bps, 10);
        assert_eq!(factory.success_fee_bps, 200);
    }

    #[test]
    fn test_initialize_rejects_default_treasury() {
        let mut factory = mock_factory();
        let result = factory.initialize(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::default(),
            10,
            200,
            255,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fee_caps_inclusive() {
        assert!(FactoryConfig::validate_fees(100, 1_000).is_ok());
        assert!(FactoryConfig::validate_fees(101, 1_000).is_err());
        assert!(FactoryConfig::validate_fees(50, 1_001).is_err());
    }

    #[test]
    fn test_rejected_fee_update_leaves_policy_untouched() {
        let mut factory = mock_factory();
        assert!(factory.set_fees(50, 1_001).is_err());
        assert_eq!(factory.deposit_fee_bps, 10);
        assert_eq!(factory.success_fee_bps, 200);
        assert_eq!(factory.policy_version, 1);

        factory.set_fees(50, 500).unwrap();
        assert_eq!(factory.deposit_fee_bps, 50);
        assert_eq!(factory.success_fee_bps, 500);
        assert_eq!(factory.policy_version, 2);
    }

    #[test]
    fn test_failsafe_bounds() {
        assert!(FactoryConfig::validate_failsafe_duration(23 * 60 * 60).is_err());
        assert!(FactoryConfig::validate_failsafe_duration(MIN_FAILSAFE_DURATION).is_ok());
        assert!(FactoryConfig::validate_failsafe_duration(MAX_FAILSAFE_DURATION).is_ok());
        assert!(FactoryConfig::validate_failsafe_duration(101 * 365 * SECONDS_PER_DAY).is_err());
    }

    #[test]
    fn test_register_vault_is_sequential() {
        let mut factory = mock_factory();
        assert_eq!(factory.register_vault().unwrap(), 0);
        assert_eq!(factory.register_vault().unwrap(), 1);
        assert_eq!(factory.register_vault().unwrap(), 2);
        assert_eq!(factory.vault_count, 3);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_updates() {
        let mut factory = mock_factory();
        let before = factory.snapshot();

        let new_logic = Pubkey::new_unique();
        factory.set_logic_module(new_logic).unwrap();
        factory.set_fees(0, 0).unwrap();

        assert_ne!(before.logic_module, new_logic);
        assert_eq!(before.deposit_fee_bps, 10);
        assert_eq!(before.policy_version, 1);
        assert_eq!(factory.snapshot().policy_version, 3);
    }

    #[test]
    fn test_record_slot_check() {
        let factory = Pubkey::new_unique();
        let record = VaultRecord {
            factory,
            index: 4,
            vault: Pubkey::new_unique(),
            bump: 0,
        };
        assert!(record.ensure_slot(&factory, 4).is_ok());
        assert!(record.ensure_slot(&factory, 5).is_err());
        assert!(record.ensure_slot(&Pubkey::new_unique(), 4).is_err());
    }
}
