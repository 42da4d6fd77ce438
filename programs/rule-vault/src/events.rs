use anchor_lang::prelude::*;

/// Event emitted when the factory is initialized
#[event]
pub struct FactoryInitialized {
    pub factory: Pubkey,
    pub governor: Pubkey,
    pub treasury: Pubkey,
    pub logic_module: Pubkey,
    pub deposit_fee_bps: u16,
    pub success_fee_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct FeesUpdated {
    pub factory: Pubkey,
    pub deposit_fee_bps: u16,
    pub success_fee_bps: u16,
    pub policy_version: u64,
    pub timestamp: i64,
}

#[event]
pub struct LogicModuleUpgraded {
    pub factory: Pubkey,
    pub previous: Pubkey,
    pub logic_module: Pubkey,
    pub policy_version: u64,
    pub timestamp: i64,
}

#[event]
pub struct TreasuryUpdated {
    pub factory: Pubkey,
    pub previous: Pubkey,
    pub treasury: Pubkey,
    pub policy_version: u64,
    pub timestamp: i64,
}

#[event]
pub struct GovernanceTransferred {
    pub factory: Pubkey,
    pub previous: Pubkey,
    pub governor: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a vault is created and registered
#[event]
pub struct VaultCreated {
    pub vault: Pubkey,
    pub index: u64,
    pub owner: Pubkey,
    pub deposit_mint: Pubkey,
    pub failsafe_duration: i64,
    pub rule_count: u32,
    pub policy_version: u64,
    pub timestamp: i64,
}

/// Event emitted when a rule account is created
#[event]
pub struct RuleCreated {
    pub rule: Pubkey,
    pub creator: Pubkey,
    pub description: String,
    pub timestamp: i64,
}

#[event]
pub struct PriceFeedUpdated {
    pub feed: Pubkey,
    pub value: i64,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub depositor: Pubkey,
    pub net_amount: u64,
    pub fee: u64,
    pub total_deposited: u64,
    pub timestamp: i64,
}

#[event]
pub struct RuleAdded {
    pub vault: Pubkey,
    pub rule: Pubkey,
    pub index: u32,
    pub timestamp: i64,
}

/// Event emitted when a keeper advances the rule cursor
#[event]
pub struct RuleExecuted {
    pub vault: Pubkey,
    pub index: u32,
    pub rule: Pubkey,
    pub success: bool,
    pub executor: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the final rule executes
#[event]
pub struct VaultCompleted {
    pub vault: Pubkey,
    pub rule_count: u32,
    pub timestamp: i64,
}

#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub profit: u64,
    pub success_fee: u64,
    pub timestamp: i64,
}

#[event]
pub struct FailsafeWithdrawn {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
