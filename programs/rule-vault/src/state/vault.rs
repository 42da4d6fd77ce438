use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::VaultError,
    state::{fee_for, FactoryConfig, PolicySnapshot},
};

/// Per-strategy escrow state
///
/// Security considerations:
/// - Owner stored in state; fund-moving and rule-adding calls check ensure_owner
/// - Fee policy snapshotted at creation, never re-read from the factory
/// - current_rule_index only ever moves forward by exactly one
/// - Custody lives in a PDA token account whose authority is this PDA
#[account]
pub struct Vault {
    /// Factory that created this vault
    pub factory: Pubkey,            // 32 bytes

    /// Creation index in the factory registry
    pub index: u64,                 // 8 bytes

    /// Only identity allowed to add rules or withdraw
    pub owner: Pubkey,              // 32 bytes

    /// The single mint this vault custodies
    pub deposit_mint: Pubkey,       // 32 bytes

    /// PDA token account holding deposits
    pub token_account: Pubkey,      // 32 bytes

    /// Fee recipient wallet (snapshot)
    pub treasury: Pubkey,           // 32 bytes

    /// Logic module reference at creation (snapshot)
    pub logic_module: Pubkey,       // 32 bytes

    /// Factory policy version this vault snapshotted
    pub policy_version: u64,        // 8 bytes

    pub deposit_fee_bps: u16,       // 2 bytes
    pub success_fee_bps: u16,       // 2 bytes

    /// Ordered rule accounts; append-only while locked
    pub rules: Vec<Pubkey>,         // 4 + 16 * 32 bytes

    /// Cursor into `rules`; never exceeds rules.len()
    pub current_rule_index: u32,    // 4 bytes

    pub is_locked: bool,            // 1 byte
    pub completed_successfully: bool, // 1 byte

    /// Running sum of net (post-fee) deposits
    pub total_deposited: u64,       // 8 bytes

    pub created_at: i64,            // 8 bytes
    pub failsafe_duration: i64,     // 8 bytes

    pub bump: u8,                   // 1 byte
    pub token_bump: u8,             // 1 byte

    pub _reserved: [u8; 64],        // 64 bytes
}

/// Where a vault is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultPhase {
    /// Waiting on the rule at this index
    Locked(u32),
    CompletedSuccessfully,
    FailsafeUnlocked,
}

/// Parameters fixed when a vault is created
#[derive(Clone, Debug)]
pub struct VaultInit {
    pub factory: Pubkey,
    pub index: u64,
    pub owner: Pubkey,
    pub deposit_mint: Pubkey,
    pub token_account: Pubkey,
    pub failsafe_duration: i64,
    pub rules: Vec<Pubkey>,
    pub created_at: i64,
    pub bump: u8,
    pub token_bump: u8,
}

/// Split of a gross deposit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositSplit {
    pub fee: u64,
    pub net: u64,
}

/// Payouts for a successful withdrawal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub profit: u64,
    pub success_fee: u64,
    pub to_owner: u64,
}

/// Read-only status surface
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VaultStatus {
    pub is_locked: bool,
    pub current_rule_index: u32,
    pub failsafe_deadline: i64,
    pub deposit_token: Pubkey,
    pub completed_successfully: bool,
    pub rule_count: u32,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfitDetails {
    pub total_deposited: u64,
    pub balance: u64,
    pub profit: u64,
}

impl Vault {
    pub fn initialize(&mut self, init: VaultInit, policy: &PolicySnapshot) -> Result<()> {
        require_keys_neq!(init.owner, Pubkey::default(), VaultError::InvalidIdentity);
        require_keys_neq!(init.deposit_mint, Pubkey::default(), VaultError::InvalidIdentity);
        require!(!init.rules.is_empty(), VaultError::NoRules);
        require!(init.rules.len() <= MAX_RULES, VaultError::TooManyRules);
        FactoryConfig::validate_failsafe_duration(init.failsafe_duration)?;

        self.factory = init.factory;
        self.index = init.index;
        self.owner = init.owner;
        self.deposit_mint = init.deposit_mint;
        self.token_account = init.token_account;
        self.treasury = policy.treasury;
        self.logic_module = policy.logic_module;
        self.policy_version = policy.policy_version;
        self.deposit_fee_bps = policy.deposit_fee_bps;
        self.success_fee_bps = policy.success_fee_bps;
        self.rules = init.rules;
        self.current_rule_index = 0;
        self.is_locked = true;
        self.completed_successfully = false;
        self.total_deposited = 0;
        self.created_at = init.created_at;
        self.failsafe_duration = init.failsafe_duration;
        self.bump = init.bump;
        self.token_bump = init.token_bump;
        self._reserved = [0; 64];
        Ok(())
    }

    /// Rule-adding and fund-moving calls are reserved to the owner
    pub fn ensure_owner(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(self.owner, *signer, VaultError::Unauthorized);
        Ok(())
    }

    pub fn phase(&self) -> VaultPhase {
        if self.is_locked {
            VaultPhase::Locked(self.current_rule_index)
        } else if self.completed_successfully {
            VaultPhase::CompletedSuccessfully
        } else {
            VaultPhase::FailsafeUnlocked
        }
    }

    pub fn failsafe_deadline(&self) -> Result<i64> {
        self.created_at
            .checked_add(self.failsafe_duration)
            .ok_or(error!(VaultError::MathOverflow))
    }

    /// Fee and net for a deposit of `amount`; `fee + net == amount`.
    ///
    /// Deposits are only accepted while the vault is locked, whichever
    /// terminal path unlocked it.
    pub fn split_deposit(&self, amount: u64) -> Result<DepositSplit> {
        require!(amount > 0, VaultError::ZeroDepositAmount);
        require!(self.is_locked, VaultError::VaultNotLocked);

        let fee = fee_for(amount, self.deposit_fee_bps)?;
        let net = amount
            .checked_sub(fee)
            .ok_or(error!(VaultError::MathOverflow))?;
        Ok(DepositSplit { fee, net })
    }

    pub fn record_deposit(&mut self, net: u64) -> Result<()> {
        self.total_deposited = self
            .total_deposited
            .checked_add(net)
            .ok_or(error!(VaultError::MathOverflow))?;
        Ok(())
    }

    /// Append a rule; returns its index
    pub fn push_rule(&mut self, rule: Pubkey) -> Result<u32> {
        require!(self.is_locked, VaultError::VaultNotLocked);
        require!(self.rules.len() < MAX_RULES, VaultError::TooManyRules);
        self.rules.push(rule);
        Ok((self.rules.len() - 1) as u32)
    }

    /// Rule the vault is currently waiting on
    pub fn current_rule(&self) -> Result<Pubkey> {
        require!(self.is_locked, VaultError::VaultNotLocked);
        self.rules
            .get(self.current_rule_index as usize)
            .copied()
            .ok_or(error!(VaultError::VaultNotLocked))
    }

    pub fn ensure_current_rule(&self, rule: &Pubkey) -> Result<()> {
        let current = self.current_rule()?;
        require_keys_eq!(current, *rule, VaultError::RuleMismatch);
        Ok(())
    }

    /// Move past the current rule once its condition holds.
    ///
    /// `expected_index` is the index the caller observed; a stale value means
    /// another caller already advanced the vault. Returns the executed index.
    pub fn advance(&mut self, expected_index: u32, condition_met: bool) -> Result<u32> {
        require!(self.is_locked, VaultError::VaultNotLocked);
        require!(
            self.current_rule_index == expected_index,
            VaultError::RuleAlreadyAdvanced
        );
        require!(condition_met, VaultError::ConditionNotMet);

        let executed = self.current_rule_index;
        self.current_rule_index = executed
            .checked_add(1)
            .ok_or(error!(VaultError::MathOverflow))?;

        if self.current_rule_index as usize >= self.rules.len() {
            self.is_locked = false;
            self.completed_successfully = true;
        }
        Ok(executed)
    }

    pub fn profit(&self, balance: u64) -> u64 {
        balance.saturating_sub(self.total_deposited)
    }

    /// Success fee on profit; the rest of the balance goes to the owner.
    ///
    /// The whole balance leaves custody, so the deposit basis resets to zero:
    /// anything reaching custody afterwards is settled as profit.
    pub fn settle_withdrawal(&mut self, balance: u64) -> Result<Settlement> {
        require!(
            self.completed_successfully && !self.is_locked,
            VaultError::VaultNotCompleted
        );

        let profit = self.profit(balance);
        let success_fee = fee_for(profit, self.success_fee_bps)?;
        let to_owner = balance
            .checked_sub(success_fee)
            .ok_or(error!(VaultError::MathOverflow))?;
        self.total_deposited = 0;

        Ok(Settlement {
            profit,
            success_fee,
            to_owner,
        })
    }

    /// Unlock through the failsafe. No success fee is ever charged here.
    pub fn trigger_failsafe(&mut self, now: i64) -> Result<()> {
        require!(self.is_locked, VaultError::VaultNotLocked);
        require!(
            now >= self.failsafe_deadline()?,
            VaultError::FailsafeNotExpired
        );
        self.is_locked = false;
        self.completed_successfully = false;
        Ok(())
    }

    pub fn status(&self) -> Result<VaultStatus> {
        Ok(VaultStatus {
            is_locked: self.is_locked,
            current_rule_index: self.current_rule_index,
            failsafe_deadline: self.failsafe_deadline()?,
            deposit_token: self.deposit_mint,
            completed_successfully: self.completed_successfully,
            rule_count: self.rules.len() as u32,
        })
    }

    pub fn profit_details(&self, balance: u64) -> ProfitDetails {
        ProfitDetails {
            total_deposited: self.total_deposited,
            balance,
            profit: self.profit(balance),
        }
    }
}
