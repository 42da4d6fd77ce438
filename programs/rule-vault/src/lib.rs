// Rule Vault - rule-gated, fee-bearing escrow vaults on Solana
// Security: Owner-gated fund movement, permissionless rule progression, time-based failsafe
// Architecture: Factory + append-only registry, policy snapshotted into every vault

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;
use state::{ProfitDetails, VaultStatus};

declare_id!("7Nw1aE1on27RspZn1m5zPerpiVsUbUM1xT4fc9NVuUuM");

#[program]
pub mod rule_vault {
    use super::*;

    // ── Factory governance ──────────────────────────────────────

    /// Create the singleton factory; the signer becomes governor
    ///
    /// Security considerations:
    /// - Fee caps validated (deposit ≤ 1%, success ≤ 10%)
    /// - Treasury and logic module must not be the default pubkey
    pub fn initialize_factory(
        ctx: Context<InitializeFactory>,
        logic_module: Pubkey,
        treasury: Pubkey,
        deposit_fee_bps: u16,
        success_fee_bps: u16,
    ) -> Result<()> {
        instructions::initialize_factory::handler(
            ctx,
            logic_module,
            treasury,
            deposit_fee_bps,
            success_fee_bps,
        )
    }

    /// Replace both fees. Governor-only; applies to vaults created afterwards.
    pub fn update_fees(
        ctx: Context<GovernFactory>,
        deposit_fee_bps: u16,
        success_fee_bps: u16,
    ) -> Result<()> {
        instructions::governance::update_fees_handler(ctx, deposit_fee_bps, success_fee_bps)
    }

    /// Swap the logic module reference bound into new vaults. Governor-only.
    pub fn upgrade_logic_module(ctx: Context<GovernFactory>, logic_module: Pubkey) -> Result<()> {
        instructions::governance::upgrade_logic_module_handler(ctx, logic_module)
    }

    pub fn update_treasury(ctx: Context<GovernFactory>, treasury: Pubkey) -> Result<()> {
        instructions::governance::update_treasury_handler(ctx, treasury)
    }

    pub fn transfer_governance(ctx: Context<GovernFactory>, governor: Pubkey) -> Result<()> {
        instructions::governance::transfer_governance_handler(ctx, governor)
    }

    // ── Rules and feeds ─────────────────────────────────────────

    pub fn create_time_rule(ctx: Context<CreateRule>, unlock_timestamp: i64) -> Result<()> {
        instructions::create_rule::time_rule_handler(ctx, unlock_timestamp)
    }

    /// Price rule over `feed`, with `target_price` in the feed's fixed-point scale
    pub fn create_price_rule(
        ctx: Context<CreatePriceRule>,
        target_price: i64,
        greater_than: bool,
    ) -> Result<()> {
        instructions::create_rule::price_rule_handler(ctx, target_price, greater_than)
    }

    /// Balance rule: vault must hold at least `target_amount` of `mint`
    pub fn create_balance_rule(
        ctx: Context<CreateRule>,
        mint: Pubkey,
        target_amount: u64,
    ) -> Result<()> {
        instructions::create_rule::balance_rule_handler(ctx, mint, target_amount)
    }

    pub fn initialize_price_feed(
        ctx: Context<InitializePriceFeed>,
        decimals: u8,
        description: String,
        initial_value: i64,
    ) -> Result<()> {
        instructions::price_feed::initialize_handler(ctx, decimals, description, initial_value)
    }

    pub fn update_price_feed(ctx: Context<UpdatePriceFeed>, value: i64) -> Result<()> {
        instructions::price_feed::update_handler(ctx, value)
    }

    // ── Vault lifecycle ─────────────────────────────────────────

    /// Create and register a vault for `owner`
    ///
    /// Security considerations:
    /// - Failsafe duration bounded to 1 day ..= 100 years
    /// - At least one rule; each supplied as a remaining account and validated
    /// - Fee policy and logic module snapshotted at creation
    pub fn create_vault(
        ctx: Context<CreateVault>,
        owner: Pubkey,
        failsafe_duration: i64,
        initial_rules: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::create_vault::handler(ctx, owner, failsafe_duration, initial_rules)
    }

    /// Deposit into a locked vault. Open to any caller.
    ///
    /// Security considerations:
    /// - Deposit fee sent to the snapshotted treasury
    /// - Checks-effects-interactions ordering
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Append a rule. Owner-only, while locked.
    pub fn add_rule(ctx: Context<AddRule>) -> Result<()> {
        instructions::add_rule::handler(ctx)
    }

    /// Evaluate the current rule. Read-only, open to any caller.
    pub fn check_current_rule(ctx: Context<CheckCurrentRule>) -> Result<bool> {
        instructions::check_current_rule::handler(ctx)
    }

    /// Advance past the current rule once its condition holds
    ///
    /// Security considerations:
    /// - Permissionless: no funds move
    /// - `expected_index` rejects stale callers so the cursor never double-advances
    pub fn execute_current_rule(
        ctx: Context<ExecuteCurrentRule>,
        expected_index: u32,
    ) -> Result<()> {
        instructions::execute_current_rule::handler(ctx, expected_index)
    }

    /// Withdraw after all rules executed; success fee charged on profit only
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handler(ctx)
    }

    /// Withdraw everything after the failsafe deadline, with no success fee
    pub fn withdraw_via_failsafe(ctx: Context<WithdrawViaFailsafe>) -> Result<()> {
        instructions::withdraw_via_failsafe::handler(ctx)
    }

    // ── Read surface ────────────────────────────────────────────

    pub fn get_vault_count(ctx: Context<ReadFactory>) -> Result<u64> {
        instructions::views::get_vault_count_handler(ctx)
    }

    pub fn get_vault(ctx: Context<ReadVaultRecord>, index: u64) -> Result<Pubkey> {
        instructions::views::get_vault_handler(ctx, index)
    }

    /// Page through the registry; records passed as remaining accounts
    pub fn get_all_vaults(ctx: Context<ReadFactory>, start_index: u64) -> Result<Vec<Pubkey>> {
        instructions::views::get_all_vaults_handler(ctx, start_index)
    }

    pub fn get_status(ctx: Context<ReadVault>) -> Result<VaultStatus> {
        instructions::views::get_status_handler(ctx)
    }

    pub fn get_rules(ctx: Context<ReadVault>) -> Result<Vec<Pubkey>> {
        instructions::views::get_rules_handler(ctx)
    }

    pub fn get_balance(ctx: Context<ReadVault>) -> Result<u64> {
        instructions::views::get_balance_handler(ctx)
    }

    pub fn get_profit_details(ctx: Context<ReadVault>) -> Result<ProfitDetails> {
        instructions::views::get_profit_details_handler(ctx)
    }

    pub fn describe_rule(ctx: Context<ReadRule>) -> Result<String> {
        instructions::views::describe_rule_handler(ctx)
    }
}
