use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Governor-only changes to the shared fee policy
#[derive(Accounts)]
pub struct GovernFactory<'info> {
    /// Security: Must be signer and match factory.governor
    pub governor: Signer<'info>,

    #[account(
        mut,
        seeds = [FACTORY_SEED],
        bump = factory.bump,
        constraint = factory.ensure_governor(governor.key).is_ok() @ VaultError::NotGovernor,
    )]
    pub factory: Account<'info, FactoryConfig>,
}

/// Replace both fees. Each value is validated before either is written.
pub fn update_fees_handler(
    ctx: Context<GovernFactory>,
    deposit_fee_bps: u16,
    success_fee_bps: u16,
) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    factory.set_fees(deposit_fee_bps, success_fee_bps)?;

    emit!(FeesUpdated {
        factory: factory.key(),
        deposit_fee_bps,
        success_fee_bps,
        policy_version: factory.policy_version,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

/// Point new vaults at a different logic module. Existing vaults keep the
/// reference they were created with.
pub fn upgrade_logic_module_handler(
    ctx: Context<GovernFactory>,
    logic_module: Pubkey,
) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    let previous = factory.logic_module;
    factory.set_logic_module(logic_module)?;

    emit!(LogicModuleUpgraded {
        factory: factory.key(),
        previous,
        logic_module,
        policy_version: factory.policy_version,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn update_treasury_handler(ctx: Context<GovernFactory>, treasury: Pubkey) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    let previous = factory.treasury;
    factory.set_treasury(treasury)?;

    emit!(TreasuryUpdated {
        factory: factory.key(),
        previous,
        treasury,
        policy_version: factory.policy_version,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn transfer_governance_handler(ctx: Context<GovernFactory>, governor: Pubkey) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    let previous = factory.governor;
    factory.set_governor(governor)?;

    emit!(GovernanceTransferred {
        factory: factory.key(),
        previous,
        governor,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
