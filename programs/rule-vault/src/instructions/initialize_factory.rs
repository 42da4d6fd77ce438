use anchor_lang::prelude::*;

use crate::{constants::*, events::*, state::*};

/// Create the singleton factory configuration
#[derive(Accounts)]
pub struct InitializeFactory<'info> {
    /// Becomes the factory governor
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub governor: Signer<'info>,

    /// Factory config PDA
    /// Security: Singleton seeds, init fails if it already exists
    #[account(
        init,
        payer = governor,
        space = FACTORY_CONFIG_SIZE,
        seeds = [FACTORY_SEED],
        bump
    )]
    pub factory: Account<'info, FactoryConfig>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeFactory>,
    logic_module: Pubkey,
    treasury: Pubkey,
    deposit_fee_bps: u16,
    success_fee_bps: u16,
) -> Result<()> {
    let factory = &mut ctx.accounts.factory;

    factory.initialize(
        ctx.accounts.governor.key(),
        logic_module,
        treasury,
        deposit_fee_bps,
        success_fee_bps,
        ctx.bumps.factory,
    )?;

    emit!(FactoryInitialized {
        factory: factory.key(),
        governor: factory.governor,
        treasury,
        logic_module,
        deposit_fee_bps,
        success_fee_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "[factory] initialized deposit_fee_bps={} success_fee_bps={}",
        deposit_fee_bps,
        success_fee_bps
    );
    Ok(())
}
