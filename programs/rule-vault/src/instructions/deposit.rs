use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Deposit assets into a vault. Open to any caller.
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Depositor must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault PDA validated with seeds
/// ✅ 6. MATH SAFETY: Fee computed with checked u128 math
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Mint and owner validated
/// ✅ 8. BUSINESS LOGIC: Checks-effects-interactions pattern
/// ✅ 10. EVENTS: Emits Deposited event
#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.factory.as_ref(), vault.index.to_le_bytes().as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.deposit_mint @ VaultError::InvalidMint)]
    pub deposit_mint: Account<'info, Mint>,

    /// Security: Must be the vault's own custody account
    #[account(
        mut,
        address = vault.token_account @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = depositor_token_account.mint == vault.deposit_mint @ VaultError::InvalidMint,
        constraint = depositor_token_account.owner == depositor.key() @ VaultError::InvalidOwner,
    )]
    pub depositor_token_account: Account<'info, TokenAccount>,

    /// CHECK: Fee recipient wallet, pinned to the vault's policy snapshot
    #[account(address = vault.treasury @ VaultError::InvalidTreasury)]
    pub treasury: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = deposit_mint,
        associated_token::authority = treasury,
    )]
    pub treasury_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let vault = &mut ctx.accounts.vault;

    // CHECKS: amount > 0, vault still locked; fee split
    let split = vault.split_deposit(amount)?;

    // EFFECTS: Update vault state BEFORE external calls
    vault.record_deposit(split.net)?;

    // INTERACTIONS
    if split.fee > 0 {
        let fee_ctx = CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.depositor_token_account.to_account_info(),
                to: ctx.accounts.treasury_token_account.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
            },
        );
        token::transfer(fee_ctx, split.fee)?;
    }

    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.depositor_token_account.to_account_info(),
            to: ctx.accounts.vault_token_account.to_account_info(),
            authority: ctx.accounts.depositor.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, split.net)?;

    emit!(Deposited {
        vault: vault.key(),
        depositor: ctx.accounts.depositor.key(),
        net_amount: split.net,
        fee: split.fee,
        total_deposited: vault.total_deposited,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "[vault] deposit net={} fee={} total_deposited={}",
        split.net,
        split.fee,
        vault.total_deposited
    );
    Ok(())
}
