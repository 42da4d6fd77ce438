use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Escape hatch: once the failsafe deadline passes, the owner takes the
/// whole balance with no success fee and the vault unlocks for good.
#[derive(Accounts)]
pub struct WithdrawViaFailsafe<'info> {
    /// Security: Must be signer and match vault.owner
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.factory.as_ref(), vault.index.to_le_bytes().as_ref()],
        bump = vault.bump,
        constraint = vault.ensure_owner(owner.key).is_ok() @ VaultError::Unauthorized,
    )]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.deposit_mint @ VaultError::InvalidMint)]
    pub deposit_mint: Account<'info, Mint>,

    #[account(
        mut,
        address = vault.token_account @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = deposit_mint,
        associated_token::authority = owner,
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<WithdrawViaFailsafe>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let amount = ctx.accounts.vault_token_account.amount;

    // CHECKS + EFFECTS: locked, deadline reached; unlock without completion
    let vault = &mut ctx.accounts.vault;
    vault.trigger_failsafe(now)?;

    // INTERACTIONS
    if amount > 0 {
        let factory_key = vault.factory;
        let index_bytes = vault.index.to_le_bytes();
        let vault_seeds: &[&[u8]] = &[
            VAULT_SEED,
            factory_key.as_ref(),
            index_bytes.as_ref(),
            &[vault.bump],
        ];
        let signer_seeds = &[vault_seeds];

        let payout_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_token_account.to_account_info(),
                to: ctx.accounts.owner_token_account.to_account_info(),
                authority: vault.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(payout_ctx, amount)?;
    }

    emit!(FailsafeWithdrawn {
        vault: vault.key(),
        owner: ctx.accounts.owner.key(),
        amount,
        timestamp: now,
    });

    msg!("[vault] failsafe withdraw amount={}", amount);
    Ok(())
}
