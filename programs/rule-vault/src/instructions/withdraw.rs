use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Withdraw everything after successful completion, paying the success fee
#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    /// CHECK: Fee recipient wallet, pinned to the vault's policy snapshot
    #[account(address = vault.treasury @ VaultError::InvalidTreasury)]
    pub treasury: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = deposit_mint,
        associated_token::authority = treasury,
    )]
    pub treasury_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Withdraw>) -> Result<()> {
    let balance = ctx.accounts.vault_token_account.amount;

    // CHECKS + EFFECTS: completed; fee from the live custody balance, basis reset
    let vault = &mut ctx.accounts.vault;
    let settlement = vault.settle_withdrawal(balance)?;

    // INTERACTIONS: vault PDA signs both transfers
    let factory_key = vault.factory;
    let index_bytes = vault.index.to_le_bytes();
    let vault_seeds: &[&[u8]] = &[
        VAULT_SEED,
        factory_key.as_ref(),
        index_bytes.as_ref(),
        &[vault.bump],
    ];
    let signer_seeds = &[vault_seeds];

    if settlement.success_fee > 0 {
        let fee_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_token_account.to_account_info(),
                to: ctx.accounts.treasury_token_account.to_account_info(),
                authority: vault.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(fee_ctx, settlement.success_fee)?;
    }

    if settlement.to_owner > 0 {
        let payout_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_token_account.to_account_info(),
                to: ctx.accounts.owner_token_account.to_account_info(),
                authority: vault.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(payout_ctx, settlement.to_owner)?;
    }

    emit!(Withdrawn {
        vault: vault.key(),
        owner: ctx.accounts.owner.key(),
        amount: settlement.to_owner,
        profit: settlement.profit,
        success_fee: settlement.success_fee,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "[vault] withdraw amount={} profit={} success_fee={}",
        settlement.to_owner,
        settlement.profit,
        settlement.success_fee
    );
    Ok(())
}
