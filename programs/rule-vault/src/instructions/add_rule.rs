use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Append a rule to a locked vault
#[derive(Accounts)]
pub struct AddRule<'info> {
    /// Security: Must be signer and match vault.owner
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.factory.as_ref(), vault.index.to_le_bytes().as_ref()],
        bump = vault.bump,
        constraint = vault.ensure_owner(owner.key).is_ok() @ VaultError::Unauthorized,
    )]
    pub vault: Account<'info, Vault>,

    /// Security: Must be a rule account owned by this program
    pub rule: Account<'info, Rule>,
}

pub fn handler(ctx: Context<AddRule>) -> Result<()> {
    let rule = ctx.accounts.rule.key();
    let vault = &mut ctx.accounts.vault;

    let index = vault.push_rule(rule)?;

    emit!(RuleAdded {
        vault: vault.key(),
        rule,
        index,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
