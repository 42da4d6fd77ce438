use anchor_lang::prelude::*;

use crate::{constants::*, state::*};

/// Evaluate the vault's current rule without changing any state
#[derive(Accounts)]
pub struct CheckCurrentRule<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.factory.as_ref(), vault.index.to_le_bytes().as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// Must be `vault.rules[vault.current_rule_index]`
    pub rule: Account<'info, Rule>,
}

/// Remaining accounts: whatever the rule reads (price feed, or a token
/// account of the rule's mint owned by the vault).
pub fn handler(ctx: Context<CheckCurrentRule>) -> Result<bool> {
    let vault = &ctx.accounts.vault;
    let rule = &ctx.accounts.rule;
    vault.ensure_current_rule(&rule.key())?;

    let now = Clock::get()?.unix_timestamp;
    let inputs = rule.collect_inputs(&vault.key(), now, ctx.remaining_accounts);
    Ok(rule.evaluate(&inputs))
}
