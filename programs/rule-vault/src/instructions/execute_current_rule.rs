use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Permissionless keeper call: advance past the current rule once it holds
///
/// No funds move here, so no owner check. The runtime write-locks the vault,
/// and `expected_index` makes a losing concurrent caller fail with
/// `RuleAlreadyAdvanced` instead of advancing twice.
#[derive(Accounts)]
pub struct ExecuteCurrentRule<'info> {
    /// Any caller
    pub executor: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.factory.as_ref(), vault.index.to_le_bytes().as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// Must be `vault.rules[vault.current_rule_index]`
    pub rule: Account<'info, Rule>,
}

pub fn handler(ctx: Context<ExecuteCurrentRule>, expected_index: u32) -> Result<()> {
    let rule_key = ctx.accounts.rule.key();
    let vault_key = ctx.accounts.vault.key();
    let vault = &mut ctx.accounts.vault;

    // CHECKS: still locked, caller saw the live cursor, right rule supplied
    require!(vault.is_locked, VaultError::VaultNotLocked);
    require!(
        vault.current_rule_index == expected_index,
        VaultError::RuleAlreadyAdvanced
    );
    vault.ensure_current_rule(&rule_key)?;

    let now = Clock::get()?.unix_timestamp;
    let rule = &ctx.accounts.rule;
    let inputs = rule.collect_inputs(&vault_key, now, ctx.remaining_accounts);
    let condition_met = rule.evaluate(&inputs);

    // EFFECTS
    let executed = vault.advance(expected_index, condition_met)?;

    emit!(RuleExecuted {
        vault: vault_key,
        index: executed,
        rule: rule_key,
        success: true,
        executor: ctx.accounts.executor.key(),
        timestamp: now,
    });

    if vault.completed_successfully {
        emit!(VaultCompleted {
            vault: vault_key,
            rule_count: vault.rules.len() as u32,
            timestamp: now,
        });
        msg!("[vault] all {} rules executed, unlocked", vault.rules.len());
    } else {
        msg!("[vault] rule {} executed", executed);
    }
    Ok(())
}
