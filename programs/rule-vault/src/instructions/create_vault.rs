use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{constants::*, errors::*, events::*, state::*};

/// Create a vault bound to the factory's current policy and register it
///
/// Security checklist:
/// ✅ PDA per creation index, so vaults never collide
/// ✅ Custody account owned by the vault PDA
/// ✅ Every initial rule supplied and checked as a program-owned Rule
/// ✅ Policy snapshotted, later governance changes do not reach this vault
#[derive(Accounts)]
pub struct CreateVault<'info> {
    /// Pays rent; need not be the owner
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [FACTORY_SEED],
        bump = factory.bump,
    )]
    pub factory: Account<'info, FactoryConfig>,

    /// The single mint this vault will custody
    pub deposit_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        space = VAULT_SIZE,
        seeds = [VAULT_SEED, factory.key().as_ref(), factory.vault_count.to_le_bytes().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// Security: Authority is the vault PDA, only it can move funds out
    #[account(
        init,
        payer = payer,
        seeds = [VAULT_TOKENS_SEED, vault.key().as_ref()],
        bump,
        token::mint = deposit_mint,
        token::authority = vault,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Append-only registry slot
    #[account(
        init,
        payer = payer,
        space = VAULT_RECORD_SIZE,
        seeds = [VAULT_RECORD_SEED, factory.key().as_ref(), factory.vault_count.to_le_bytes().as_ref()],
        bump
    )]
    pub vault_record: Account<'info, VaultRecord>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Remaining accounts: the rule accounts, in the order of `initial_rules`.
pub fn handler(
    ctx: Context<CreateVault>,
    owner: Pubkey,
    failsafe_duration: i64,
    initial_rules: Vec<Pubkey>,
) -> Result<()> {
    // CHECKS: rules present, supplied in order, and real rule accounts
    require!(!initial_rules.is_empty(), VaultError::NoRules);
    require!(initial_rules.len() <= MAX_RULES, VaultError::TooManyRules);
    require!(
        ctx.remaining_accounts.len() == initial_rules.len(),
        VaultError::RuleAccountsMismatch
    );
    for (expected, info) in initial_rules.iter().zip(ctx.remaining_accounts.iter()) {
        require_keys_eq!(*expected, *info.key, VaultError::RuleAccountsMismatch);
        Rule::load(info)?;
    }

    let now = Clock::get()?.unix_timestamp;
    let factory_key = ctx.accounts.factory.key();
    let vault_key = ctx.accounts.vault.key();

    // EFFECTS: reserve registry slot, snapshot policy, initialize vault
    let factory = &mut ctx.accounts.factory;
    let policy = factory.snapshot();
    let index = factory.register_vault()?;

    let rule_count = initial_rules.len() as u32;
    let vault = &mut ctx.accounts.vault;
    vault.initialize(
        VaultInit {
            factory: factory_key,
            index,
            owner,
            deposit_mint: ctx.accounts.deposit_mint.key(),
            token_account: ctx.accounts.vault_token_account.key(),
            failsafe_duration,
            rules: initial_rules,
            created_at: now,
            bump: ctx.bumps.vault,
            token_bump: ctx.bumps.vault_token_account,
        },
        &policy,
    )?;

    let record = &mut ctx.accounts.vault_record;
    record.factory = factory_key;
    record.index = index;
    record.vault = vault_key;
    record.bump = ctx.bumps.vault_record;

    emit!(VaultCreated {
        vault: vault_key,
        index,
        owner,
        deposit_mint: vault.deposit_mint,
        failsafe_duration,
        rule_count,
        policy_version: policy.policy_version,
        timestamp: now,
    });

    msg!("[factory] vault #{} created rules={}", index, rule_count);
    Ok(())
}
