use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::{constants::*, errors::*, state::*};

// Read-only instructions. Results are returned through Anchor return data
// and can be fetched with a simulated transaction.

#[derive(Accounts)]
pub struct ReadFactory<'info> {
    #[account(seeds = [FACTORY_SEED], bump = factory.bump)]
    pub factory: Account<'info, FactoryConfig>,
}

#[derive(Accounts)]
#[instruction(index: u64)]
pub struct ReadVaultRecord<'info> {
    #[account(seeds = [FACTORY_SEED], bump = factory.bump)]
    pub factory: Account<'info, FactoryConfig>,

    #[account(
        seeds = [VAULT_RECORD_SEED, factory.key().as_ref(), index.to_le_bytes().as_ref()],
        bump = vault_record.bump,
    )]
    pub vault_record: Account<'info, VaultRecord>,
}

#[derive(Accounts)]
pub struct ReadVault<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.factory.as_ref(), vault.index.to_le_bytes().as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.token_account @ VaultError::InvalidOwner)]
    pub vault_token_account: Account<'info, TokenAccount>,
}

#[derive(Accounts)]
pub struct ReadRule<'info> {
    pub rule: Account<'info, Rule>,
}

pub fn get_vault_count_handler(ctx: Context<ReadFactory>) -> Result<u64> {
    Ok(ctx.accounts.factory.vault_count)
}

pub fn get_vault_handler(ctx: Context<ReadVaultRecord>, _index: u64) -> Result<Pubkey> {
    Ok(ctx.accounts.vault_record.vault)
}

/// Remaining accounts: consecutive registry records starting at `start_index`.
pub fn get_all_vaults_handler(ctx: Context<ReadFactory>, start_index: u64) -> Result<Vec<Pubkey>> {
    let factory = &ctx.accounts.factory;
    let records = ctx.remaining_accounts;
    require!(records.len() <= MAX_VAULTS_PER_PAGE, VaultError::PageTooLarge);

    let end = start_index
        .checked_add(records.len() as u64)
        .ok_or(error!(VaultError::MathOverflow))?;
    require!(end <= factory.vault_count, VaultError::InvalidRecord);

    let factory_key = factory.key();
    let mut vaults = Vec::with_capacity(records.len());
    for (index, info) in (start_index..end).zip(records.iter()) {
        let record = VaultRecord::load(info)?;
        record.ensure_slot(&factory_key, index)?;
        vaults.push(record.vault);
    }
    Ok(vaults)
}

pub fn get_status_handler(ctx: Context<ReadVault>) -> Result<VaultStatus> {
    ctx.accounts.vault.status()
}

pub fn get_rules_handler(ctx: Context<ReadVault>) -> Result<Vec<Pubkey>> {
    Ok(ctx.accounts.vault.rules.clone())
}

pub fn get_balance_handler(ctx: Context<ReadVault>) -> Result<u64> {
    Ok(ctx.accounts.vault_token_account.amount)
}

pub fn get_profit_details_handler(ctx: Context<ReadVault>) -> Result<ProfitDetails> {
    let balance = ctx.accounts.vault_token_account.amount;
    Ok(ctx.accounts.vault.profit_details(balance))
}

pub fn describe_rule_handler(ctx: Context<ReadRule>) -> Result<String> {
    Ok(ctx.accounts.rule.describe())
}
