use anchor_lang::prelude::*;

use crate::{constants::*, events::*, state::*};

/// Create a time or balance rule. Anyone may create rules.
#[derive(Accounts)]
pub struct CreateRule<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Fresh keypair account; rules are immutable once written
    #[account(init, payer = creator, space = RULE_SIZE)]
    pub rule: Account<'info, Rule>,

    pub system_program: Program<'info, System>,
}

/// Create a price rule bound to an existing feed
#[derive(Accounts)]
pub struct CreatePriceRule<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(init, payer = creator, space = RULE_SIZE)]
    pub rule: Account<'info, Rule>,

    /// Security: Must be a feed account owned by this program
    pub feed: Account<'info, PriceFeed>,

    pub system_program: Program<'info, System>,
}

fn write_rule(rule: &mut Account<Rule>, creator: Pubkey, condition: RuleCondition) -> Result<()> {
    // CHECKS
    condition.validate()?;

    // EFFECTS
    let now = Clock::get()?.unix_timestamp;
    rule.creator = creator;
    rule.condition = condition;
    rule.created_at = now;

    emit!(RuleCreated {
        rule: rule.key(),
        creator,
        description: rule.describe(),
        timestamp: now,
    });
    Ok(())
}

pub fn time_rule_handler(ctx: Context<CreateRule>, unlock_timestamp: i64) -> Result<()> {
    let creator = ctx.accounts.creator.key();
    write_rule(
        &mut ctx.accounts.rule,
        creator,
        RuleCondition::Time { unlock_timestamp },
    )
}

pub fn balance_rule_handler(
    ctx: Context<CreateRule>,
    mint: Pubkey,
    target_amount: u64,
) -> Result<()> {
    let creator = ctx.accounts.creator.key();
    write_rule(
        &mut ctx.accounts.rule,
        creator,
        RuleCondition::Balance {
            mint,
            target_amount,
        },
    )
}

pub fn price_rule_handler(
    ctx: Context<CreatePriceRule>,
    target_price: i64,
    greater_than: bool,
) -> Result<()> {
    let creator = ctx.accounts.creator.key();
    let feed = ctx.accounts.feed.key();
    write_rule(
        &mut ctx.accounts.rule,
        creator,
        RuleCondition::Price {
            feed,
            target_price,
            greater_than,
        },
    )
}
