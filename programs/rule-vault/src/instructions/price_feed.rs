use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

#[derive(Accounts)]
pub struct InitializePriceFeed<'info> {
    /// Becomes the feed authority
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(init, payer = authority, space = PRICE_FEED_SIZE)]
    pub feed: Account<'info, PriceFeed>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdatePriceFeed<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        constraint = feed.ensure_authority(authority.key).is_ok() @ VaultError::NotFeedAuthority,
    )]
    pub feed: Account<'info, PriceFeed>,
}

pub fn initialize_handler(
    ctx: Context<InitializePriceFeed>,
    decimals: u8,
    description: String,
    initial_value: i64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let feed = &mut ctx.accounts.feed;
    feed.initialize(
        ctx.accounts.authority.key(),
        decimals,
        description,
        initial_value,
        now,
    )?;

    emit!(PriceFeedUpdated {
        feed: feed.key(),
        value: initial_value,
        timestamp: now,
    });
    Ok(())
}

pub fn update_handler(ctx: Context<UpdatePriceFeed>, value: i64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let feed = &mut ctx.accounts.feed;
    feed.publish(value, now);

    emit!(PriceFeedUpdated {
        feed: feed.key(),
        value,
        timestamp: now,
    });
    Ok(())
}
