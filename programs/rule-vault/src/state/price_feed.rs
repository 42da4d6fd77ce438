use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Push-style price feed read by price rules
///
/// `value` is fixed-point with `decimals` places (8 by convention).
#[account]
pub struct PriceFeed {
    /// Only signer allowed to publish new values
    pub authority: Pubkey,          // 32 bytes
    pub decimals: u8,               // 1 byte
    pub value: i64,                 // 8 bytes
    /// Unix timestamp of the last publish; 0 if never published
    pub updated_at: i64,            // 8 bytes
    pub description: String,        // 4 + up to 32 bytes
}

/// One observation taken from a feed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceReading {
    pub value: i64,
    pub updated_at: i64,
}

impl PriceReading {
    /// A reading is usable when it is positive, not from the future, and
    /// no older than `MAX_PRICE_AGE_SECONDS`.
    pub fn is_fresh(&self, now: i64) -> bool {
        if self.value <= 0 || self.updated_at <= 0 {
            return false;
        }
        match now.checked_sub(self.updated_at) {
            Some(age) => (0..=MAX_PRICE_AGE_SECONDS).contains(&age),
            None => false,
        }
    }
}

impl PriceFeed {
    pub fn initialize(
        &mut self,
        authority: Pubkey,
        decimals: u8,
        description: String,
        initial_value: i64,
        now: i64,
    ) -> Result<()> {
        require!(
            description.len() <= MAX_FEED_DESCRIPTION_LEN,
            VaultError::DescriptionTooLong
        );
        self.authority = authority;
        self.decimals = decimals;
        self.description = description;
        self.value = initial_value;
        // A zero initial value means "nothing published yet"
        self.updated_at = if initial_value == 0 { 0 } else { now };
        Ok(())
    }

    pub fn ensure_authority(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(self.authority, *signer, VaultError::NotFeedAuthority);
        Ok(())
    }

    pub fn publish(&mut self, value: i64, now: i64) {
        self.value = value;
        self.updated_at = now;
    }

    pub fn latest_value(&self) -> PriceReading {
        PriceReading {
            value: self.value,
            updated_at: self.updated_at,
        }
    }

    pub fn load(info: &AccountInfo) -> Result<PriceFeed> {
        require_keys_eq!(*info.owner, crate::ID, VaultError::InvalidPriceFeed);
        let data = info.try_borrow_data()?;
        PriceFeed::try_deserialize(&mut &data[..]).map_err(|_| error!(VaultError::InvalidPriceFeed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_feed() -> PriceFeed {
        PriceFeed {
            authority: Pubkey::default(),
            decimals: 0,
            value: 0,
            updated_at: 0,
            description: String::new(),
        }
    }

    #[test]
    fn test_initialize_with_price_stamps_time() {
        let mut feed = mock_feed();
        feed.initialize(Pubkey::new_unique(), 8, "AVAX / USD".to_string(), 1_800 * 10i64.pow(8), 1_000)
            .unwrap();
        assert_eq!(feed.latest_value().updated_at, 1_000);
        assert_eq!(feed.decimals, DEFAULT_PRICE_DECIMALS);
    }

    #[test]
    fn test_only_authority_may_publish() {
        let authority = Pubkey::new_unique();
        let mut feed = mock_feed();
        feed.initialize(authority, 8, "BTC / USD".to_string(), 0, 1_000)
            .unwrap();
        assert!(feed.ensure_authority(&authority).is_ok());
        assert!(feed.ensure_authority(&Pubkey::new_unique()).is_err());
    }

    #[test]
    fn test_initialize_without_price_is_unpublished() {
        let mut feed = mock_feed();
        feed.initialize(Pubkey::new_unique(), 8, "SOL / USD".to_string(), 0, 1_000)
            .unwrap();
        assert!(!feed.latest_value().is_fresh(1_000));
    }

    #[test]
    fn test_description_too_long() {
        let mut feed = mock_feed();
        let result = feed.initialize(Pubkey::new_unique(), 8, "x".repeat(33), 1, 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_freshness_window() {
        let reading = PriceReading {
            value: 2_000,
            updated_at: 10_000,
        };
        assert!(reading.is_fresh(10_000));
        assert!(reading.is_fresh(10_000 + MAX_PRICE_AGE_SECONDS));
        assert!(!reading.is_fresh(10_000 + MAX_PRICE_AGE_SECONDS + 1));
        // Published "in the future" relative to the clock
        assert!(!reading.is_fresh(9_999));
    }

    #[test]
    fn test_non_positive_price_is_unusable() {
        let reading = PriceReading {
            value: -5,
            updated_at: 10,
        };
        assert!(!reading.is_fresh(10));
    }
}
