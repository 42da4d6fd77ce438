// Constants for the Rule Vault program

/// Seed for the singleton factory configuration PDA
pub const FACTORY_SEED: &[u8] = b"factory";

/// Seed for vault state PDAs (factory, creation index)
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the token account custodying a vault's deposits
pub const VAULT_TOKENS_SEED: &[u8] = b"vault_tokens";

/// Seed for registry records (factory, creation index)
pub const VAULT_RECORD_SEED: &[u8] = b"vault_record";

/// 10_000 bps = 100%
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Deposit fee cap (1%)
pub const MAX_DEPOSIT_FEE_BPS: u16 = 100;

/// Success fee cap (10%)
pub const MAX_SUCCESS_FEE_BPS: u16 = 1_000;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Failsafe bounds: 1 day ..= 100 years
pub const MIN_FAILSAFE_DURATION: i64 = SECONDS_PER_DAY;
pub const MAX_FAILSAFE_DURATION: i64 = 100 * 365 * SECONDS_PER_DAY;

/// Maximum number of rules a single vault can chain
pub const MAX_RULES: usize = 16;

/// Registry entries returned by one `get_all_vaults` call.
/// Return data is capped at 1024 bytes: 4 (vec len) + 31 * 32 = 996.
pub const MAX_VAULTS_PER_PAGE: usize = 31;

/// Price readings older than this are treated as unavailable
pub const MAX_PRICE_AGE_SECONDS: i64 = SECONDS_PER_DAY;

/// Fixed-point scale used by reference price feeds
pub const DEFAULT_PRICE_DECIMALS: u8 = 8;

pub const MAX_FEED_DESCRIPTION_LEN: usize = 32;

/// Space for FactoryConfig (8 discriminator + 32 governor + 32 treasury +
/// 32 logic_module + 2 deposit_fee_bps + 2 success_fee_bps + 8 vault_count +
/// 8 policy_version + 1 bump + 64 padding)
pub const FACTORY_CONFIG_SIZE: usize = 8 + 32 + 32 + 32 + 2 + 2 + 8 + 8 + 1 + 64;

/// Space for Vault (8 discriminator + 32 factory + 8 index + 32 owner +
/// 32 deposit_mint + 32 token_account + 32 treasury + 32 logic_module +
/// 8 policy_version + 2 deposit_fee_bps + 2 success_fee_bps +
/// 4 + 16 * 32 rules + 4 current_rule_index + 1 is_locked +
/// 1 completed_successfully + 8 total_deposited + 8 created_at +
/// 8 failsafe_duration + 1 bump + 1 token_bump + 64 padding)
pub const VAULT_SIZE: usize = 8
    + 32
    + 8
    + 32
    + 32
    + 32
    + 32
    + 32
    + 8
    + 2
    + 2
    + (4 + MAX_RULES * 32)
    + 4
    + 1
    + 1
    + 8
    + 8
    + 8
    + 1
    + 1
    + 64;

/// Space for VaultRecord (8 discriminator + 32 factory + 8 index + 32 vault + 1 bump)
pub const VAULT_RECORD_SIZE: usize = 8 + 32 + 8 + 32 + 1;

/// Space for Rule (8 discriminator + 32 creator + 1 variant tag +
/// 41 largest variant (price: 32 feed + 8 target + 1 direction) + 8 created_at)
pub const RULE_SIZE: usize = 8 + 32 + 1 + 41 + 8;

/// Space for PriceFeed (8 discriminator + 32 authority + 1 decimals +
/// 8 value + 8 updated_at + 4 + 32 description)
pub const PRICE_FEED_SIZE: usize = 8 + 32 + 1 + 8 + 8 + 4 + MAX_FEED_DESCRIPTION_LEN;
