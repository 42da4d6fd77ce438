use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount};

use crate::{errors::VaultError, state::PriceFeed, state::PriceReading};

/// A stateless condition gating vault progression
///
/// Rules are created once, never mutated, and may be shared by any number
/// of vaults. Evaluation has no side effects.
#[account]
pub struct Rule {
    pub creator: Pubkey,            // 32 bytes
    pub condition: RuleCondition,   // 1 + 41 bytes
    pub created_at: i64,            // 8 bytes
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RuleCondition {
    /// True once the clock reaches `unlock_timestamp`
    Time { unlock_timestamp: i64 },

    /// True while the feed's latest fresh value is strictly above (or below)
    /// `target_price`, expressed in the feed's fixed-point scale
    Price {
        feed: Pubkey,
        target_price: i64,
        greater_than: bool,
    },

    /// True once the vault holds at least `target_amount` of `mint`.
    /// `mint` need not be the vault's deposit mint.
    Balance { mint: Pubkey, target_amount: u64 },
}

/// Observations a rule is evaluated against, gathered for one vault
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuleInputs {
    pub now: i64,
    pub price: Option<PriceReading>,
    pub balance: Option<u64>,
}

impl RuleCondition {
    pub fn validate(&self) -> Result<()> {
        match self {
            RuleCondition::Time { .. } => Ok(()),
            RuleCondition::Price { target_price, .. } => {
                require!(*target_price > 0, VaultError::InvalidTarget);
                Ok(())
            }
            RuleCondition::Balance { mint, target_amount } => {
                require_keys_neq!(*mint, Pubkey::default(), VaultError::InvalidIdentity);
                require!(*target_amount > 0, VaultError::InvalidTarget);
                Ok(())
            }
        }
    }
}

impl Rule {
    pub fn evaluate(&self, inputs: &RuleInputs) -> bool {
        match &self.condition {
            RuleCondition::Time { unlock_timestamp } => inputs.now >= *unlock_timestamp,
            RuleCondition::Price {
                target_price,
                greater_than,
                ..
            } => match inputs.price {
                Some(reading) if reading.is_fresh(inputs.now) => {
                    if *greater_than {
                        reading.value > *target_price
                    } else {
                        reading.value < *target_price
                    }
                }
                _ => false,
            },
            RuleCondition::Balance { target_amount, .. } => {
                inputs.balance.unwrap_or(0) >= *target_amount
            }
        }
    }

    pub fn describe(&self) -> String {
        match &self.condition {
            RuleCondition::Time { unlock_timestamp } => {
                format!("TimeLock: Unlocks at timestamp {}", unlock_timestamp)
            }
            RuleCondition::Price {
                feed,
                target_price,
                greater_than,
            } => format!(
                "Price: Current {} {} (feed {})",
                if *greater_than { ">" } else { "<" },
                target_price,
                feed
            ),
            RuleCondition::Balance {
                mint,
                target_amount,
            } => format!("Balance: {} holdings >= {}", mint, target_amount),
        }
    }

    /// Gather inputs for evaluating this rule against `vault`.
    ///
    /// Never fails: a missing, foreign or malformed account simply leaves the
    /// corresponding reading empty, which evaluates to false.
    pub fn collect_inputs(&self, vault: &Pubkey, now: i64, accounts: &[AccountInfo]) -> RuleInputs {
        let mut inputs = RuleInputs {
            now,
            ..RuleInputs::default()
        };

        match &self.condition {
            RuleCondition::Time { .. } => {}
            RuleCondition::Price { feed, .. } => {
                inputs.price = accounts
                    .iter()
                    .find(|info| info.key == feed)
                    .and_then(|info| PriceFeed::load(info).ok())
                    .map(|feed| feed.latest_value());
            }
            RuleCondition::Balance { mint, .. } => {
                inputs.balance = vault_holdings(vault, mint, accounts);
            }
        }

        inputs
    }

    pub fn load(info: &AccountInfo) -> Result<Rule> {
        require_keys_eq!(*info.owner, crate::ID, VaultError::InvalidRule);
        let data = info.try_borrow_data()?;
        Rule::try_deserialize(&mut &data[..]).map_err(|_| error!(VaultError::InvalidRule))
    }
}

/// Total of `mint` held by the vault across the supplied token accounts.
///
/// Each account counts once however often it is passed. `None` when no
/// vault-owned account of `mint` was supplied.
fn vault_holdings(vault: &Pubkey, mint: &Pubkey, accounts: &[AccountInfo]) -> Option<u64> {
    let mut counted: Vec<Pubkey> = Vec::new();
    let mut total: u64 = 0;

    for info in accounts {
        if counted.contains(info.key) {
            continue;
        }
        let account = match load_token_account(info) {
            Ok(account) => account,
            Err(_) => continue,
        };
        if account.mint != *mint || account.owner != *vault {
            continue;
        }
        counted.push(*info.key);
        total = total.saturating_add(account.amount);
    }

    if counted.is_empty() {
        None
    } else {
        Some(total)
    }
}

fn load_token_account(info: &AccountInfo) -> Result<TokenAccount> {
    require_keys_eq!(*info.owner, token::ID, VaultError::InvalidOwner);
    let data = info.try_borrow_data()?;
    TokenAccount::try_deserialize(&mut &data[..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::program_pack::Pack;
    use anchor_spl::token::spl_token::state::{Account as SplAccount, AccountState};

    /// Backing storage for an SPL token account handed in as a remaining account
    struct TokenFixture {
        key: Pubkey,
        lamports: u64,
        data: Vec<u8>,
    }

    impl TokenFixture {
        fn new(mint: Pubkey, owner: Pubkey, amount: u64) -> Self {
            let mut data = vec![0u8; SplAccount::LEN];
            let account = SplAccount {
                mint,
                owner,
                amount,
                state: AccountState::Initialized,
                ..SplAccount::default()
            };
            SplAccount::pack(account, &mut data).unwrap();
            TokenFixture {
                key: Pubkey::new_unique(),
                lamports: 1_000_000,
                data,
            }
        }

        fn info(&mut self) -> AccountInfo<'_> {
            AccountInfo::new(
                &self.key,
                false,
                false,
                &mut self.lamports,
                &mut self.data,
                &token::ID,
                false,
                0,
            )
        }
    }

    fn rule(condition: RuleCondition) -> Rule {
        Rule {
            creator: Pubkey::new_unique(),
            condition,
            created_at: 0,
        }
    }

    fn at(now: i64) -> RuleInputs {
        RuleInputs {
            now,
            ..RuleInputs::default()
        }
    }

    #[test]
    fn test_time_rule_boundary() {
        let time_rule = rule(RuleCondition::Time {
            unlock_timestamp: 3_600,
        });
        assert!(!time_rule.evaluate(&at(3_599)));
        assert!(time_rule.evaluate(&at(3_600)));
        assert!(time_rule.evaluate(&at(10_000)));
    }

    #[test]
    fn test_price_rule_greater_than() {
        let price_rule = rule(RuleCondition::Price {
            feed: Pubkey::new_unique(),
            target_price: 2_000 * 10i64.pow(8),
            greater_than: true,
        });
        let mut inputs = at(100);

        inputs.price = Some(PriceReading {
            value: 1_800 * 10i64.pow(8),
            updated_at: 100,
        });
        assert!(!price_rule.evaluate(&inputs));

        // Equal is not greater
        inputs.price = Some(PriceReading {
            value: 2_000 * 10i64.pow(8),
            updated_at: 100,
        });
        assert!(!price_rule.evaluate(&inputs));

        inputs.price = Some(PriceReading {
            value: 2_100 * 10i64.pow(8),
            updated_at: 100,
        });
        assert!(price_rule.evaluate(&inputs));
    }

    #[test]
    fn test_price_rule_less_than() {
        let price_rule = rule(RuleCondition::Price {
            feed: Pubkey::new_unique(),
            target_price: 50,
            greater_than: false,
        });
        let mut inputs = at(100);
        inputs.price = Some(PriceReading {
            value: 49,
            updated_at: 90,
        });
        assert!(price_rule.evaluate(&inputs));
        inputs.price = Some(PriceReading {
            value: 51,
            updated_at: 90,
        });
        assert!(!price_rule.evaluate(&inputs));
    }

    #[test]
    fn test_price_rule_missing_or_stale_feed_is_false() {
        let price_rule = rule(RuleCondition::Price {
            feed: Pubkey::new_unique(),
            target_price: 1,
            greater_than: true,
        });
        assert!(!price_rule.evaluate(&at(100)));

        let mut inputs = at(1_000_000);
        inputs.price = Some(PriceReading {
            value: 500,
            updated_at: 1,
        });
        assert!(!price_rule.evaluate(&inputs));
    }

    #[test]
    fn test_balance_rule() {
        let balance_rule = rule(RuleCondition::Balance {
            mint: Pubkey::new_unique(),
            target_amount: 1_000_000_000,
        });
        let mut inputs = at(0);
        assert!(!balance_rule.evaluate(&inputs));

        inputs.balance = Some(999_999_999);
        assert!(!balance_rule.evaluate(&inputs));

        inputs.balance = Some(1_000_000_000);
        assert!(balance_rule.evaluate(&inputs));

        inputs.balance = Some(1_100_000_000);
        assert!(balance_rule.evaluate(&inputs));
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let time_rule = rule(RuleCondition::Time {
            unlock_timestamp: 5,
        });
        let inputs = at(10);
        let first = time_rule.evaluate(&inputs);
        for _ in 0..10 {
            assert_eq!(time_rule.evaluate(&inputs), first);
        }
    }

    #[test]
    fn test_describe() {
        let time_rule = rule(RuleCondition::Time {
            unlock_timestamp: 1_700_000_000,
        });
        assert_eq!(
            time_rule.describe(),
            "TimeLock: Unlocks at timestamp 1700000000"
        );

        let price_rule = rule(RuleCondition::Price {
            feed: Pubkey::new_unique(),
            target_price: 300_000_000_000,
            greater_than: true,
        });
        assert!(price_rule
            .describe()
            .starts_with("Price: Current > 300000000000"));
    }

    #[test]
    fn test_condition_validation() {
        assert!(RuleCondition::Time {
            unlock_timestamp: 0
        }
        .validate()
        .is_ok());
        assert!(RuleCondition::Price {
            feed: Pubkey::new_unique(),
            target_price: 0,
            greater_than: true
        }
        .validate()
        .is_err());
        assert!(RuleCondition::Balance {
            mint: Pubkey::default(),
            target_amount: 5
        }
        .validate()
        .is_err());
        assert!(RuleCondition::Balance {
            mint: Pubkey::new_unique(),
            target_amount: 0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_collect_inputs_without_accounts() {
        let vault = Pubkey::new_unique();
        let balance_rule = rule(RuleCondition::Balance {
            mint: Pubkey::new_unique(),
            target_amount: 1,
        });
        let inputs = balance_rule.collect_inputs(&vault, 42, &[]);
        assert_eq!(inputs.now, 42);
        assert_eq!(inputs.balance, None);
        assert!(!balance_rule.evaluate(&inputs));
    }

    #[test]
    fn test_balance_rule_sums_vault_accounts() {
        let vault = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let balance_rule = rule(RuleCondition::Balance {
            mint,
            target_amount: 100,
        });

        let mut first = TokenFixture::new(mint, vault, 60);
        let mut second = TokenFixture::new(mint, vault, 60);
        let accounts = [first.info(), second.info()];

        let inputs = balance_rule.collect_inputs(&vault, 0, &accounts);
        assert_eq!(inputs.balance, Some(120));
        assert!(balance_rule.evaluate(&inputs));

        // Order does not matter
        let reversed = [accounts[1].clone(), accounts[0].clone()];
        let inputs = balance_rule.collect_inputs(&vault, 0, &reversed);
        assert_eq!(inputs.balance, Some(120));
    }

    #[test]
    fn test_balance_rule_counts_each_account_once() {
        let vault = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let balance_rule = rule(RuleCondition::Balance {
            mint,
            target_amount: 100,
        });

        let mut holding = TokenFixture::new(mint, vault, 60);
        let info = holding.info();
        let accounts = [info.clone(), info.clone(), info];

        let inputs = balance_rule.collect_inputs(&vault, 0, &accounts);
        assert_eq!(inputs.balance, Some(60));
        assert!(!balance_rule.evaluate(&inputs));
    }

    #[test]
    fn test_balance_rule_ignores_foreign_and_other_mint_accounts() {
        let vault = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let balance_rule = rule(RuleCondition::Balance {
            mint,
            target_amount: 100,
        });

        let mut foreign = TokenFixture::new(mint, Pubkey::new_unique(), 1_000);
        let mut other_mint = TokenFixture::new(Pubkey::new_unique(), vault, 1_000);
        let accounts = [foreign.info(), other_mint.info()];

        let inputs = balance_rule.collect_inputs(&vault, 0, &accounts);
        assert_eq!(inputs.balance, None);
        assert!(!balance_rule.evaluate(&inputs));
    }
}
