pub mod add_rule;
pub mod check_current_rule;
pub mod create_rule;
pub mod create_vault;
pub mod deposit;
pub mod execute_current_rule;
pub mod governance;
pub mod initialize_factory;
pub mod price_feed;
pub mod views;
pub mod withdraw;
pub mod withdraw_via_failsafe;

pub use add_rule::*;
pub use check_current_rule::*;
pub use create_rule::*;
pub use create_vault::*;
pub use deposit::*;
pub use execute_current_rule::*;
pub use governance::*;
pub use initialize_factory::*;
pub use price_feed::*;
pub use views::*;
pub use withdraw::*;
pub use withdraw_via_failsafe::*;
