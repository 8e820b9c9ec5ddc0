//! This file serves as the root for all SeaORM entity modules.
//! Users own one-off transactions and recurring rules; nothing else is persisted.
//! Projected ledger entries are computed on demand and never stored.

pub mod one_off_transaction;
pub mod recurring_transaction;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::one_off_transaction::Entity as OneOffTransaction;
    pub use super::recurring_transaction::Entity as RecurringTransaction;
    pub use super::user::Entity as User;
}
