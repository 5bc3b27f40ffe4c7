pub mod common;
pub mod party;
pub mod settings;
pub mod transaction;

pub use common::{Displayable, Identifiable};
pub use party::{Party, PartyRegistry};
pub use settings::Settings;
pub use transaction::{
    Entry, LineItem, PartyRole, Transaction, TransactionInput, TransactionKind,
};
