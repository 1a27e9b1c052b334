mod account;
mod holder;
mod ledger;
mod money;
mod transaction;

pub use account::*;
pub use holder::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
