mod account;
mod entry;

pub use account::Account;
pub use entry::{AddressKind, TreeItem, Entry, EntryKind, ItemKind, NestedNote};
