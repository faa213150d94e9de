pub mod memory;
pub mod mysql;

pub use linkmint_core::store::Result;
pub use linkmint_core::{Link, LinkStore, NewLink, StorageError};
pub use memory::InMemoryLinkStore;
pub use mysql::MySqlLinkStore;
