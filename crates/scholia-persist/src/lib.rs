pub mod dbs;
pub mod error;
pub mod models;
pub mod trait_client;

pub use error::{PersistError, Result};
pub use models::{
    is_valid_id, new_id, Chat, ChatKind, ChatScope, ChatTurn, FlashcardDeck, Folder, NewFolder,
    NewTopic, Resource, ResourceKind, RevisionNotes, RootChat, Topic,
};
pub use trait_client::PersistenceClient;

#[cfg(any(test, feature = "memory"))]
pub use dbs::memory::MemoryPersistenceClient;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
