pub mod artifacts;
pub mod chat;
pub mod folder;
pub mod resource;
pub mod topic;

pub use artifacts::{MongoFlashcardRepository, MongoRevisionNotesRepository};
pub use chat::MongoChatRepository;
pub use folder::MongoFolderRepository;
pub use resource::MongoResourceRepository;
pub use topic::MongoTopicRepository;
