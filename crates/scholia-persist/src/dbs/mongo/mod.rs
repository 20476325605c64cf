pub mod client;
pub mod models;
pub mod repositories;

pub use client::MongoPersistenceClient;

use bson::oid::ObjectId;

use crate::error::{PersistError, Result};

pub(crate) fn parse_oid(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| PersistError::InvalidObjectId(format!("{id}: {e}")))
}
