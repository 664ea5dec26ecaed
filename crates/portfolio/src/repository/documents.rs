use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entity::content_document::{Entity as ContentDocument, Model};

use super::errors::Result;

pub async fn find_document(db: &DatabaseConnection, key: &str) -> Result<Option<Model>> {
    Ok(ContentDocument::find_by_id(key.to_string()).one(db).await?)
}
