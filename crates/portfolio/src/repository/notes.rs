use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::note::{ActiveModel, Column, Entity as Note, Model};

use super::errors::{RepositoryError, Result};

fn validated_content(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::invalid_input("content is required"));
    }
    Ok(trimmed.to_string())
}

/// All notes, newest first.
pub async fn list_notes(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Ok(Note::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// Create a note.
///
/// # Errors
/// `InvalidInput` when `content` is blank.
pub async fn create_note(db: &DatabaseConnection, content: &str) -> Result<Model> {
    let content = validated_content(content)?;
    let now = Utc::now().fixed_offset();
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        content: Set(content),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(db).await?)
}

/// Replace a note's content.
///
/// # Errors
/// `NotFound` when no note has `id`, `InvalidInput` when `content` is blank.
pub async fn update_note(db: &DatabaseConnection, id: Uuid, content: &str) -> Result<Model> {
    let content = validated_content(content)?;
    let existing = Note::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Note", id.to_string()))?;

    let mut model = existing.into_active_model();
    model.content = Set(content);
    model.updated_at = Set(Utc::now().fixed_offset());
    Ok(model.update(db).await?)
}

/// Delete a note. Returns `NotFound` when nothing was deleted.
pub async fn delete_note(db: &DatabaseConnection, id: Uuid) -> Result<()> {
    let result = Note::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(RepositoryError::not_found("Note", id.to_string()));
    }
    Ok(())
}
