//! Post entity for SeaORM.
//!
//! Comments and their replies live in a single JSONB column so the post
//! aggregate is read and written as one row.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

use scribe_core::domain::Comment;

/// JSONB document holding a post's comment thread.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CommentList(pub Vec<Comment>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    #[sea_orm(indexed)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: CommentList,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for scribe_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            created_by: model.created_by,
            title: model.title,
            slug: model.slug,
            content: model.content,
            description: model.description,
            category: model.category,
            tags: model.tags,
            image_url: model.image_url,
            comments: model.comments.0,
            version: model.version,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<scribe_core::domain::Post> for ActiveModel {
    fn from(post: scribe_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            created_by: Set(post.created_by),
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            description: Set(post.description),
            category: Set(post.category),
            tags: Set(post.tags),
            image_url: Set(post.image_url),
            comments: Set(CommentList(post.comments)),
            version: Set(post.version),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
