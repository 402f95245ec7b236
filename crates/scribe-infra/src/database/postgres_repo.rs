//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, PostFilter, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// `%term%` for ILIKE, with LIKE metacharacters escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn filter_condition(filter: &PostFilter) -> Condition {
    match filter {
        PostFilter::Search(None) => Condition::all(),
        PostFilter::Search(Some(term)) => {
            let pattern = contains_pattern(term);
            Condition::any()
                .add(Expr::col(post::Column::Title).ilike(pattern.clone()))
                .add(Expr::col(post::Column::Content).ilike(pattern))
        }
        PostFilter::Tag(tag) => {
            Condition::all().add(Expr::cust_with_values("$1 = ANY(\"tags\")", [tag.clone()]))
        }
        PostFilter::Category(category) => {
            Condition::all().add(post::Column::Category.eq(category.as_str()))
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug, "Finding post by slug");

        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .order_by_asc(post::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn search(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(filter_condition(filter))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let document = serde_json::to_value(vec![comment])
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let append: SimpleExpr = Expr::cust_with_values("\"comments\" || $1::jsonb", [document]);
        let now: DateTimeWithTimeZone = Utc::now().into();

        let result = PostEntity::update_many()
            .col_expr(post::Column::Comments, append)
            .col_expr(post::Column::Version, Expr::col(post::Column::Version).add(1))
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .filter(post::Column::Id.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn update_versioned(&self, post: Post) -> Result<Post, RepoError> {
        let expected_version = post.version;
        let next = Post {
            version: expected_version + 1,
            updated_at: Utc::now(),
            ..post
        };

        let active_model: post::ActiveModel = next.clone().into();
        let result = PostEntity::update_many()
            .set(active_model)
            .filter(post::Column::Id.eq(next.id))
            .filter(post::Column::Version.eq(expected_version))
            .exec(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        if result.rows_affected == 0 {
            tracing::warn!(post_id = %next.id, expected_version, "Version conflict on post write");
            return Err(RepoError::VersionConflict);
        }

        Ok(next)
    }
}
