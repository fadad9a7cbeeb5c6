//! Staff account management for admins.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::audit::{AuditActor, CreateAuditLog};
use crate::models::customer::non_blank;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::{CreateUser, UpdateUser, User, UserResponse};
use crate::services::{audit, auth};

/// List accounts ordered by display name.
pub async fn list(pool: &PgPool, pagination: &Pagination) -> Result<PagedResult<UserResponse>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY display_name ASC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(
        users.into_iter().map(UserResponse::from).collect(),
        total,
        pagination,
    ))
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<UserResponse, AppError> {
    auth::find_user_by_id(pool, id).await.map(UserResponse::from)
}

/// Create an account with an explicit role.
pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<UserResponse, AppError> {
    input.validate()?;

    let password_hash = auth::hash_password(&input.password)?;
    let user = auth::insert_user(
        pool,
        input.username.trim(),
        &input.email.trim().to_lowercase(),
        &password_hash,
        input.display_name.trim(),
        non_blank(&input.phone).as_deref(),
        input.role,
    )
    .await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User created");
    Ok(user.into())
}

/// Update profile fields, role or active flag. Absent fields keep their value.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateUser) -> Result<UserResponse, AppError> {
    input.validate()?;
    let input = input.normalized()?;
    auth::find_user_by_id(pool, id).await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            username = COALESCE($2, username),
            email = COALESCE($3, email),
            display_name = COALESCE($4, display_name),
            phone = COALESCE($5, phone),
            role = COALESCE($6, role),
            is_active = COALESCE($7, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.username)
    .bind(&input.email)
    .bind(&input.display_name)
    .bind(&input.phone)
    .bind(input.role)
    .bind(input.is_active)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Username or email already exists", "Invalid reference"))?;

    Ok(user.into())
}

/// Remove an account. Admins cannot remove their own account.
pub async fn delete(pool: &PgPool, id: Uuid, actor: &AuditActor) -> Result<(), AppError> {
    if id == actor.id {
        return Err(AppError::Validation(
            "you cannot delete your own account".to_string(),
        ));
    }
    let user = auth::find_user_by_id(pool, id).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    audit::record(
        &mut *tx,
        actor,
        &CreateAuditLog {
            entity_type: "user".to_string(),
            entity_id: Some(id),
            action: "delete".to_string(),
            details: Some(serde_json::json!({ "username": user.username })),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = %id, actor = %actor.username, "User deleted");
    Ok(())
}
