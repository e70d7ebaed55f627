use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bcrypt::{DEFAULT_COST, hash, verify};
use serde_json::json;
use sqlx::QueryBuilder;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::{
        listings::{repository::get_listings_by_owner, schemas::ListingOut},
        reservations::{repository::get_reservations_by_user, schemas::ReservationOut},
        reviews::repository::retract_author_ratings,
        users::{
            models::User,
            schemas::{LoginIn, ProfileOut, RegisterIn, TokenOut, UserOut, UserUpdateIn},
        },
    },
    services::database::Database,
    utilities::{
        config::Config,
        errors::AppError,
        jwt::{Claims, OptionalClaims, create_token},
        validation::{validate_avatar, validate_bio, validate_email, validate_name},
    },
};

// -- =====================
// -- REGISTER
// -- =====================
pub async fn register_user_handler(
    State(database): State<Database>,
    State(config): State<Config>,
    Json(register_in): Json<RegisterIn>,
) -> Result<impl IntoResponse, AppError> {
    register_in.validate()?;

    let name = validate_name(&register_in.name)?;
    let email = validate_email(&register_in.email)?;
    if let Some(avatar) = &register_in.avatar {
        validate_avatar(avatar)?;
    }
    let bio = match &register_in.bio {
        Some(bio) => validate_bio(bio)?,
        None => String::new(),
    };

    let email_taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&database.pool)
        .await?;

    if email_taken > 0 {
        return Err(AppError::BusinessRuleError(
            "An account with that email already exists.".to_string(),
        ));
    }

    let hashed_password = hash(&register_in.password, DEFAULT_COST)?;
    let user_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password, name, avatar, bio)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(&email)
    .bind(&hashed_password)
    .bind(&name)
    .bind(&register_in.avatar)
    .bind(&bio)
    .execute(&database.pool)
    .await?;

    info!("registered user {user_id}");

    let token = create_token(&config, user_id)?;

    Ok((StatusCode::CREATED, Json(TokenOut { token })))
}

// -- =====================
// -- LOGIN
// -- =====================
pub async fn login_user_handler(
    State(database): State<Database>,
    State(config): State<Config>,
    Json(login_in): Json<LoginIn>,
) -> Result<impl IntoResponse, AppError> {
    let email = login_in.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&database.pool)
        .await?
        .ok_or_else(|| AppError::UnauthorizedError("Account does not exist.".to_string()))?;

    let is_match = verify(&login_in.password, &user.password)?;
    if !is_match {
        return Err(AppError::UnauthorizedError(
            "Incorrect password.".to_string(),
        ));
    }

    let token = create_token(&config, user.id)?;

    Ok(Json(TokenOut { token }))
}

// -- =====================
// -- GET USER
// -- =====================
pub async fn get_user_handler(
    optional_claims: OptionalClaims,
    State(database): State<Database>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let requester = optional_claims.user_id();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&database.pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("User not found.".to_string()))?;

    let places = get_listings_by_owner(&database.pool, &user_id)
        .await?
        .into_iter()
        .map(|listing| ListingOut::redacted(listing, requester, None))
        .collect();

    // Reservations are part of the subject's private profile.
    let reservations = if requester == Some(user_id) {
        let reservations = get_reservations_by_user(&database.pool, &user_id).await?;
        Some(reservations.into_iter().map(ReservationOut::from).collect())
    } else {
        None
    };

    Ok(Json(ProfileOut {
        user: UserOut::redacted(user, requester),
        places,
        reservations,
    }))
}

// -- =====================
// -- UPDATE USER
// -- =====================
pub async fn update_user_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(user_id): Path<Uuid>,
    Json(mut update_in): Json<UserUpdateIn>,
) -> Result<impl IntoResponse, AppError> {
    if claims.sub != user_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    update_in.validate()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&database.pool)
        .await?
        .ok_or_else(|| {
            AppError::UnauthorizedError("User account does not exist.".to_string())
        })?;

    let mut new_password_hash = None;
    if let Some(new_password) = update_in.new_password.take() {
        let old_password = update_in.old_password.take().ok_or_else(|| {
            AppError::UnauthorizedError("Please enter your old password.".to_string())
        })?;

        if !verify(&old_password, &user.password)? {
            return Err(AppError::UnauthorizedError("Invalid password.".to_string()));
        }

        new_password_hash = Some(hash(&new_password, DEFAULT_COST)?);
    }

    let mut new_email = None;
    if let Some(email) = update_in.email.take() {
        let password = update_in.password.take().ok_or_else(|| {
            AppError::UnauthorizedError("Please enter your password.".to_string())
        })?;

        if !verify(&password, &user.password)? {
            return Err(AppError::UnauthorizedError("Invalid password.".to_string()));
        }

        let email = validate_email(&email)?;

        let email_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2",
        )
        .bind(&email)
        .bind(user_id)
        .fetch_one(&database.pool)
        .await?;

        if email_taken > 0 {
            return Err(AppError::BusinessRuleError(
                "An account with that email already exists.".to_string(),
            ));
        }

        new_email = Some(email);
    }

    let name = match &update_in.name {
        Some(name) => Some(validate_name(name)?),
        None => None,
    };
    if let Some(avatar) = &update_in.avatar {
        validate_avatar(avatar)?;
    }
    let bio = match &update_in.bio {
        Some(bio) => Some(validate_bio(bio)?),
        None => None,
    };

    let mut update_qb = QueryBuilder::new("UPDATE users SET updated_at = now()");

    if let Some(name) = name {
        update_qb.push(", name = ").push_bind(name);
    }
    if let Some(avatar) = &update_in.avatar {
        update_qb.push(", avatar = ").push_bind(avatar);
    }
    if let Some(bio) = bio {
        update_qb.push(", bio = ").push_bind(bio);
    }
    if let Some(email) = new_email {
        update_qb.push(", email = ").push_bind(email);
    }
    if let Some(password) = new_password_hash {
        update_qb.push(", password = ").push_bind(password);
    }

    update_qb.push(" WHERE id = ").push_bind(user_id);
    update_qb.push(" RETURNING *");

    let user: User = update_qb
        .build_query_as::<User>()
        .fetch_one(&database.pool)
        .await?;

    Ok(Json(UserOut::redacted(user, Some(claims.sub))))
}

// -- =====================
// -- DEACTIVATE
// -- =====================
pub async fn deactivate_user_handler(
    claims: Claims,
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = database.pool.begin().await?;

    // The FK cascade removes this user's reviews; their ratings must come
    // out of the surviving listings' aggregates first.
    retract_author_ratings(&mut tx, &claims.sub).await?;

    let query_result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(claims.sub)
        .execute(&mut *tx)
        .await?;

    if query_result.rows_affected() == 0 {
        return Err(AppError::UnauthorizedError(
            "User account does not exist.".to_string(),
        ));
    }

    tx.commit().await?;

    info!("deactivated user {}", claims.sub);

    Ok(Json(json!({"message": "Successfully deactivated account."})))
}
