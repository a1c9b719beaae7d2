use crate::error::HttpApiError;
use crate::{schemas::LoginInput, state::AppState};
use actix_web::{HttpResponse, post, web};
use auth::{authenticate, new_auth_token};
use common::is_blank;
use db::list_users;
use serde_json::json;
use tracing::{info, warn};

/// Checks plaintext credentials against the staff collection.
///
/// The returned `authToken` is not recorded anywhere and no route checks it.
#[post("/api/login")]
pub async fn login(
    data: web::Data<AppState>,
    payload: web::Json<LoginInput>,
) -> actix_web::Result<HttpResponse> {
    let payload = payload.into_inner();

    // staff collection is re-read on every attempt
    let users = list_users(&data.db, None).await;

    let user = authenticate(&users, &payload.username, &payload.password).map_err(|e| {
        warn!(username = %payload.username.trim(), reason = %e, "login rejected");
        HttpApiError::from(e)
    })?;

    info!(id = %user.id, "login succeeded");
    let field = if is_blank(&user.field) {
        None
    } else {
        user.field.as_ref()
    };
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "role": user.role,
        "field": field,
        "authToken": new_auth_token(),
    })))
}
