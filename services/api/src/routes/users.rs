use crate::error::HttpApiError;
use crate::schemas::SearchQuery;
use actix_web::{HttpResponse, delete, get, post, put, web};
use common::UserFields;
use db::{Db, delete_user, insert_user, list_users, update_user};
use serde_json::json;

#[get("/api/users")]
pub async fn list(
    data: web::Data<Db>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<HttpResponse> {
    let rows = list_users(&data, query.q.as_deref()).await;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/users")]
pub async fn create(
    data: web::Data<Db>,
    body: web::Json<UserFields>,
) -> actix_web::Result<HttpResponse> {
    let row = insert_user(&data, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[put("/api/users/{id}")]
pub async fn update(
    data: web::Data<Db>,
    path: web::Path<String>,
    body: web::Json<UserFields>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let row = update_user(&data, &id, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[delete("/api/users/{id}")]
pub async fn remove(
    data: web::Data<Db>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    delete_user(&data, &id).await.map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(json!({"message": "User deleted successfully"})))
}
