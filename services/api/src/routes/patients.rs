use crate::error::HttpApiError;
use crate::schemas::SearchQuery;
use actix_web::{HttpResponse, delete, get, post, put, web};
use common::PatientFields;
use db::{Db, delete_patient, insert_patient, list_patients, update_patient};
use serde_json::json;

#[get("/api/patients")]
pub async fn list(
    data: web::Data<Db>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<HttpResponse> {
    let rows = list_patients(&data, query.q.as_deref()).await;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/patients")]
pub async fn create(
    data: web::Data<Db>,
    body: web::Json<PatientFields>,
) -> actix_web::Result<HttpResponse> {
    let row = insert_patient(&data, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[put("/api/patients/{id}")]
pub async fn update(
    data: web::Data<Db>,
    path: web::Path<String>,
    body: web::Json<PatientFields>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let row = update_patient(&data, &id, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[delete("/api/patients/{id}")]
pub async fn remove(
    data: web::Data<Db>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    delete_patient(&data, &id)
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(json!({"message": "Patient deleted successfully"})))
}
