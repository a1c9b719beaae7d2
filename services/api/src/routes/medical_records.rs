use crate::error::HttpApiError;
use crate::schemas::{DescriptionInput, SearchQuery};
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use common::MedicalRecordFields;
use db::{
    Db, delete_medical_record, edit_medical_record_description, insert_medical_record,
    list_medical_records, update_medical_record,
};
use serde_json::json;

/// Newest first unless `?q=` narrows the list.
#[get("/api/medicalrecords")]
pub async fn list(
    data: web::Data<Db>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<HttpResponse> {
    let rows = list_medical_records(&data, query.q.as_deref()).await;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/medicalrecords")]
pub async fn create(
    data: web::Data<Db>,
    body: web::Json<MedicalRecordFields>,
) -> actix_web::Result<HttpResponse> {
    let row = insert_medical_record(&data, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[put("/api/medicalrecords/{id}")]
pub async fn update(
    data: web::Data<Db>,
    path: web::Path<String>,
    body: web::Json<MedicalRecordFields>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let row = update_medical_record(&data, &id, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[patch("/api/medicalrecords/{id}/edit-description")]
pub async fn edit_description(
    data: web::Data<Db>,
    path: web::Path<String>,
    body: web::Json<DescriptionInput>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let row = edit_medical_record_description(&data, &id, body.into_inner().description)
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[delete("/api/medicalrecords/{id}")]
pub async fn remove(
    data: web::Data<Db>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    delete_medical_record(&data, &id)
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(json!({"message": "Medical Record deleted successfully"})))
}
