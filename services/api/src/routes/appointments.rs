use crate::error::HttpApiError;
use crate::schemas::{SearchQuery, StatusInput, TimeInput};
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use common::AppointmentFields;
use db::{
    Db, delete_appointment, insert_appointment, list_appointments, update_appointment,
    update_appointment_status, update_appointment_time,
};
use serde_json::json;

#[get("/api/appointments")]
pub async fn list(
    data: web::Data<Db>,
    query: web::Query<SearchQuery>,
) -> actix_web::Result<HttpResponse> {
    let rows = list_appointments(&data, query.q.as_deref()).await;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/api/appointments")]
pub async fn create(
    data: web::Data<Db>,
    body: web::Json<AppointmentFields>,
) -> actix_web::Result<HttpResponse> {
    let row = insert_appointment(&data, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[put("/api/appointments/{id}")]
pub async fn update(
    data: web::Data<Db>,
    path: web::Path<String>,
    body: web::Json<AppointmentFields>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let row = update_appointment(&data, &id, body.into_inner())
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[patch("/api/appointments/{id}/status")]
pub async fn update_status(
    data: web::Data<Db>,
    path: web::Path<String>,
    body: web::Json<StatusInput>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let row = update_appointment_status(&data, &id, body.into_inner().status)
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[patch("/api/appointments/{id}/time")]
pub async fn update_time(
    data: web::Data<Db>,
    path: web::Path<String>,
    body: web::Json<TimeInput>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let row = update_appointment_time(&data, &id, body.into_inner().time)
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(row))
}

#[delete("/api/appointments/{id}")]
pub async fn remove(
    data: web::Data<Db>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    delete_appointment(&data, &id)
        .await
        .map_err(HttpApiError::from)?;
    Ok(HttpResponse::Ok().json(json!({"message": "Appointment deleted successfully"})))
}
