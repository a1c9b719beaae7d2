pub mod error;
pub mod routes;
pub mod schemas;
pub mod state;

use actix_web::{App, HttpResponse, web};

pub fn create_app(
    state: state::AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state.db.clone()))
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(error::json_error))
        .service(routes::auth::login)
        .service(routes::users::list)
        .service(routes::users::create)
        .service(routes::users::update)
        .service(routes::users::remove)
        .service(routes::patients::list)
        .service(routes::patients::create)
        .service(routes::patients::update)
        .service(routes::patients::remove)
        .service(routes::appointments::list)
        .service(routes::appointments::create)
        .service(routes::appointments::update)
        .service(routes::appointments::update_status)
        .service(routes::appointments::update_time)
        .service(routes::appointments::remove)
        .service(routes::medical_records::list)
        .service(routes::medical_records::create)
        .service(routes::medical_records::update)
        .service(routes::medical_records::edit_description)
        .service(routes::medical_records::remove)
        .default_service(web::to(|| async { HttpResponse::NotFound().finish() }))
}
