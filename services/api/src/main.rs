use actix_cors::Cors;
use actix_web::{HttpServer, middleware::Logger};
use api::create_app;
use api::state::{AppState, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let s = Settings::from_env().map_err(std::io::Error::other)?;
    let data_dir = s.data_dir();
    let db = db::connect(&data_dir)
        .await
        .map_err(std::io::Error::other)?;

    let state = AppState { db };
    let (host, port) = (s.host(), s.port());
    info!(data_dir = %data_dir.display(), %host, port, "hospital api starting");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method();
        create_app(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
    })
    .bind((host, port))?
    .run()
    .await
}
