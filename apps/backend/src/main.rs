use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, App, HttpServer};
use backend::routes;
use backend::state::app_state::AppState;
use backend::ServerConfig;

fn cors_middleware(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    backend::telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Summit Backend on http://{}:{}",
        config.host, config.port
    );

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(AppState::in_memory());
    let (host, port, cors_origin) = (config.host, config.port, config.cors_origin);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origin))
            .app_data(data.clone())
            .route("/", web::get().to(routes::health::root))
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
