use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use super::handlers;
use super::state::AppState;

pub struct Server;

impl Server {
    pub async fn run(state: AppState) -> std::io::Result<()> {
        let bind_addr = state.config.bind_addr.clone();
        let data = web::Data::new(state);
        log::info!("starting hosting server on {bind_addr}");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(data.clone())
                .route("/game/start", web::post().to(handlers::start_game))
                .route("/score", web::post().to(handlers::submit_score))
                .route("/halloffame", web::get().to(handlers::hall_of_fame))
                .route("/hallofshame", web::get().to(handlers::hall_of_shame))
                .route("/ml/status", web::get().to(handlers::ml_status))
                .route("/ml/versions", web::get().to(handlers::ml_versions))
                .route("/ml/training-logs", web::get().to(handlers::ml_training_logs))
                .route("/ml/edge-cases", web::get().to(handlers::ml_edge_cases))
                .route("/ml/train", web::post().to(handlers::ml_train))
        })
        .workers(num_cpus::get())
        .bind(bind_addr)?
        .run()
        .await
    }
}
