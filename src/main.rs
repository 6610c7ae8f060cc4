mod aggregation;
mod day_length;
mod errors;
mod handlers;
mod initialization;
mod logging;
mod manager_dashboard;
mod manager_owm;
mod synthetic;

use actix_web::{web, App, HttpServer};
use log::info;

use crate::errors::UnrecoverableError;
use crate::handlers::{dashboard, health};
use crate::initialization::config;
use crate::manager_dashboard::Dashboard;
use crate::manager_owm::OWM;

pub struct AppState {
    pub dashboard: Dashboard,
    pub default_city: String,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;
    logging::setup_logging(&config.logging.level)?;

    let owm = OWM::new(
        &config.owm.api_key,
        &config.owm.base_url,
        &config.owm.geo_url,
        config.owm.timeout_secs,
    )?;
    let state = web::Data::new(AppState {
        dashboard: Dashboard::new(owm, config.dashboard.peer_cities.clone()),
        default_city: config.dashboard.default_city.clone(),
    });

    info!("starting weatherdash on {}:{}", config.web_server.bind_address, config.web_server.bind_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(dashboard)
            .service(health)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
