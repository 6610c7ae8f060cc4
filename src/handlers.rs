use actix_web::{get, web, HttpResponse, Responder};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use crate::manager_owm::errors::OwmError;
use crate::AppState;

#[derive(Deserialize, Debug)]
struct DashboardQuery {
    city: Option<String>,
}

#[get("/dashboard")]
async fn dashboard(params: web::Query<DashboardQuery>, data: web::Data<AppState>) -> impl Responder {
    let city = params.city.clone().unwrap_or_else(|| data.default_city.clone());
    info!("dashboard requested for {}", city);

    match data.dashboard.get_dashboard_data(&city).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => {
            error!("failed to build dashboard for {}: {}", city, e);
            let body = json!({ "error": e.to_string() });
            match e {
                OwmError::NotFound(_) => HttpResponse::NotFound().json(body),
                OwmError::Auth => HttpResponse::BadGateway().json(body),
                OwmError::RateLimit => HttpResponse::ServiceUnavailable().json(body),
                _ => HttpResponse::InternalServerError().json(body),
            }
        }
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().finish()
}
