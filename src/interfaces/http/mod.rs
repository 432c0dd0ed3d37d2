use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{dev::Server, error, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::use_cases::house_prices::load_house_prices;
use crate::application::{ActionService, Datasets};
use crate::domain::action::{ContactCouncilRequest, SignPetitionRequest};
use crate::domain::error::AppError;

pub struct HttpState {
    pub datasets: Arc<Datasets>,
    pub actions: Arc<ActionService>,
}

#[derive(Serialize)]
pub struct PetitionResponse {
    pub success: bool,
    pub message: String,
    pub total_signatures: u64,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub total_actions: u64,
}

#[get("/income-data")]
async fn income_data(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.income)
}

#[get("/comparison-data")]
async fn comparison_data(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.comparison)
}

#[get("/rent-data")]
async fn rent_data(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.rent)
}

#[get("/vacancy-data")]
async fn vacancy_data(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.vacancy)
}

#[get("/population-data")]
async fn population_data(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.population)
}

#[get("/zoning-data")]
async fn zoning_data(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.zoning)
}

#[get("/completions-data")]
async fn completions_data(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.completions)
}

#[get("/housing-stats")]
async fn housing_stats(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.datasets.stats)
}

#[get("/action-data")]
async fn action_data(data: web::Data<HttpState>) -> impl Responder {
    // Writers hold the lock while saving
    let actions = data.actions.clone();
    match web::block(move || actions.snapshot()).await {
        Ok(Ok(snapshot)) => HttpResponse::Ok().json(snapshot),
        Ok(Err(e)) => error_response(&e),
        Err(e) => error_response(&AppError::Internal(e.to_string())),
    }
}

#[get("/housing-prices")]
async fn housing_prices(data: web::Data<HttpState>) -> impl Responder {
    let path = data.datasets.housing_prices_path.clone();
    match web::block(move || load_house_prices(&path)).await {
        Ok(Ok(points)) => HttpResponse::Ok().json(points),
        Ok(Err(e)) => {
            error!(path = %data.datasets.housing_prices_path.display(), error = %e, "Failed to load house prices");
            error_response(&e)
        }
        Err(e) => error_response(&AppError::Internal(e.to_string())),
    }
}

#[get("/missing-middle-impact")]
async fn missing_middle_impact(data: web::Data<HttpState>) -> impl Responder {
    match data.datasets.missing_middle_impact() {
        Ok(impact) => HttpResponse::Ok().json(impact),
        // Reported in the body; the page still renders
        Err(AppError::NotFound(msg)) => HttpResponse::Ok().json(json!({ "error": msg })),
        Err(e) => error_response(&e),
    }
}

#[get("/health")]
async fn health(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "tables": data.datasets.row_counts(),
    }))
}

#[post("/sign-petition")]
async fn sign_petition(
    data: web::Data<HttpState>,
    req: web::Json<SignPetitionRequest>,
) -> impl Responder {
    let actions = data.actions.clone();
    let request = req.into_inner();

    match web::block(move || actions.sign_petition(&request)).await {
        Ok(Ok(total_signatures)) => HttpResponse::Ok().json(PetitionResponse {
            success: true,
            message: "Thank you for signing the petition!".to_string(),
            total_signatures,
        }),
        Ok(Err(e)) => {
            log_write_failure("sign-petition", &e);
            error_response(&e)
        }
        Err(e) => error_response(&AppError::Internal(e.to_string())),
    }
}

#[post("/contact-council")]
async fn contact_council(
    data: web::Data<HttpState>,
    req: web::Json<ContactCouncilRequest>,
) -> impl Responder {
    let actions = data.actions.clone();
    let request = req.into_inner();

    match web::block(move || actions.contact_council(&request)).await {
        Ok(Ok(total_actions)) => HttpResponse::Ok().json(ContactResponse {
            success: true,
            message: "Thank you for contacting council!".to_string(),
            total_actions,
        }),
        Ok(Err(e)) => {
            log_write_failure("contact-council", &e);
            error_response(&e)
        }
        Err(e) => error_response(&AppError::Internal(e.to_string())),
    }
}

/// 400 for validation failures, 500 for everything else
fn error_response(err: &AppError) -> HttpResponse {
    if err.is_client_error() {
        HttpResponse::BadRequest().json(json!({ "error": err.message() }))
    } else {
        HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }))
    }
}

fn log_write_failure(endpoint: &str, err: &AppError) {
    if err.is_client_error() {
        warn!(endpoint, error = %err, "Rejected submission");
    } else {
        error!(endpoint, error = %err, "Submission failed");
    }
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as validation failures
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
        error::InternalError::from_response(err, response).into()
    })
}

/// Register the `/api` routes. Shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .service(income_data)
            .service(comparison_data)
            .service(rent_data)
            .service(vacancy_data)
            .service(population_data)
            .service(zoning_data)
            .service(completions_data)
            .service(housing_stats)
            .service(action_data)
            .service(housing_prices)
            .service(missing_middle_impact)
            .service(health)
            .service(sign_petition)
            .service(contact_council),
    );
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        // Public read-only data plus two form posts
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    info!(host, port, "HTTP server listening");
    Ok(server)
}
