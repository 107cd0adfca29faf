mod auth;
mod cors;
mod dto;
mod maintenance;
mod pool;
mod routes;
mod sql_stmt;
mod store;

use dto::{ResponseData, RESPONSE_BAD_REQUEST, RESPONSE_INTERNAL_ERROR};
use pool::Db;
use rocket::fairing::AdHoc;
use rocket::{serde::json::Json, Config, Request};
use sea_orm_rocket::Database;
use std::collections::HashSet;
use std::sync::Arc;
use store::{Coordinator, SeaOrmStore};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[macro_use]
extern crate rocket;

#[get("/")]
async fn health_ping() -> &'static str {
    ""
}

#[get("/maintenance_mode")]
async fn maintenance_mode() -> Json<ResponseData<&'static str>> {
    let response = ResponseData {
        code: Some(503),
        status_code: None,
        message: "".to_string(),
        data: None,
    };
    Json(response)
}

#[catch(404)]
async fn bad_request(req: &Request<'_>) -> Json<ResponseData<String>> {
    let message = format!("Couldn't find '{}'", req.uri());
    Json(ResponseData::new(RESPONSE_BAD_REQUEST, message, None))
}

#[catch(500)]
async fn internal_error() -> Json<ResponseData<String>> {
    Json(ResponseData::new(
        RESPONSE_INTERNAL_ERROR,
        "Whoops! Looks like we messed up.".to_owned(),
        None,
    ))
}

#[catch(404)]
async fn history_bad_data() -> Json<ResponseData<String>> {
    let message =
        format!("Please check params. 'page' & 'limit' are numeric and start from 1.");
    Json(ResponseData::new(RESPONSE_BAD_REQUEST, message, None))
}

#[catch(401)]
async fn unauthorized() -> Json<ResponseData<String>> {
    Json(ResponseData::new(
        401,
        "A valid bearer token is required.".to_owned(),
        None,
    ))
}

#[catch(403)]
async fn forbidden() -> Json<ResponseData<String>> {
    Json(ResponseData::new(
        403,
        "This operation requires the admin capability.".to_owned(),
        None,
    ))
}

#[launch]
async fn rocket() -> _ {
    let market_config = Config::figment().extract::<pool::MarketConfig>().unwrap();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &market_config.rust_log);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                format!("market_web_api={}", &market_config.web_api_log)
                    .parse()
                    .expect("Error parsing directive"),
            ),
        )
        .with_span_events(FmtSpan::FULL)
        .init();

    let allowed_domains: HashSet<String> = market_config
        .cors_allowed_domains
        .split(',')
        .map(|s| s.to_owned())
        .collect();

    rocket::build()
        .register("/submission_history", catchers![history_bad_data])
        .register("/withdrawal_history", catchers![history_bad_data])
        .register("/", catchers![internal_error, bad_request, unauthorized, forbidden])
        .attach(Db::init())
        .attach(AdHoc::try_on_ignite("Settlement Coordinator", |rocket| async {
            let conn = match Db::fetch(&rocket) {
                Some(db) => db.conn.clone(),
                None => return Err(rocket),
            };
            let coordinator = Coordinator::new(Arc::new(SeaOrmStore::new(conn)));
            Ok(rocket.manage(coordinator))
        }))
        .attach(maintenance::MaintenanceMode)
        .manage(market_config)
        .attach(cors::OriginHeader { allowed_domains })
        .attach(routes::mount())
        .mount("/", routes![health_ping, maintenance_mode])
}
