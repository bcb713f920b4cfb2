use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::DefaultHeaders;
use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod envelope;
pub mod error;
pub mod typedid;
pub mod validation;

pub use campaign::{CampaignBody, CampaignStatus};
pub use config::Config;
pub use error::Error;

use crate::database::{Database, MongoDatabase};

const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "Content-Security-Policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("Strict-Transport-Security", "max-age=31536000; includeSubDomains"),
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "SAMEORIGIN"),
    ("Referrer-Policy", "no-referrer"),
    ("X-DNS-Prefetch-Control", "off"),
    ("Cross-Origin-Opener-Policy", "same-origin"),
    ("Cross-Origin-Resource-Policy", "same-origin"),
    ("Origin-Agent-Cluster", "?1"),
    ("X-Permitted-Cross-Domain-Policies", "none"),
    ("X-Download-Options", "noopen"),
    ("X-XSS-Protection", "0"),
];

/// Assembles the application around an already connected database.
pub fn app(
    db: Data<Box<dyn Database>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let headers = SECURITY_HEADERS
        .iter()
        .fold(DefaultHeaders::new(), |headers, &header| headers.add(header));

    // any origin may call the api, credentials are never involved
    let cors = Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header();

    App::new()
        .app_data(JsonConfig::default().error_handler(|err, _req| {
            // format json errors with custom format
            Error::InvalidJson(err).into()
        }))
        .app_data(PathConfig::default().error_handler(|err, _req| {
            // format path errors with custom format
            Error::InvalidPath(err).into()
        }))
        .app_data(QueryConfig::default().error_handler(|err, _req| {
            // format query errors with custom format
            Error::InvalidQuery(err).into()
        }))
        .app_data(db)
        .wrap(headers)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .configure(campaign::configure)
        .default_service(web::to(|| async { Error::PathNotFound.error_response() }))
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.mongodb_uri);
    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let db = MongoDatabase::initialize(client.database(&config.mongodb_database)).await?;
    let db = Data::new(Box::new(db) as Box<dyn Database>);

    info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || app(db.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}
