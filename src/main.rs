use campaign_server::{Config, Error};
use tracing::error;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    // a missing .env file is fine, the variables may come from the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    campaign_server::run(config).await
}
