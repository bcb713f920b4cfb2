use std::collections::HashMap;

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::web::{Bytes, Data, Json, Path, Query, ServiceConfig};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::Database;
use crate::envelope::Envelope;
use crate::error::Error;
use crate::validation::RequestParts;

use super::{manager, validation, Campaign, CampaignId, CampaignStatus};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBody {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            title: campaign.title,
            description: campaign.description,
            status: campaign.status,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        }
    }
}

/// Reads an optional json body. A missing or blank body counts as `{}`.
fn optional_json(body: &[u8]) -> Result<Value, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(body)
        .map_err(|err| Error::InvalidJson(JsonPayloadError::Deserialize(err)))
}

/// Registers every campaign route.
pub fn configure(config: &mut ServiceConfig) {
    config
        .service(create_campaign)
        .service(get_campaigns)
        .service(get_campaign_by_id)
        .service(update_campaign)
        .service(delete_campaign);
}

#[post("/campaign")]
#[tracing::instrument(skip(db))]
async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<Value>,
) -> Result<HttpResponse, Error> {
    let parts = RequestParts::default().with_body(body.into_inner());
    let new_campaign = validation::new_campaign(&parts)?;

    let campaign = manager::create_campaign(&***db, new_campaign).await?;

    let body = CampaignBody::render(campaign);
    Ok(Envelope::success("Campaign created successfully", body).respond(StatusCode::CREATED))
}

#[get("/campaign")]
#[tracing::instrument(skip(db))]
async fn get_campaigns(
    db: Data<Box<dyn Database>>,
    query: Query<HashMap<String, String>>,
) -> Result<HttpResponse, Error> {
    let parts = RequestParts::default().with_query(query.into_inner());
    let status = validation::status_filter(&parts)?;

    let campaigns = manager::get_campaigns(&***db, status).await?;

    let body: Vec<CampaignBody> = campaigns.into_iter().map(CampaignBody::render).collect();
    Ok(Envelope::success("Campaigns retrieved successfully", body).respond(StatusCode::OK))
}

#[get("/campaign/{id}")]
#[tracing::instrument(skip(db))]
async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<String>,
) -> Result<HttpResponse, Error> {
    let parts = RequestParts::default().with_param("id", params.into_inner());
    let campaign_id = validation::campaign_id(&parts)?;

    let campaign = manager::get_campaign_by_id(&***db, &campaign_id).await?;
    let campaign = campaign.ok_or(Error::CampaignNotFound { campaign_id })?;

    let body = CampaignBody::render(campaign);
    Ok(Envelope::success("Campaign retrieved successfully", body).respond(StatusCode::OK))
}

#[put("/campaign/{id}")]
#[tracing::instrument(skip(db))]
async fn update_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<String>,
    body: Bytes,
) -> Result<HttpResponse, Error> {
    let parts = RequestParts::default()
        .with_param("id", params.into_inner())
        .with_body(optional_json(&body)?);
    let (campaign_id, update) = validation::campaign_update(&parts)?;

    let campaign = manager::update_campaign(&***db, &campaign_id, update).await?;
    let campaign = campaign.ok_or(Error::CampaignNotFound { campaign_id })?;

    let body = CampaignBody::render(campaign);
    Ok(Envelope::success("Campaign updated successfully", body).respond(StatusCode::OK))
}

#[delete("/campaign/{id}")]
#[tracing::instrument(skip(db))]
async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<String>,
) -> Result<HttpResponse, Error> {
    let parts = RequestParts::default().with_param("id", params.into_inner());
    let campaign_id = validation::campaign_id(&parts)?;

    let campaign = manager::delete_campaign(&***db, &campaign_id).await?;
    let campaign = campaign.ok_or(Error::CampaignNotFound { campaign_id })?;

    let body = CampaignBody::render(campaign);
    Ok(Envelope::success("Campaign deleted successfully", body).respond(StatusCode::OK))
}
