use tracing::debug;

use crate::database::Database;
use crate::error::Error;

use super::{Campaign, CampaignId, CampaignStatus, CampaignUpdate, NewCampaign};

/// Ids that do not parse cannot belong to any stored campaign.
fn parse_campaign_id(campaign_id: &str) -> Option<CampaignId> {
    match campaign_id.parse::<CampaignId>() {
        Ok(campaign_id) => Some(campaign_id),
        Err(err) => {
            debug!("{:?} is not a campaign id: {}", campaign_id, err);
            None
        }
    }
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(db: &dyn Database, campaign: NewCampaign) -> Result<Campaign, Error> {
    let campaign = db.campaigns().insert_campaign(campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: &dyn Database,
    status: Option<CampaignStatus>,
) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns(status).await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: &str,
) -> Result<Option<Campaign>, Error> {
    let campaign_id = match parse_campaign_id(campaign_id) {
        Some(campaign_id) => campaign_id,
        None => return Ok(None),
    };

    let campaign = db.campaigns().fetch_campaign_by_id(campaign_id).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: &str,
    update: CampaignUpdate,
) -> Result<Option<Campaign>, Error> {
    let campaign_id = match parse_campaign_id(campaign_id) {
        Some(campaign_id) => campaign_id,
        None => return Ok(None),
    };

    let campaign = db.campaigns().update_campaign(campaign_id, update).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: &dyn Database,
    campaign_id: &str,
) -> Result<Option<Campaign>, Error> {
    let campaign_id = match parse_campaign_id(campaign_id) {
        Some(campaign_id) => campaign_id,
        None => return Ok(None),
    };

    let campaign = db.campaigns().delete_campaign(campaign_id).await?;

    Ok(campaign)
}
