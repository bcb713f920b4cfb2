use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::bson::{self, Document};
use mongodb::Database;

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId, CampaignStatus, CampaignUpdate, NewCampaign};

pub const CAMPAIGNS: &str = "campaigns";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": CAMPAIGNS,
            "indexes": [
                { "key": { "status": 1 }, "name": "by_status" },
            ]
        },
        None,
    )
    .await?;

    Ok(())
}

/// The record stored for a new campaign. Both timestamps are `now`.
fn new_campaign_record(campaign: NewCampaign, now: bson::DateTime) -> Campaign {
    let now = now.to_chrono();
    Campaign {
        id: CampaignId::new(),
        title: campaign.title,
        description: campaign.description,
        status: campaign.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    }
}

fn status_filter(status: Option<CampaignStatus>) -> Document {
    match status {
        Some(status) => bson::doc! { "status": status },
        None => bson::doc! {},
    }
}

/// The `$set` update for the supplied fields. `updated_at` is always set.
fn update_document(update: CampaignUpdate, now: bson::DateTime) -> Document {
    let mut changes = bson::doc! { "updated_at": now };
    if let Some(title) = update.title {
        changes.insert("title", title);
    }
    if let Some(description) = update.description {
        changes.insert("description", description);
    }
    if let Some(status) = update.status {
        changes.insert("status", status);
    }

    bson::doc! { "$set": changes }
}

#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Persists a new campaign, assigning its id, timestamps and default status.
    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error>;

    async fn fetch_campaigns(
        &self,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    /// Returns the campaign as it is after the update, or `None` if it does
    /// not exist.
    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        update: CampaignUpdate,
    ) -> Result<Option<Campaign>, Error>;

    /// Returns the campaign as it was before it was removed, or `None` if it
    /// does not exist.
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<Option<Campaign>, Error>;
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error> {
        // bson datetimes only keep milliseconds
        let campaign = new_campaign_record(campaign, bson::DateTime::now());

        self.insert_one(&campaign, None).await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(
        &self,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<Campaign>, Error> {
        let campaigns: Vec<Campaign> = self
            .find(status_filter(status), None)
            .await?
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self
            .find_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        update: CampaignUpdate,
    ) -> Result<Option<Campaign>, Error> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let campaign: Option<Campaign> = self
            .find_one_and_update(
                bson::doc! { "_id": campaign_id },
                update_document(update, bson::DateTime::now()),
                options,
            )
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self
            .find_one_and_delete(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }
}
