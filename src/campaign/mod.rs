use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub mod validation;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub status: CampaignStatus,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    #[default]
    Active,
    Inactive,
}

impl CampaignStatus {
    pub const NAMES: &'static [&'static str] = &["ACTIVE", "INACTIVE"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::Inactive => "INACTIVE",
        }
    }
}

impl Display for CampaignStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = UnknownCampaignStatus;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(CampaignStatus::Active),
            "INACTIVE" => Ok(CampaignStatus::Inactive),
            _ => Err(UnknownCampaignStatus),
        }
    }
}

impl From<CampaignStatus> for Bson {
    fn from(status: CampaignStatus) -> Bson {
        status.as_str().into()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownCampaignStatus;

/// The fields a caller supplies to create a campaign. The id, timestamps and
/// a missing status are filled in by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub status: Option<CampaignStatus>,
}

/// A partial update; only the fields that are `Some` are changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CampaignUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CampaignStatus>,
}

impl CampaignUpdate {
    pub fn apply(self, campaign: &mut Campaign) {
        if let Some(title) = self.title {
            campaign.title = title;
        }
        if let Some(description) = self.description {
            campaign.description = description;
        }
        if let Some(status) = self.status {
            campaign.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_screaming_case() {
        assert_eq!(
            serde_json::to_value(CampaignStatus::Inactive).unwrap(),
            serde_json::json!("INACTIVE")
        );
        assert_eq!("ACTIVE".parse(), Ok(CampaignStatus::Active));
        assert_eq!("active".parse::<CampaignStatus>(), Err(UnknownCampaignStatus));
        assert_eq!(CampaignStatus::default(), CampaignStatus::Active);
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let now = Utc::now();
        let mut campaign = Campaign {
            id: CampaignId::new(),
            title: "Launch".to_string(),
            description: "Q1 push".to_string(),
            status: CampaignStatus::Active,
            created_at: now,
            updated_at: now,
        };

        CampaignUpdate {
            status: Some(CampaignStatus::Inactive),
            ..Default::default()
        }
        .apply(&mut campaign);

        assert_eq!(campaign.title, "Launch");
        assert_eq!(campaign.description, "Q1 push");
        assert_eq!(campaign.status, CampaignStatus::Inactive);
    }
}
