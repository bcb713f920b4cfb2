use crate::error::Error;
use crate::validation::{validate, FieldRule, Location, RequestParts, Step, Validated};

use super::{CampaignStatus, CampaignUpdate, NewCampaign};

const ID: &[Step] = &[Step::IsString, Step::NotEmpty];
const TEXT: &[Step] = &[Step::IsString, Step::NotEmpty, Step::Escape];
const STATUS: &[Step] = &[Step::IsString, Step::OneOf(CampaignStatus::NAMES)];
const STATUS_FILTER: &[Step] = &[
    Step::IsString,
    Step::Uppercase,
    Step::OneOf(CampaignStatus::NAMES),
];

pub const CREATE_CAMPAIGN: &[FieldRule] = &[
    FieldRule::required(Location::Body, "title", TEXT),
    FieldRule::required(Location::Body, "description", TEXT),
    FieldRule::optional(Location::Body, "status", STATUS),
];

pub const UPDATE_CAMPAIGN: &[FieldRule] = &[
    FieldRule::required(Location::Params, "id", ID),
    FieldRule::optional(Location::Body, "title", TEXT),
    FieldRule::optional(Location::Body, "description", TEXT),
    FieldRule::optional(Location::Body, "status", STATUS),
];

pub const CAMPAIGN_BY_ID: &[FieldRule] = &[FieldRule::required(Location::Params, "id", ID)];

pub const LIST_CAMPAIGNS: &[FieldRule] =
    &[FieldRule::optional(Location::Query, "status", STATUS_FILTER)];

fn check(rules: &[FieldRule], parts: &RequestParts) -> Result<Validated, Error> {
    validate(rules, parts).map_err(|errors| Error::ValidationFailed { errors })
}

fn take_status(validated: &mut Validated, location: Location) -> Option<CampaignStatus> {
    validated
        .take_string(location, "status")
        .and_then(|status| status.parse().ok())
}

pub fn new_campaign(parts: &RequestParts) -> Result<NewCampaign, Error> {
    let mut validated = check(CREATE_CAMPAIGN, parts)?;

    Ok(NewCampaign {
        title: validated
            .take_string(Location::Body, "title")
            .unwrap_or_default(),
        description: validated
            .take_string(Location::Body, "description")
            .unwrap_or_default(),
        status: take_status(&mut validated, Location::Body),
    })
}

pub fn campaign_update(parts: &RequestParts) -> Result<(String, CampaignUpdate), Error> {
    let mut validated = check(UPDATE_CAMPAIGN, parts)?;

    let campaign_id = validated
        .take_string(Location::Params, "id")
        .unwrap_or_default();
    let update = CampaignUpdate {
        title: validated.take_string(Location::Body, "title"),
        description: validated.take_string(Location::Body, "description"),
        status: take_status(&mut validated, Location::Body),
    };

    Ok((campaign_id, update))
}

pub fn campaign_id(parts: &RequestParts) -> Result<String, Error> {
    let mut validated = check(CAMPAIGN_BY_ID, parts)?;

    Ok(validated
        .take_string(Location::Params, "id")
        .unwrap_or_default())
}

pub fn status_filter(parts: &RequestParts) -> Result<Option<CampaignStatus>, Error> {
    let mut validated = check(LIST_CAMPAIGNS, parts)?;

    Ok(take_status(&mut validated, Location::Query))
}
