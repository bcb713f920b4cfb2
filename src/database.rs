use mongodb::{bson, Collection, Database as MongoDb};

use crate::campaign::db::{self as campaign_db, CampaignStore, CAMPAIGNS};
use crate::campaign::Campaign;
use crate::error::Error;

pub type MongoCampaignStore = Collection<Campaign>;

/// The handle every request goes through to reach storage.
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: MongoCampaignStore,
    db: MongoDb,
}

impl MongoDatabase {
    pub fn new(db: MongoDb) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection(CAMPAIGNS),
            db,
        }
    }

    /// Checks that the database is reachable and creates any missing indexes.
    pub async fn initialize(db: MongoDb) -> Result<MongoDatabase, Error> {
        db.run_command(bson::doc! { "ping": 1 }, None).await?;
        campaign_db::initialize(&db).await?;

        Ok(MongoDatabase::new(db))
    }

    pub async fn drop(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        Ok(())
    }
}

impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }
}

#[cfg(test)]
pub mod test {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::Database;
    use crate::campaign::db::CampaignStore;
    use crate::campaign::{Campaign, CampaignId, CampaignStatus, CampaignUpdate, NewCampaign};
    use crate::error::Error;

    type Handler<A, R> = Box<dyn Fn(A) -> Result<R, Error> + Send + Sync>;

    pub struct MockCampaignStore {
        pub on_insert_campaign: Handler<NewCampaign, Campaign>,
        pub on_fetch_campaigns: Handler<Option<CampaignStatus>, Vec<Campaign>>,
        pub on_fetch_campaign_by_id: Handler<CampaignId, Option<Campaign>>,
        pub on_update_campaign: Handler<(CampaignId, CampaignUpdate), Option<Campaign>>,
        pub on_delete_campaign: Handler<CampaignId, Option<Campaign>>,
    }

    impl MockCampaignStore {
        pub fn new() -> MockCampaignStore {
            MockCampaignStore {
                on_insert_campaign: Box::new(|_| panic!("unexpected call to insert_campaign")),
                on_fetch_campaigns: Box::new(|_| panic!("unexpected call to fetch_campaigns")),
                on_fetch_campaign_by_id: Box::new(|_| {
                    panic!("unexpected call to fetch_campaign_by_id")
                }),
                on_update_campaign: Box::new(|_| panic!("unexpected call to update_campaign")),
                on_delete_campaign: Box::new(|_| panic!("unexpected call to delete_campaign")),
            }
        }

        /// A store that keeps campaigns in a shared vector, in insertion order.
        pub fn in_memory() -> MockCampaignStore {
            let campaigns: Arc<Mutex<Vec<Campaign>>> = Arc::default();

            let store = Arc::clone(&campaigns);
            let on_insert_campaign: Handler<NewCampaign, Campaign> = Box::new(move |campaign| {
                let now = Utc::now();
                let campaign = Campaign {
                    id: CampaignId::new(),
                    title: campaign.title,
                    description: campaign.description,
                    status: campaign.status.unwrap_or_default(),
                    created_at: now,
                    updated_at: now,
                };
                store.lock().unwrap().push(campaign.clone());
                Ok(campaign)
            });

            let store = Arc::clone(&campaigns);
            let on_fetch_campaigns: Handler<Option<CampaignStatus>, Vec<Campaign>> =
                Box::new(move |status| {
                    Ok(store
                        .lock()
                        .unwrap()
                        .iter()
                        .filter(|campaign| status.map_or(true, |status| campaign.status == status))
                        .cloned()
                        .collect())
                });

            let store = Arc::clone(&campaigns);
            let on_fetch_campaign_by_id: Handler<CampaignId, Option<Campaign>> =
                Box::new(move |campaign_id| {
                    Ok(store
                        .lock()
                        .unwrap()
                        .iter()
                        .find(|campaign| campaign.id == campaign_id)
                        .cloned())
                });

            let store = Arc::clone(&campaigns);
            let on_update_campaign: Handler<(CampaignId, CampaignUpdate), Option<Campaign>> =
                Box::new(move |(campaign_id, update): (CampaignId, CampaignUpdate)| {
                    let mut store = store.lock().unwrap();
                    let campaign = store.iter_mut().find(|campaign| campaign.id == campaign_id);
                    Ok(campaign.map(|campaign| {
                        update.apply(campaign);
                        campaign.updated_at = Utc::now();
                        campaign.clone()
                    }))
                });

            let store = Arc::clone(&campaigns);
            let on_delete_campaign: Handler<CampaignId, Option<Campaign>> =
                Box::new(move |campaign_id| {
                    let mut store = store.lock().unwrap();
                    let index = store.iter().position(|campaign| campaign.id == campaign_id);
                    Ok(index.map(|index| store.remove(index)))
                });

            MockCampaignStore {
                on_insert_campaign,
                on_fetch_campaigns,
                on_fetch_campaign_by_id,
                on_update_campaign,
                on_delete_campaign,
            }
        }
    }

    #[async_trait]
    impl CampaignStore for MockCampaignStore {
        async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error> {
            (self.on_insert_campaign)(campaign)
        }

        async fn fetch_campaigns(
            &self,
            status: Option<CampaignStatus>,
        ) -> Result<Vec<Campaign>, Error> {
            (self.on_fetch_campaigns)(status)
        }

        async fn fetch_campaign_by_id(
            &self,
            campaign_id: CampaignId,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_fetch_campaign_by_id)(campaign_id)
        }

        async fn update_campaign(
            &self,
            campaign_id: CampaignId,
            update: CampaignUpdate,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_update_campaign)((campaign_id, update))
        }

        async fn delete_campaign(
            &self,
            campaign_id: CampaignId,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_delete_campaign)(campaign_id)
        }
    }

    pub struct MockDatabase {
        pub campaigns: MockCampaignStore,
    }

    impl MockDatabase {
        pub fn new() -> MockDatabase {
            MockDatabase {
                campaigns: MockCampaignStore::new(),
            }
        }

        pub fn in_memory() -> MockDatabase {
            MockDatabase {
                campaigns: MockCampaignStore::in_memory(),
            }
        }
    }

    impl Database for MockDatabase {
        fn campaigns(&self) -> &dyn CampaignStore {
            &self.campaigns
        }
    }
}
