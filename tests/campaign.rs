use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::web::Data;
use campaign_server::database::{Database, MongoDatabase};
use campaign_server::{app, CampaignBody, CampaignStatus};
use mongodb::Client;
use serde_json::{json, Value};

async fn connect(name: &str) -> MongoDatabase {
    let uri =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = Client::with_uri_str(&uri).await.unwrap();
    let db = MongoDatabase::initialize(client.database(name)).await.unwrap();
    db.drop().await.unwrap();
    MongoDatabase::initialize(client.database(name)).await.unwrap()
}

#[actix_web::test]
#[ignore = "requires a running mongodb instance"]
async fn campaign_lifecycle() {
    let db = connect("campaign_server_lifecycle").await;
    let app = test::init_service(app(Data::new(
        Box::new(db.clone()) as Box<dyn Database>
    )))
    .await;

    let request = TestRequest::post()
        .uri("/campaign")
        .set_json(json!({ "title": "Launch", "description": "Q1 push" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(response).await;
    let campaign: CampaignBody = serde_json::from_value(created["data"].clone()).unwrap();
    assert_eq!(campaign.title, "Launch");
    assert_eq!(campaign.status, CampaignStatus::Active);

    let uri = format!("/campaign/{}", campaign.id);
    let request = TestRequest::get().uri(&uri).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(fetched["data"], created["data"]);

    let request = TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "status": "INACTIVE" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(updated["data"]["status"], "INACTIVE");
    assert_eq!(updated["data"]["title"], "Launch");

    let request = TestRequest::get()
        .uri("/campaign?status=active")
        .to_request();
    let active: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(active["data"], json!([]));

    let request = TestRequest::delete().uri(&uri).to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = TestRequest::delete().uri(&uri).to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    db.drop().await.unwrap();
}
