//! API integration tests against a running server with the bootstrap admin

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "change-me-now"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_micros())
}

/// Create a set of `count` kennels and return their ids
async fn create_set(client: &Client, token: &str, set_name: &str, count: i32) -> Vec<i64> {
    let response = client
        .post(format!("{}/kennels/sets", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "set_name": set_name, "count": count }))
        .send()
        .await
        .expect("Failed to create set");
    assert_eq!(response.status(), StatusCode::CREATED);

    let kennels: Value = response.json().await.expect("Failed to parse kennels");
    kennels
        .as_array()
        .expect("Expected array")
        .iter()
        .filter_map(|k| k["id"].as_i64())
        .collect()
}

/// Create a one-kennel set and return the kennel id
async fn create_single_kennel(client: &Client, token: &str) -> i64 {
    create_set(client, token, &unique_name("it"), 1).await[0]
}

async fn get_kennel(client: &Client, token: &str, id: i64) -> Value {
    client
        .get(format!("{}/kennels/{}", BASE_URL, id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get kennel")
        .json()
        .await
        .expect("Failed to parse kennel")
}

async fn kennel_status(client: &Client, token: &str, id: i64) -> String {
    let kennel = get_kennel(client, token, id).await;
    kennel["status"].as_str().unwrap_or_default().to_string()
}

async fn reassign(client: &Client, token: &str, reservation_id: i64, from: i64, to: i64) -> reqwest::Response {
    client
        .put(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .bearer_auth(token)
        .json(&json!({
            "reassign_kennel": { "from_kennel_id": from, "to_kennel_id": to }
        }))
        .send()
        .await
        .expect("Failed to send request")
}

async fn create_reservation(client: &Client, token: &str, kennel_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/reservations", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "customer": { "name": "Integration Owner", "phone": "5550100" },
            "pet_name": "Bruno",
            "pet_breed": "Beagle",
            "start_date": "2024-01-01",
            "end_date": "2024-01-03",
            "kennel_ids": [kennel_id],
            "groom": true
        }))
        .send()
        .await
        .expect("Failed to create reservation")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/kennels", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_set_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let name = unique_name("dup");

    let first = client
        .post(format!("{}/kennels/sets", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "set_name": name, "count": 3 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let kennels: Value = first.json().await.expect("Failed to parse response");
    let numbers: Vec<i64> = kennels
        .as_array()
        .expect("Expected array")
        .iter()
        .filter_map(|k| k["kennel_number"].as_i64())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let second = client
        .post(format!("{}/kennels/sets", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "set_name": name, "count": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_reservation_lifecycle_to_checkout() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let kennel_id = create_single_kennel(&client, &token).await;

    let response = create_reservation(&client, &token, kennel_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let reservation: Value = response.json().await.expect("Failed to parse reservation");
    let id = reservation["id"].as_i64().expect("No reservation id");
    assert_eq!(reservation["status"], "reserved");
    assert_eq!(kennel_status(&client, &token, kennel_id).await, "reserved");

    // Same kennel cannot be booked twice
    let clash = create_reservation(&client, &token, kennel_id).await;
    assert_eq!(clash.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Checkout before check-in is refused
    let early = client
        .post(format!("{}/reservations/{}/checkout", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(early.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let checkin = client
        .post(format!("{}/reservations/{}/checkin", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(checkin.status().is_success());
    assert_eq!(kennel_status(&client, &token, kennel_id).await, "occupied");

    let feeding = client
        .post(format!("{}/feeding", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "feeding_date": "2024-01-02",
            "feeding_time": "morning",
            "fed_kennel_ids": [kennel_id],
            "eaten_kennel_ids": [kennel_id]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(feeding.status().is_success());

    let quote: Value = client
        .get(format!("{}/reservations/{}/bill-quote", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse quote");
    assert_eq!(quote["days_stayed"], 3);

    let bill: Value = client
        .post(format!("{}/reservations/{}/checkout", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "per_day_bill": "500" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse bill");
    assert_eq!(bill["days_stayed"], 3);
    let total: Option<f64> = bill["total_bill"].as_str().and_then(|t| t.parse().ok());
    assert_eq!(total, Some(1500.0));
    assert_eq!(kennel_status(&client, &token, kennel_id).await, "available");

    let history: Value = client
        .get(format!("{}/feeding/history?kennel_id={}", BASE_URL, kennel_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse history");
    assert_eq!(history.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_cancel_frees_kennel_and_archives() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let kennel_id = create_single_kennel(&client, &token).await;

    let reservation: Value = create_reservation(&client, &token, kennel_id)
        .await
        .json()
        .await
        .expect("Failed to parse reservation");
    let id = reservation["id"].as_i64().expect("No reservation id");

    let archived: Value = client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse archive");
    assert_eq!(archived["original_reservation_id"], id);
    assert_eq!(archived["status"], "canceled");
    assert_eq!(kennel_status(&client, &token, kennel_id).await, "available");

    let gone = client
        .get(format!("{}/reservations/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_reassigned_kennel_takes_over_status() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let ids = create_set(&client, &token, &unique_name("swap"), 3).await;
    let (first, second, third) = (ids[0], ids[1], ids[2]);

    let reservation: Value = create_reservation(&client, &token, first)
        .await
        .json()
        .await
        .expect("Failed to parse reservation");
    let id = reservation["id"].as_i64().expect("No reservation id");

    let moved = reassign(&client, &token, id, first, second).await;
    assert!(moved.status().is_success());
    assert_eq!(kennel_status(&client, &token, first).await, "available");
    assert_eq!(kennel_status(&client, &token, second).await, "reserved");

    let details: Value = client
        .get(format!("{}/reservations/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse reservation");
    assert_eq!(details["kennel_ids"], json!([second]));

    let checkin = client
        .post(format!("{}/reservations/{}/checkin", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(checkin.status().is_success());

    let moved = reassign(&client, &token, id, second, third).await;
    assert!(moved.status().is_success());
    assert_eq!(kennel_status(&client, &token, second).await, "available");
    assert_eq!(kennel_status(&client, &token, third).await, "occupied");

    // Target must be free
    let other = create_single_kennel(&client, &token).await;
    let blocker: Value = create_reservation(&client, &token, other)
        .await
        .json()
        .await
        .expect("Failed to parse reservation");
    assert!(blocker["id"].is_i64());
    let refused = reassign(&client, &token, id, third, other).await;
    assert_eq!(refused.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(kennel_status(&client, &token, third).await, "occupied");
}

#[tokio::test]
#[ignore]
async fn test_blank_pet_name_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let kennel_id = create_single_kennel(&client, &token).await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "customer": { "name": "Integration Owner" },
            "pet_name": "   ",
            "start_date": "2024-01-01",
            "end_date": "2024-01-03",
            "kennel_ids": [kennel_id]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(kennel_status(&client, &token, kennel_id).await, "available");

    let reservation: Value = create_reservation(&client, &token, kennel_id)
        .await
        .json()
        .await
        .expect("Failed to parse reservation");
    let id = reservation["id"].as_i64().expect("No reservation id");

    let rename = client
        .put(format!("{}/reservations/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "pet_name": " " }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(rename.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_removed_kennels_go_to_maintenance() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let name = unique_name("trim");
    let ids = create_set(&client, &token, &name, 2).await;
    let (spare, booked) = (ids[0], ids[1]);

    let response = client
        .put(format!("{}/kennels/sets/{}", BASE_URL, name))
        .bearer_auth(&token)
        .json(&json!({ "remove_kennel_ids": [spare] }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let set: Value = response.json().await.expect("Failed to parse set");
    assert_eq!(set["total"], 1);

    let retired = get_kennel(&client, &token, spare).await;
    assert_eq!(retired["set_name"], "Maintenance");
    assert_eq!(retired["status"], "maintenance");

    let reservation = create_reservation(&client, &token, booked).await;
    assert_eq!(reservation.status(), StatusCode::CREATED);

    let engaged = client
        .put(format!("{}/kennels/sets/{}", BASE_URL, name))
        .bearer_auth(&token)
        .json(&json!({ "remove_kennel_ids": [booked] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(engaged.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(get_kennel(&client, &token, booked).await["set_name"], name.as_str());

    let reserved_name = client
        .put(format!("{}/kennels/sets/Maintenance", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "add_kennel_ids": [spare] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(reserved_name.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_extend_set_continues_numbering() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let name = unique_name("grow");
    create_set(&client, &token, &name, 12).await;

    let response = client
        .post(format!("{}/kennels/sets/{}/kennels", BASE_URL, name))
        .bearer_auth(&token)
        .json(&json!({ "count": 3 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let kennels: Value = response.json().await.expect("Failed to parse kennels");
    let numbers: Vec<i64> = kennels
        .as_array()
        .expect("Expected array")
        .iter()
        .filter_map(|k| k["kennel_number"].as_i64())
        .collect();
    assert_eq!(numbers, vec![13, 14, 15]);
}

#[tokio::test]
#[ignore]
async fn test_finished_stay_cannot_be_moved_on_calendar() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let kennel_id = create_single_kennel(&client, &token).await;

    let reservation: Value = create_reservation(&client, &token, kennel_id)
        .await
        .json()
        .await
        .expect("Failed to parse reservation");
    let id = reservation["id"].as_i64().expect("No reservation id");

    let live_move = client
        .patch(format!("{}/calendar/events/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "start_date": "2024-01-02", "end_date": "2024-01-04" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(live_move.status().is_success());

    for action in ["checkin", "checkout"] {
        let response = client
            .post(format!("{}/reservations/{}/{}", BASE_URL, id, action))
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }

    let response = client
        .patch(format!("{}/calendar/events/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "start_date": "2024-02-01", "end_date": "2024-02-02" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
