mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use devconnect_api::store;

#[tokio::test]
async fn profile_upsert_is_keyed_by_user() -> Result<()> {
    if !common::store_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let user_id = common::seed_user("Profile Owner").await?;
    let token = common::token_for(user_id);

    // No profile yet
    let res = client
        .get(format!("{}/api/profile/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["msg"], "There is no profile for this user");

    // Create
    let res = client
        .post(format!("{}/api/profile", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "status": "Developer",
            "skills": "Rust, SQL ,HTTP",
            "website": "https://example.com",
            "twitter": "https://twitter.com/owner"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile = res.json::<Value>().await?;
    assert_eq!(profile["skills"], json!(["Rust", "SQL", "HTTP"]));
    assert_eq!(profile["social"]["twitter"], "https://twitter.com/owner");

    // Update: same user keeps a single document
    let res = client
        .post(format!("{}/api/profile", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "status": "Senior Developer", "skills": "Rust" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["status"], "Senior Developer");
    assert_eq!(updated["id"], profile["id"]);
    // Optional scalar provided earlier is preserved; social is rebuilt
    assert_eq!(updated["website"], "https://example.com");
    assert_eq!(updated["social"]["twitter"], Value::Null);

    let docs = store::profiles().await?.find_many(json!({ "user": user_id })).await?;
    assert_eq!(docs.len(), 1);

    // Join: the user ref is replaced by display fields
    let res = client
        .get(format!("{}/api/profile/user/{}", server.base_url, user_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let joined = res.json::<Value>().await?;
    assert_eq!(joined["user"]["name"], "Profile Owner");
    assert!(joined["user"].get("password").is_none());

    // Missing required fields
    let res = client
        .post(format!("{}/api/profile", server.base_url))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["errors"].as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn experience_and_education_entries() -> Result<()> {
    if !common::store_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::token_for(common::seed_user("Career Haver").await?);

    client
        .post(format!("{}/api/profile", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "status": "Developer", "skills": "Rust" }))
        .send()
        .await?;

    // Validation collects every missing field
    let res = client
        .put(format!("{}/api/profile/experience", server.base_url))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["errors"].as_array().unwrap().len(), 3);

    // Add, then remove by entry id
    let res = client
        .put(format!("{}/api/profile/experience", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Engineer",
            "company": "Acme",
            "from": "2020-01-01",
            "current": true
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile = res.json::<Value>().await?;
    let entries = profile["experience"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    let exp_id = entries[0]["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/api/profile/experience/{}", server.base_url, exp_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["experience"], json!([]));

    // Removing an unknown entry id is surfaced, not silently ignored
    let res = client
        .delete(format!("{}/api/profile/experience/{}", server.base_url, exp_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["msg"], "Experience entry not found");

    // Education mirrors experience
    let res = client
        .put(format!("{}/api/profile/education", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "school": "MIT",
            "degree": "BSc",
            "fieldofstudy": "CS",
            "from": "2014-09-01"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile = res.json::<Value>().await?;
    let edu_id = profile["education"][0]["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/api/profile/education/{}", server.base_url, edu_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["education"], json!([]));

    Ok(())
}

#[tokio::test]
async fn account_deletion_cascades() -> Result<()> {
    if !common::store_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let user_id = common::seed_user("Departing User").await?;
    let token = common::token_for(user_id);

    client
        .post(format!("{}/api/profile", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "status": "Developer", "skills": "Rust" }))
        .send()
        .await?;
    client
        .post(format!("{}/api/posts", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "text": "goodbye" }))
        .send()
        .await?;

    let res = client
        .delete(format!("{}/api/profile", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["msg"], "User deleted");

    // User, profile, and posts are all gone
    assert!(store::users().await?.find_by_id(user_id).await?.is_none());
    assert!(store::profiles()
        .await?
        .find_one(json!({ "user": user_id }))
        .await?
        .is_none());
    assert!(store::posts().await?.find_many(json!({ "user": user_id })).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn malformed_user_id_reads_as_profile_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/profile/user/not-a-uuid", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["msg"], "Profile not found");
    Ok(())
}
