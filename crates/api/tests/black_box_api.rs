use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use banksy_api::app::{build_router, services::AppServices};
use banksy_auth::{AuthClaims, Hs256Verifier, TokenVerifier};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        Self::spawn_with(Arc::new(AppServices::in_memory()), jwt_secret).await
    }

    async fn spawn_with(services: Arc<AppServices>, jwt_secret: &str) -> Self {
        let verifier: Arc<dyn TokenVerifier> =
            Arc::new(Hs256Verifier::new(jwt_secret.as_bytes()));
        let app = build_router(services, verifier, &[]);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api/v1", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, sub: &str) -> String {
    let now = Utc::now();
    let claims = AuthClaims {
        sub: sub.to_string(),
        email: Some(format!("{sub}@example.com")),
        first_name: Some("Test".to_string()),
        last_name: None,
        iat: (now - ChronoDuration::minutes(1)).timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn create_account(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
) -> i64 {
    let res = client
        .post(format!("{base_url}/accounts"))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn transfer(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    sender: i64,
    recipient: i64,
    amount: i64,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/money-transfers"))
        .bearer_auth(token)
        .json(&json!({
            "sender_account_id": sender,
            "recipient_account_id": recipient,
            "amount": amount,
        }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn auth_is_required_for_protected_endpoints() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/me", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Missing bearer token");

    // A token signed with a different secret is rejected too.
    let bad = mint_jwt("other-secret", "user_x");
    let res = client
        .get(format!("{}/me", srv.base_url))
        .bearer_auth(bad)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_upserts_on_first_seen_and_keeps_profile_fresh() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let token = mint_jwt(jwt_secret, "user_ada");
    let res = client
        .get(format!("{}/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["subject"], "user_ada");
    assert_eq!(me["email"], "user_ada@example.com");
    let first_id = me["id"].as_i64().unwrap();

    // Same subject again resolves to the same record.
    let token2 = mint_jwt(jwt_secret, "user_ada");
    let res = client
        .get(format!("{}/me", srv.base_url))
        .bearer_auth(&token2)
        .send()
        .await
        .unwrap();
    let me2: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me2["id"].as_i64().unwrap(), first_id);
}

#[tokio::test]
async fn account_lifecycle_create_list_get() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    // Currency defaults to USD and is normalized to uppercase.
    let res = client
        .post(format!("{}/accounts", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Checking", "currency": "usd" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["currency"], "USD");
    let id = created["id"].as_i64().unwrap();

    let res = client
        .get(format!("{}/accounts", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/accounts/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Another user gets the same 404 as for a nonexistent id.
    let other = mint_jwt(jwt_secret, "user_b");
    let res = client
        .get(format!("{}/accounts/{}", srv.base_url, id))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Account not found");
}

#[tokio::test]
async fn transfer_creates_exactly_one_debit_and_one_credit() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let sender = create_account(&client, &srv.base_url, &token, "checking").await;
    let recipient = create_account(&client, &srv.base_url, &token, "savings").await;

    let res = transfer(&client, &srv.base_url, &token, sender, recipient, 500).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    let transfer_id = body["transfer_id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/money-transfers/{}", srv.base_url, transfer_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let entries: serde_json::Value = res.json().await.unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Both legs carry the positive magnitude; the sign lives in `type`.
    assert_eq!(entries[0]["type"], "DEBIT");
    assert_eq!(entries[0]["account_id"].as_i64().unwrap(), sender);
    assert_eq!(entries[0]["amount"].as_i64().unwrap(), 500);
    assert_eq!(entries[1]["type"], "CREDIT");
    assert_eq!(entries[1]["account_id"].as_i64().unwrap(), recipient);
    assert_eq!(entries[1]["amount"].as_i64().unwrap(), 500);
}

#[tokio::test]
async fn transfer_may_target_another_users_account() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let alice = mint_jwt(jwt_secret, "user_alice");
    let bob = mint_jwt(jwt_secret, "user_bob");

    let alice_acct = create_account(&client, &srv.base_url, &alice, "alice").await;
    let bob_acct = create_account(&client, &srv.base_url, &bob, "bob").await;

    let res = transfer(&client, &srv.base_url, &alice, alice_acct, bob_acct, 250).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let transfer_id = body["transfer_id"].as_str().unwrap().to_string();

    // Each side sees only its own leg.
    let res = client
        .get(format!("{}/money-transfers/{}", srv.base_url, transfer_id))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    let entries: serde_json::Value = res.json().await.unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "CREDIT");

    // A third user sees nothing at all.
    let carol = mint_jwt(jwt_secret, "user_carol");
    let res = client
        .get(format!("{}/money-transfers/{}", srv.base_url, transfer_id))
        .bearer_auth(&carol)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Transfer not found");
}

#[tokio::test]
async fn invalid_amounts_are_rejected_before_any_write() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let sender = create_account(&client, &srv.base_url, &token, "checking").await;
    let recipient = create_account(&client, &srv.base_url, &token, "savings").await;

    for amount in [0, -10] {
        let res = transfer(&client, &srv.base_url, &token, sender, recipient, amount).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    // No ledger rows were created.
    let res = client
        .get(format!("{}/transactions?account_id={}", srv.base_url, sender))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let entries: serde_json::Value = res.json().await.unwrap();
    assert!(entries.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unowned_or_missing_sender_is_the_same_not_found() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let alice = mint_jwt(jwt_secret, "user_alice");
    let bob = mint_jwt(jwt_secret, "user_bob");

    let alice_acct = create_account(&client, &srv.base_url, &alice, "alice").await;
    let bob_acct = create_account(&client, &srv.base_url, &bob, "bob").await;

    // Bob tries to send from Alice's account.
    let res = transfer(&client, &srv.base_url, &bob, alice_acct, bob_acct, 100).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let owned_elsewhere: serde_json::Value = res.json().await.unwrap();

    // Bob tries to send from an account that does not exist.
    let res = transfer(&client, &srv.base_url, &bob, 9_999, bob_acct, 100).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let nonexistent: serde_json::Value = res.json().await.unwrap();

    // Indistinguishable responses; no account enumeration.
    assert_eq!(owned_elsewhere, nonexistent);
    assert_eq!(nonexistent["detail"], "Sender account not found");
}

#[tokio::test]
async fn missing_recipient_is_not_found() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let sender = create_account(&client, &srv.base_url, &token, "checking").await;

    let res = transfer(&client, &srv.base_url, &token, sender, 9_999, 100).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Recipient account not found");
}

#[tokio::test]
async fn unparseable_transfer_id_is_not_found() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let res = client
        .get(format!("{}/money-transfers/not-a-uuid", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn statements_reflect_ledger_activity() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let checking = create_account(&client, &srv.base_url, &token, "checking").await;
    let savings = create_account(&client, &srv.base_url, &token, "savings").await;
    // A third account with no activity still gets a statement.
    let idle = create_account(&client, &srv.base_url, &token, "idle").await;

    let res = transfer(&client, &srv.base_url, &token, checking, savings, 500).await;
    assert_eq!(res.status(), StatusCode::OK);

    let today = Utc::now().date_naive();
    let res = client
        .post(format!("{}/statements", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "start_date": (today - ChronoDuration::days(1)).to_string(),
            "end_date": (today + ChronoDuration::days(1)).to_string(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let statements: serde_json::Value = res.json().await.unwrap();
    let statements = statements.as_array().unwrap();
    assert_eq!(statements.len(), 3);

    let by_account = |id: i64| {
        statements
            .iter()
            .find(|s| s["account_id"].as_i64().unwrap() == id)
            .unwrap()
    };

    let checking_stmt = by_account(checking);
    assert_eq!(checking_stmt["balance"].as_i64().unwrap(), -500);
    assert_eq!(checking_stmt["transactions"][0]["type"], "DEBIT");
    // The reported amount stays positive even on the debit side.
    assert_eq!(checking_stmt["transactions"][0]["amount"].as_i64().unwrap(), 500);

    assert_eq!(by_account(savings)["balance"].as_i64().unwrap(), 500);

    let idle_stmt = by_account(idle);
    assert_eq!(idle_stmt["balance"].as_i64().unwrap(), 0);
    assert!(idle_stmt["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn statements_require_at_least_one_account() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_broke");

    let today = Utc::now().date_naive();
    let res = client
        .post(format!("{}/statements", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "start_date": today.to_string(),
            "end_date": today.to_string(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "No accounts found for user");
}

#[tokio::test]
async fn relay_account_nets_to_zero() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let alice = mint_jwt(jwt_secret, "user_alice");
    let bob = mint_jwt(jwt_secret, "user_bob");
    let carol = mint_jwt(jwt_secret, "user_carol");

    let a = create_account(&client, &srv.base_url, &alice, "a").await;
    let b = create_account(&client, &srv.base_url, &bob, "b").await;
    let c = create_account(&client, &srv.base_url, &carol, "c").await;

    assert_eq!(
        transfer(&client, &srv.base_url, &alice, a, b, 100).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        transfer(&client, &srv.base_url, &bob, b, c, 100).await.status(),
        StatusCode::OK
    );

    let today = Utc::now().date_naive();
    let res = client
        .post(format!("{}/statements", srv.base_url))
        .bearer_auth(&bob)
        .json(&json!({
            "start_date": (today - ChronoDuration::days(1)).to_string(),
            "end_date": (today + ChronoDuration::days(1)).to_string(),
        }))
        .send()
        .await
        .unwrap();
    let statements: serde_json::Value = res.json().await.unwrap();
    let stmt = &statements.as_array().unwrap()[0];

    assert_eq!(stmt["balance"].as_i64().unwrap(), 0);
    let txs = stmt["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0]["type"], "CREDIT");
    assert_eq!(txs[1]["type"], "DEBIT");
}

#[tokio::test]
async fn transactions_listing_is_newest_first_and_ownership_scoped() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let checking = create_account(&client, &srv.base_url, &token, "checking").await;
    let savings = create_account(&client, &srv.base_url, &token, "savings").await;

    transfer(&client, &srv.base_url, &token, checking, savings, 100).await;
    transfer(&client, &srv.base_url, &token, checking, savings, 200).await;

    let res = client
        .get(format!("{}/transactions?account_id={}", srv.base_url, checking))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let entries: serde_json::Value = res.json().await.unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["amount"].as_i64().unwrap(), 200);
    assert_eq!(entries[1]["amount"].as_i64().unwrap(), 100);

    // Someone else's account id behaves like a nonexistent one.
    let other = mint_jwt(jwt_secret, "user_b");
    let res = client
        .get(format!("{}/transactions?account_id={}", srv.base_url, checking))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cards_create_ship_and_list() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let account = create_account(&client, &srv.base_url, &token, "checking").await;

    let res = client
        .post(format!("{}/cards", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "account_id": account,
            "card_number_last4": "4242",
            "card_type": "Debit",
            "expiration_month": 12,
            "expiration_year": 2030,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let card: serde_json::Value = res.json().await.unwrap();
    assert_eq!(card["status"], "Active");

    let res = client
        .post(format!("{}/cards/ship/{}", srv.base_url, account))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let shipped: serde_json::Value = res.json().await.unwrap();
    assert_eq!(shipped["card_type"], "Credit");
    assert_eq!(shipped["card_number_last4"].as_str().unwrap().len(), 4);

    let res = client
        .get(format!("{}/cards", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let cards: serde_json::Value = res.json().await.unwrap();
    assert_eq!(cards.as_array().unwrap().len(), 2);

    // Shipping against someone else's account is a plain 404.
    let other = mint_jwt(jwt_secret, "user_b");
    let res = client
        .post(format!("{}/cards/ship/{}", srv.base_url, account))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn account_holders_create_and_list() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    // Resolve the caller's own user id through /me.
    let me: serde_json::Value = client
        .get(format!("{}/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let user_id = me["id"].as_i64().unwrap();

    let account = create_account(&client, &srv.base_url, &token, "joint").await;

    let res = client
        .post(format!("{}/account-holders", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "user_id": user_id,
            "account_id": account,
            "holder_type": "Primary",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/account-holders", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let holders: serde_json::Value = res.json().await.unwrap();
    assert_eq!(holders.as_array().unwrap().len(), 1);
    assert_eq!(holders[0]["holder_type"], "Primary");
}

#[tokio::test]
async fn admin_introspection_lists_backend_and_users() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let res = client
        .get(format!("{}/admin/dbinfo", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let info: serde_json::Value = res.json().await.unwrap();
    assert_eq!(info["backend"], "in-memory");
    assert!(info["tables"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "transactions"));

    let res = client
        .get(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let users: serde_json::Value = res.json().await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["subject"], "user_a");
}

#[tokio::test]
async fn error_log_starts_empty() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let res = client
        .get(format!("{}/errors", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let logs: serde_json::Value = res.json().await.unwrap();
    assert!(logs.as_array().unwrap().is_empty());
}

/// Account directory that always fails, for exercising the 500 path.
struct DownedDirectory;

#[async_trait::async_trait]
impl banksy_infra::AccountDirectory for DownedDirectory {
    async fn create_account(
        &self,
        _new: banksy_accounts::NewAccount,
    ) -> Result<banksy_accounts::Account, banksy_infra::StoreError> {
        Err(banksy_infra::StoreError::Backend("accounts offline".into()))
    }

    async fn account(
        &self,
        _id: banksy_core::AccountId,
    ) -> Result<Option<banksy_accounts::Account>, banksy_infra::StoreError> {
        Err(banksy_infra::StoreError::Backend("accounts offline".into()))
    }

    async fn account_owned_by(
        &self,
        _id: banksy_core::AccountId,
        _owner: banksy_core::UserId,
    ) -> Result<Option<banksy_accounts::Account>, banksy_infra::StoreError> {
        Err(banksy_infra::StoreError::Backend("accounts offline".into()))
    }

    async fn accounts_for_user(
        &self,
        _owner: banksy_core::UserId,
    ) -> Result<Vec<banksy_accounts::Account>, banksy_infra::StoreError> {
        Err(banksy_infra::StoreError::Backend("accounts offline".into()))
    }
}

/// User store that always fails, so even the auth upsert blows up.
struct DownedUsers;

#[async_trait::async_trait]
impl banksy_infra::UserStore for DownedUsers {
    async fn upsert_by_subject(
        &self,
        _new: banksy_accounts::NewUser,
    ) -> Result<banksy_accounts::User, banksy_infra::StoreError> {
        Err(banksy_infra::StoreError::Backend("users offline".into()))
    }

    async fn user(
        &self,
        _id: banksy_core::UserId,
    ) -> Result<Option<banksy_accounts::User>, banksy_infra::StoreError> {
        Err(banksy_infra::StoreError::Backend("users offline".into()))
    }

    async fn all_users(
        &self,
    ) -> Result<Vec<banksy_accounts::User>, banksy_infra::StoreError> {
        Err(banksy_infra::StoreError::Backend("users offline".into()))
    }
}

#[tokio::test]
async fn handler_failures_are_logged_with_the_acting_user() {
    let jwt_secret = "test-secret";
    let mut services = AppServices::in_memory();
    services.accounts = Arc::new(DownedDirectory);
    let services = Arc::new(services);
    let srv = TestServer::spawn_with(services.clone(), jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    // Users store still works, so /me resolves the caller.
    let res = client
        .get(format!("{}/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    let user_id = me["id"].as_i64().unwrap();

    let res = client
        .get(format!("{}/accounts", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "An internal error occurred. It has been logged.");

    let logs = services.recent_errors().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, Some(banksy_core::UserId::new(user_id)));
    assert_eq!(logs[0].error_code, Some(500));
    assert!(logs[0].message.contains("accounts offline"));
    let location = logs[0].location.as_deref().unwrap();
    assert!(location.starts_with("GET "));
    assert!(location.contains("/accounts"));
}

#[tokio::test]
async fn failures_inside_auth_are_logged_too() {
    let jwt_secret = "test-secret";
    let mut services = AppServices::in_memory();
    services.users = Arc::new(DownedUsers);
    let services = Arc::new(services);
    let srv = TestServer::spawn_with(services.clone(), jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "user_a");

    let res = client
        .get(format!("{}/accounts", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "An internal error occurred. It has been logged.");

    // The upsert never completed, so no user to attribute; the row still lands.
    let logs = services.recent_errors().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, None);
    assert!(logs[0].message.contains("users offline"));
}
