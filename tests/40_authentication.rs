mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn registration(user_name: &str, password: &str) -> Value {
    json!({
        "firstName": "Test",
        "lastName": "User",
        "userName": user_name,
        "password": password,
        "email": format!("{}@example.com", user_name),
        "phoneNumber": "555-0100",
        "roles": ["Manager"]
    })
}

async fn register(server: &common::TestServer, user_name: &str) -> Result<()> {
    let res = server
        .anonymous()
        .post(server.url("/api/authentication"))
        .json(&registration(user_name, "Password1000"))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
    Ok(())
}

async fn login(server: &common::TestServer, user_name: &str, password: &str) -> Result<reqwest::Response> {
    Ok(server
        .anonymous()
        .post(server.url("/api/authentication/login"))
        .json(&json!({ "userName": user_name, "password": password }))
        .send()
        .await?)
}

fn token_pair(body: &Value) -> Result<(String, String)> {
    let access = body["data"]["accessToken"].as_str().context("no accessToken")?;
    let refresh = body["data"]["refreshToken"].as_str().context("no refreshToken")?;
    Ok((access.to_string(), refresh.to_string()))
}

#[tokio::test]
async fn registered_user_logs_in_and_reaches_the_api() -> Result<()> {
    let server = common::ensure_server();
    register(server, "mara").await?;

    let res = login(server, "mara", "Password1000").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let (access, _) = token_pair(&res.json().await?)?;

    let res = server.anonymous().get(server.url("/api/companies")).bearer_auth(&access).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = login(server, "mara", "Password2000").await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Authentication failed. Wrong user name or password.");
    Ok(())
}

#[tokio::test]
async fn registration_rules_answer_400() -> Result<()> {
    let server = common::ensure_server();
    register(server, "otto").await?;

    let res = server
        .anonymous()
        .post(server.url("/api/authentication"))
        .json(&registration("OTTO", "Password1000"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["field_errors"]["DuplicateUserName"], "Username 'OTTO' is already taken.");

    let res = server
        .anonymous()
        .post(server.url("/api/authentication"))
        .json(&registration("weakling", "short"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["PasswordTooShort"].is_string());
    assert!(body["field_errors"]["PasswordRequiresDigit"].is_string());

    let res = server.anonymous().post(server.url("/api/authentication")).json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn refresh_rotates_the_pair() -> Result<()> {
    let server = common::ensure_server();
    register(server, "lena").await?;
    let first = token_pair(&login(server, "lena", "Password1000").await?.json().await?)?;

    let refresh = |access: &str, refresh: &str| {
        server
            .anonymous()
            .post(server.url("/api/token/refresh"))
            .json(&json!({ "accessToken": access, "refreshToken": refresh }))
            .send()
    };

    let res = refresh(&first.0, &first.1).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let second = token_pair(&res.json().await?)?;
    assert_ne!(second.1, first.1);

    // replaced refresh tokens are refused
    let res = refresh(&first.0, &first.1).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Invalid client request. 'tokenDto' has some invalid values.");

    let res = refresh("not-a-jwt", &second.1).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = refresh(&second.0, &second.1).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
