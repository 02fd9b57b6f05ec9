mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn pagination(res: &reqwest::Response) -> Result<Value> {
    let raw = res.headers().get("x-pagination").context("missing X-Pagination header")?;
    Ok(serde_json::from_str(raw.to_str()?)?)
}

#[tokio::test]
async fn lists_seeded_employees_with_pagination_header() -> Result<()> {
    let server = common::ensure_server();

    let res = server.get(&format!("/api/companies/{}/employees", common::IT_SOLUTIONS)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let meta = pagination(&res)?;
    assert_eq!(
        meta,
        json!({
            "CurrentPage": 1,
            "TotalPages": 1,
            "PageSize": 10,
            "TotalCount": 2,
            "HasPrevious": false,
            "HasNext": false
        })
    );

    let body = res.json::<Value>().await?;
    let names: Vec<&str> = body["data"].as_array().context("data is not an array")?
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Jana McLeaf", "Sam Raiden"]);

    Ok(())
}

#[tokio::test]
async fn second_page_of_twenty_five() -> Result<()> {
    let server = common::ensure_server();
    let id = common::create_company_with_workers(server, "Paging Corp", 25).await?;

    let res = server
        .get(&format!("/api/companies/{}/employees?pageNumber=2&pageSize=10", id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let meta = pagination(&res)?;
    assert_eq!(meta["CurrentPage"], 2);
    assert_eq!(meta["TotalPages"], 3);
    assert_eq!(meta["TotalCount"], 25);
    assert_eq!(meta["HasPrevious"], true);
    assert_eq!(meta["HasNext"], true);

    let body = res.json::<Value>().await?;
    let data = body["data"].as_array().context("data is not an array")?;
    assert_eq!(data.len(), 10);
    assert_eq!(data[0]["name"], "Worker 10");
    assert_eq!(data[9]["name"], "Worker 19");

    // past the end: empty page, metadata still describes the whole set
    let res = server
        .get(&format!("/api/companies/{}/employees?pageNumber=9&pageSize=10", id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(pagination(&res)?["TotalCount"], 25);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"], json!([]));

    Ok(())
}

#[tokio::test]
async fn page_size_is_capped() -> Result<()> {
    let server = common::ensure_server();
    let id = common::create_company_with_workers(server, "Big Corp", 60).await?;

    let res = server
        .get(&format!("/api/companies/{}/employees?pageSize=500", id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let meta = pagination(&res)?;
    assert_eq!(meta["PageSize"], 50);
    assert_eq!(meta["TotalPages"], 2);

    Ok(())
}

#[tokio::test]
async fn pages_concatenate_to_the_sorted_set() -> Result<()> {
    let server = common::ensure_server();
    let id = common::create_company_with_workers(server, "Concat Corp", 23).await?;

    let mut seen = Vec::new();
    for page in 1..=3 {
        let res = server
            .get(&format!("/api/companies/{}/employees?orderBy=age desc&fields=id&pageNumber={}&pageSize=8", id, page))
            .send()
            .await?;
        let body = res.json::<Value>().await?;
        for record in body["data"].as_array().context("data is not an array")? {
            seen.push(record["id"].as_str().context("missing id")?.to_string());
        }
    }

    let all = server
        .get(&format!("/api/companies/{}/employees?orderBy=age desc&fields=id&pageSize=50", id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let expected: Vec<String> = all["data"]
        .as_array()
        .context("data is not an array")?
        .iter()
        .filter_map(|r| r["id"].as_str().map(str::to_string))
        .collect();
    assert_eq!(seen.len(), 23);
    assert_eq!(seen, expected);

    Ok(())
}

#[tokio::test]
async fn age_range_and_search_filter() -> Result<()> {
    let server = common::ensure_server();
    let base = format!("/api/companies/{}/employees", common::IT_SOLUTIONS);

    let res = server.get(&format!("{}?minAge=27&maxAge=30", base)).send().await?;
    assert_eq!(pagination(&res)?["TotalCount"], 1);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"][0]["name"], "Jana McLeaf");

    let res = server.get(&format!("{}?searchTerm=%20RAID%20", base)).send().await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["name"], "Sam Raiden");

    let res = server.get(&format!("{}?minAge=40&maxAge=20", base)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().get("x-pagination").is_none());
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Max age can't be less than min age.");

    Ok(())
}

#[tokio::test]
async fn order_by_and_fields() -> Result<()> {
    let server = common::ensure_server();
    let base = format!("/api/companies/{}/employees", common::IT_SOLUTIONS);

    let body = server
        .get(&format!("{}?orderBy=age desc,name&fields=name,AGE,unknown", base))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(
        body["data"],
        json!([
            { "name": "Jana McLeaf", "age": 30 },
            { "name": "Sam Raiden", "age": 26 }
        ])
    );

    // unusable ordering falls back to name
    let body = server
        .get(&format!("{}?orderBy=salary desc&fields=name", base))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"], json!([{ "name": "Jana McLeaf" }, { "name": "Sam Raiden" }]));

    Ok(())
}

#[tokio::test]
async fn bad_paging_arguments_are_400() -> Result<()> {
    let server = common::ensure_server();
    let base = format!("/api/companies/{}/employees", common::IT_SOLUTIONS);

    for query in ["pageNumber=0", "pageSize=0", "pageSize=-3", "minAge=abc"] {
        let res = server.get(&format!("{}?{}", base, query)).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {}", query);
    }

    Ok(())
}

#[tokio::test]
async fn unknown_company_is_404_even_with_bad_fields() -> Result<()> {
    let server = common::ensure_server();

    let res = server
        .get("/api/companies/00000000-0000-0000-0000-0000000000ff/employees?fields=nope")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get("x-pagination").is_none());

    Ok(())
}

#[tokio::test]
async fn head_returns_pagination_without_body() -> Result<()> {
    let server = common::ensure_server();

    let res = server.head(&format!("/api/companies/{}/employees", common::ADMIN_SOLUTIONS)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(pagination(&res)?["TotalCount"], 1);
    assert!(res.bytes().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn employee_lifecycle() -> Result<()> {
    let server = common::ensure_server();
    let company = common::create_company_with_workers(server, "Lifecycle Ltd", 0).await?;
    let base = format!("/api/companies/{}/employees", company);

    let res = server
        .post(&base)
        .json(&json!({ "name": "Nora Quinn", "age": 41, "position": "Accountant" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()["location"].to_str()?.to_string();
    let created = res.json::<Value>().await?;
    let id = created["data"]["id"].as_str().context("missing id")?.to_string();
    assert_eq!(location, format!("{}/{}", base, id));

    let body = server.get(&format!("{}?fields=position", location)).send().await?.json::<Value>().await?;
    assert_eq!(body["data"], json!({ "position": "Accountant" }));

    let res = server
        .put(&location)
        .json(&json!({ "name": "Nora Quinn", "age": 42, "position": "Controller" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.put(&location).json(&json!({ "name": "Nora Quinn", "age": 17 })).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = server.get(&location).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["age"], 42);
    assert_eq!(body["data"]["position"], "Controller");

    // employee of another company is invisible
    let res = server
        .get(&format!("/api/companies/{}/employees/{}", common::IT_SOLUTIONS, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(server.delete(&location).send().await?.status(), StatusCode::NO_CONTENT);
    assert_eq!(server.get(&location).send().await?.status(), StatusCode::NOT_FOUND);

    Ok(())
}

async fn company_with(server: &common::TestServer, name: &str, employees: Value) -> Result<String> {
    let res = server
        .post("/api/companies")
        .json(&json!({ "name": name, "address": "2 Test Street", "country": "UK", "employees": employees }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    body["data"]["id"].as_str().map(str::to_string).context("created company has no id")
}

#[tokio::test]
async fn names_order_without_regard_to_case() -> Result<()> {
    let server = common::ensure_server();
    let id = company_with(
        server,
        "Casing Ltd",
        json!([
            { "name": "Zed Ace", "age": 30, "position": "Clerk" },
            { "name": "adam Smith", "age": 31, "position": "Clerk" },
            { "name": "Bob Jones", "age": 32, "position": "Clerk" }
        ]),
    )
    .await?;

    for query in ["", "?orderBy=name", "?orderBy=NAME%20asc"] {
        let body = server
            .get(&format!("/api/companies/{}/employees{}", id, query))
            .send()
            .await?
            .json::<Value>()
            .await?;
        let names: Vec<&str> = body["data"].as_array().context("data is not an array")?
            .iter()
            .filter_map(|e| e["name"].as_str())
            .collect();
        assert_eq!(names, vec!["adam Smith", "Bob Jones", "Zed Ace"], "query {:?}", query);
    }
    Ok(())
}

#[tokio::test]
async fn patch_applies_validates_and_rejects_null() -> Result<()> {
    let server = common::ensure_server();
    let id = company_with(server, "Patch Works", json!([{ "name": "Ira Vance", "age": 33, "position": "Analyst" }])).await?;
    let body = server.get(&format!("/api/companies/{}/employees", id)).send().await?.json::<Value>().await?;
    let employee_id = body["data"][0]["id"].as_str().context("employee has no id")?.to_string();
    let location = format!("/api/companies/{}/employees/{}", id, employee_id);

    let res = server
        .patch(&location)
        .json(&json!([{ "op": "replace", "path": "/age", "value": 34 }]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let body = server.get(&location).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["age"], 34);
    assert_eq!(body["data"]["name"], "Ira Vance");

    let res = server.patch(&location).json(&json!([{ "op": "remove", "path": "/position" }])).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["position"].is_string());

    let res = server.patch(&location).json(&Value::Null).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "patchDoc object sent from client is null.");

    let res = server
        .patch(&format!("/api/companies/{}/employees/{}", common::IT_SOLUTIONS, employee_id))
        .json(&json!([]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = server.get(&location).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["position"], "Analyst");
    Ok(())
}
