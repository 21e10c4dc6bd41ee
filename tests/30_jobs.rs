mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{job_row, TestApp};

const JOB_SELECT: &str = r#"SELECT id, title, salary, equity::text AS equity, company_handle AS "companyHandle" FROM jobs"#;

#[tokio::test]
async fn list_without_filters_orders_by_title() {
    let app = TestApp::new();
    app.db.respond(vec![job_row(1, "J1", 100, "0.1", "c1")]);

    let (status, body) = app.send(Method::GET, "/jobs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["jobs"],
        json!([{"id": 1, "title": "J1", "salary": 100, "equity": "0.1", "companyHandle": "c1"}])
    );
    assert_eq!(app.db.last_query().normalized(), format!("{} ORDER BY title", JOB_SELECT));
}

#[tokio::test]
async fn has_equity_true_adds_an_unbound_predicate() {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::GET, "/jobs?hasEquity=true&minSalary=150&title=j", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let query = app.db.last_query();
    assert_eq!(
        query.normalized(),
        format!(
            r#"{} WHERE "equity" > 0 AND "salary" >= $1 AND "title" ILIKE $2 ORDER BY title"#,
            JOB_SELECT
        )
    );
    assert_eq!(query.params, vec![json!(150), json!("%j%")]);
}

#[tokio::test]
async fn has_equity_false_places_no_constraint() {
    let app = TestApp::new();

    let (status, _) = app.send(Method::GET, "/jobs?hasEquity=false", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let query = app.db.last_query();
    assert_eq!(query.normalized(), format!("{} ORDER BY title", JOB_SELECT));
    assert!(query.params.is_empty());
}

#[tokio::test]
async fn list_rejects_bad_filters() {
    let app = TestApp::new();

    for uri in [
        "/jobs?minEmployees=1",
        "/jobs?hasEquity=yes",
        "/jobs?minSalary=1.5",
    ] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}: {}", uri, body);
    }
    assert!(app.db.queries().is_empty());
}

#[tokio::test]
async fn get_job_by_id() {
    let app = TestApp::new();
    app.db.respond(vec![job_row(3, "J3", 300, "0", "c2")]);

    let (status, body) = app.send(Method::GET, "/jobs/3", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["job"]["companyHandle"], json!("c2"));
    assert_eq!(app.db.last_query().params, vec![json!(3)]);

    let (status, body) = app.send(Method::GET, "/jobs/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("No job: 99"));

    let (status, _) = app.send(Method::GET, "/jobs/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_creates_job_for_existing_company() {
    let app = TestApp::new();
    let token = app.admin_token();
    app.db
        .respond(vec![json!({"handle": "c1"})])
        .respond(vec![job_row(4, "new", 500, "0.7", "c1")]);

    let (status, body) = app
        .send(
            Method::POST,
            "/jobs",
            Some(&token),
            Some(json!({"title": "new", "salary": 500, "equity": 0.7, "companyHandle": "c1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["data"]["job"]["id"], json!(4));
    assert_eq!(body["data"]["job"]["equity"], json!("0.7"));

    let insert = app.db.last_query();
    assert!(insert.normalized().starts_with("INSERT INTO jobs"));
    assert_eq!(insert.params, vec![json!("new"), json!(500), json!(0.7), json!("c1")]);
}

#[tokio::test]
async fn create_job_requires_known_company_and_valid_equity() {
    let app = TestApp::new();
    let token = app.admin_token();

    let (status, body) = app
        .send(
            Method::POST,
            "/jobs",
            Some(&token),
            Some(json!({"title": "new", "companyHandle": "nope"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("No company: nope"));

    let (status, _) = app
        .send(
            Method::POST,
            "/jobs",
            Some(&token),
            Some(json!({"title": "new", "equity": 1.5, "companyHandle": "c1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_patches_job() {
    let app = TestApp::new();
    let token = app.admin_token();
    app.db.respond(vec![job_row(1, "J-New", 100, "0.1", "c1")]);

    let (status, body) = app
        .send(Method::PATCH, "/jobs/1", Some(&token), Some(json!({"title": "J-New"})))
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["data"]["job"]["title"], json!("J-New"));

    let query = app.db.last_query();
    assert!(query
        .normalized()
        .starts_with(r#"UPDATE jobs SET "title" = $1 WHERE id = $2 RETURNING"#));
    assert_eq!(query.params, vec![json!("J-New"), json!(1)]);
}

#[tokio::test]
async fn patch_cannot_move_job_between_companies() {
    let app = TestApp::new();
    let token = app.admin_token();

    for body in [json!({"companyHandle": "c2"}), json!({"id": 5}), json!({})] {
        let (status, _) = app.send(Method::PATCH, "/jobs/1", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }
    assert!(app.db.queries().is_empty());
}

#[tokio::test]
async fn patch_cannot_clear_title() {
    let app = TestApp::new();
    let token = app.admin_token();

    let (status, body) = app
        .send(Method::PATCH, "/jobs/1", Some(&token), Some(json!({"title": null, "salary": 10})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid value for title: expected a non-null value"));
    assert!(app.db.queries().is_empty());
}

#[tokio::test]
async fn patch_may_clear_nullable_fields() {
    let app = TestApp::new();
    let token = app.admin_token();
    app.db.respond(vec![job_row(1, "J1", 100, "0.1", "c1")]);

    let (status, _) = app
        .send(Method::PATCH, "/jobs/1", Some(&token), Some(json!({"equity": null})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.db.last_query().params, vec![json!(null), json!(1)]);
}

#[tokio::test]
async fn admin_deletes_job() {
    let app = TestApp::new();
    let token = app.admin_token();
    app.db.respond(vec![json!({"id": 1})]);

    let (status, body) = app.send(Method::DELETE, "/jobs/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"deleted": 1}));

    let (status, _) = app.send(Method::DELETE, "/jobs/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
