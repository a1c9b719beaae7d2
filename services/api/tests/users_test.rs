use actix_web::http::StatusCode;
use actix_web::test;
use api::create_app;
use api::state::AppState;
use db::Db;
use serde_json::{Value, json};

fn staff(username: &str, role: &str) -> Value {
    json!({
        "username": username,
        "role": role,
        "dob": "1985-11-02",
        "location": "Ulaanbaatar",
        "phone": "99887766",
        "email": format!("{username}@hospital.mn"),
        "password": "secret"
    })
}

#[actix_web::test]
async fn test_user_crud_with_role_scoped_ids() {
    let app = test::init_service(create_app(AppState { db: Db::in_memory() })).await;

    let mut ids = Vec::new();
    for (name, role) in [("bat", "Doctor"), ("saraa", "Nurse"), ("dorj", "Doctor")] {
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(staff(name, role))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids, ["D-1", "N-1", "D-2"]);

    // search
    let req = test::TestRequest::get().uri("/api/users?q=NURSE").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["username"], "saraa");

    // role change re-derives the id
    let req = test::TestRequest::put()
        .uri("/api/users/D-1")
        .set_json(staff("bat", "Nurse"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], "N-2");

    // delete renumbers per role
    let req = test::TestRequest::delete().uri("/api/users/N-1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "User deleted successfully"}));

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["N-1", "D-1"]);
}

#[actix_web::test]
async fn test_user_not_found_leaves_collection_untouched() {
    let app = test::init_service(create_app(AppState { db: Db::in_memory() })).await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(staff("bat", "Doctor"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let before: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete().uri("/api/users/D-9").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "User not found"}));

    let req = test::TestRequest::put()
        .uri("/api/users/D-9")
        .set_json(staff("bat", "Doctor"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(before, after);
}

#[actix_web::test]
async fn test_user_without_role_is_bad_request() {
    let app = test::init_service(create_app(AppState { db: Db::in_memory() })).await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"username": "nobody"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "role is required");
}

#[actix_web::test]
async fn test_users_persist_to_the_staff_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::connect(dir.path()).await.unwrap();
    let app = test::init_service(create_app(AppState { db })).await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(staff("bat", "Doctor"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let on_disk: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("Staff.json")).unwrap()).unwrap();
    assert_eq!(on_disk, json!([created]));
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let app = test::init_service(create_app(AppState { db: Db::in_memory() })).await;
    let req = test::TestRequest::get().uri("/api/doctors").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_user_fields_are_stored_with_their_json_type() {
    let app = test::init_service(create_app(AppState { db: Db::in_memory() })).await;

    let mut body = staff("bat", "Doctor");
    body["phone"] = json!(99112233);
    body["field"] = Value::Null;
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["phone"], json!(99112233));
    assert!(created.as_object().unwrap().contains_key("field"));

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([created]));
}
