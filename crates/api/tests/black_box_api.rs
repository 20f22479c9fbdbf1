use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use itemtrack_api::app::{AppServices, build_app};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(AppServices::in_memory(), 1024 * 1024);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn upload(
    client: &reqwest::Client,
    srv: &TestServer,
    file_name: &str,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let part = Part::bytes(body.as_bytes().to_vec()).file_name(file_name.to_string());
    let form = Form::new().part("file", part);

    let res = client
        .post(srv.url("/items/import"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn item_lifecycle_assign_edit_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/items"))
        .json(&json!({
            "code": " A001 ",
            "description": "Mouse USB",
            "category": "Periféricos",
            "unit": "unidad",
            "quantity": "10",
            "unit_value": 15
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["code"], "A001");
    assert_eq!(created["total_value"].as_f64().unwrap(), 150.0);
    let id = created["id"].as_i64().unwrap();

    // Category-only edit keeps the total.
    let res = client
        .put(srv.url(&format!("/items/{id}")))
        .json(&json!({ "category": "Accesorios" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let edited: serde_json::Value = res.json().await.unwrap();
    assert_eq!(edited["category"], "Accesorios");
    assert_eq!(edited["total_value"].as_f64().unwrap(), 150.0);

    // Quantity edit recomputes it.
    let res = client
        .put(srv.url(&format!("/items/{id}")))
        .json(&json!({ "quantity": 4 }))
        .send()
        .await
        .unwrap();
    let edited: serde_json::Value = res.json().await.unwrap();
    assert_eq!(edited["total_value"].as_f64().unwrap(), 60.0);
    assert_eq!(edited["assigned_at"], created["assigned_at"]);

    let res = client
        .get(srv.url(&format!("/items/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(srv.url(&format!("/items/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(srv.url(&format!("/items/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn assign_rejects_invalid_input() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/items"))
        .json(&json!({ "code": "   ", "description": "Mouse", "quantity": 1, "unit_value": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = client
        .post(srv.url("/items"))
        .json(&json!({ "code": "A1", "description": "Mouse", "quantity": "diez" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(srv.url("/items")).send().await.unwrap();
    let list: Vec<serde_json::Value> = res.json().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn invalid_and_unknown_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/items/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = client
        .put(srv.url("/items/999"))
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(srv.url("/items/999")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_most_recent_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for code in ["A001", "A002", "A003"] {
        let res = client
            .post(srv.url("/items"))
            .json(&json!({ "code": code, "description": "Item", "quantity": 1, "unit_value": 2 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let list: Vec<serde_json::Value> = client
        .get(srv.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let codes: Vec<&str> = list.iter().map(|i| i["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["A003", "A002", "A001"]);
}

#[tokio::test]
async fn csv_import_reports_rows_and_stores_items() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, report) = upload(
        &client,
        &srv,
        "inventario.csv",
        "Código,Descripción,Categoría,Unidad de medida,Cantidad,Valor Unitario,Valor Total\n\
         A001,Mouse USB,Periféricos,unidad,10,15,\n\
         A002,,Periféricos,unidad,5,50,\n\
         A003,Monitor,Monitores,unidad,3,,360\n",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["imported_count"], 2);
    assert_eq!(report["rejected"], false);
    assert_eq!(
        report["errors"],
        json!(["Row 3: required field 'description' is empty"])
    );

    let list: Vec<serde_json::Value> = client
        .get(srv.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 2);
    let monitor = list.iter().find(|i| i["code"] == "A003").unwrap();
    assert_eq!(monitor["unit_value"].as_f64().unwrap(), 120.0);
}

#[tokio::test]
async fn import_rejections_use_distinct_statuses() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, report) = upload(
        &client,
        &srv,
        "inventario.csv",
        "Código,Descripción,Valor Unitario\nA001,Mouse,15\n",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(report["rejected"], true);
    assert_eq!(report["imported_count"], 0);
    assert_eq!(report["failure_kind"], "missing_mandatory_columns");
    assert!(report["rejection_reason"].as_str().unwrap().contains("quantity"));

    let (status, report) = upload(&client, &srv, "inventario.pdf", "%PDF-1.7").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(report["failure_kind"], "unsupported_format");

    let (status, report) = upload(&client, &srv, "vacio.csv", "").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(report["failure_kind"], "empty_file");

    let list: Vec<serde_json::Value> = client
        .get(srv.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn import_without_file_field_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let form = Form::new().text("note", "no file here");
    let res = client
        .post(srv.url("/items/import"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_file");
}
