//! End-to-end tests for the REST transport against an in-process fixture
//! server.

use std::net::SocketAddr;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use shopfloor_client::models::{NewPart, PageParams};
use shopfloor_client::{ApiConfig, ApiError, Protocol, RestClient, ShopFloorApi, ShopFloorStore, build_api};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[derive(serde::Deserialize)]
struct Page {
    limit: u32,
    offset: u32,
}

#[tokio::test]
async fn list_parts_sends_coerced_pagination_and_canonicalizes_the_reply() {
    async fn parts(Query(page): Query<Page>) -> Json<Value> {
        // The client must have coerced the missing window to the defaults.
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
        Json(json!([{"id": 5, "name": "Bolt", "department_id": 2}]))
    }
    let app = Router::new().route("/parts", get(parts));
    let addr = serve(app).await;

    let client = RestClient::new(format!("http://{addr}"));
    let parts = client.list_parts(PageParams::default()).await.unwrap();
    assert_eq!(parts[0].department_id, Some(2));
}

#[tokio::test]
async fn create_part_posts_a_canonical_body() {
    async fn create(Json(body): Json<Value>) -> Json<Value> {
        assert!(body.get("departmentId").is_some());
        assert!(body.get("department_id").is_none());
        Json(json!({"id": 9, "name": body["name"], "departmentId": body["departmentId"]}))
    }
    let app = Router::new().route("/parts", post(create));
    let addr = serve(app).await;

    let client = RestClient::new(format!("http://{addr}"));
    let part = client
        .add_part(&NewPart {
            name: "Bolt".to_string(),
            department_id: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(part.id, 9);
    assert_eq!(part.department_id, Some(2));
}

#[tokio::test]
async fn delete_department_decodes_the_boolean_reply() {
    async fn remove(Path(id): Path<i64>) -> Json<Value> {
        assert_eq!(id, 7);
        Json(json!(true))
    }
    let app = Router::new().route("/departments/{id}", delete(remove));
    let addr = serve(app).await;

    let client = RestClient::new(format!("http://{addr}"));
    assert!(client.delete_department(7).await.unwrap());
}

#[tokio::test]
async fn qualities_by_part_hits_the_quality_path() {
    async fn quality(Path(part_id): Path<i64>) -> Json<Value> {
        Json(json!([
            {"id": 1, "pass_fail": true, "defect_count": 0, "part_id": part_id}
        ]))
    }
    let app = Router::new().route("/quality/{part_id}", get(quality));
    let addr = serve(app).await;

    let client = RestClient::new(format!("http://{addr}"));
    let qualities = client.qualities_by_part(5).await.unwrap();
    assert_eq!(qualities[0].part_id, Some(5));
    assert!(qualities[0].pass_fail);
}

#[tokio::test]
async fn department_resource_covers_reads_and_writes() {
    async fn one(Path(id): Path<i64>) -> Json<Value> {
        Json(json!({"id": id, "title": "Welding", "description": "Bay 2"}))
    }
    async fn by_title(Query(q): Query<std::collections::HashMap<String, String>>) -> Json<Value> {
        Json(json!({"id": 4, "title": q["title"], "description": ""}))
    }
    async fn create(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({"id": 9, "title": body["title"], "description": body["description"]}))
    }
    async fn rename(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
        Json(json!({"id": id, "title": body["title"], "description": body["description"]}))
    }
    let app = Router::new()
        .route("/departments", post(create))
        .route("/departments/by-title", get(by_title))
        .route("/departments/{id}", get(one).put(rename));
    let addr = serve(app).await;
    let client = RestClient::new(format!("http://{addr}"));

    assert_eq!(client.get_department(4).await.unwrap().title, "Welding");
    assert_eq!(client.department_by_title("Welding").await.unwrap().id, 4);

    let input = shopfloor_client::models::NewDepartment {
        title: "Paint".to_string(),
        description: "fresh".to_string(),
    };
    assert_eq!(client.add_department(&input).await.unwrap().id, 9);
    assert_eq!(
        client.update_department(4, &input).await.unwrap().title,
        "Paint"
    );
}

#[tokio::test]
async fn remaining_resources_round_trip() {
    async fn work_centers() -> Json<Value> {
        Json(json!([{"id": 3, "name": "Lathe 1", "code": "WC-3", "department_id": 4}]))
    }
    async fn add_work_center(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({"id": 4, "name": body["name"], "departmentId": body["departmentId"]}))
    }
    async fn qualities() -> Json<Value> {
        Json(json!([{"id": 1, "pass_fail": true, "defect_count": 0, "part_id": 5}]))
    }
    async fn add_quality(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({"id": 2, "passFail": body["passFail"], "defectCount": 1, "partId": 5}))
    }
    async fn defects() -> Json<Value> {
        Json(json!([{"id": 1, "title": "Scratch", "part_id": 5, "defect_category_id": 1}]))
    }
    async fn add_defect(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({"id": 2, "title": body["title"], "partId": 5, "defectCategoryId": 1}))
    }
    async fn categories() -> Json<Value> {
        Json(json!([{"id": 1, "title": "Surface", "department_id": 4}]))
    }
    async fn add_category(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({"id": 2, "title": body["title"], "departmentId": 4}))
    }
    let app = Router::new()
        .route("/work-centers", get(work_centers).post(add_work_center))
        .route("/qualities", get(qualities).post(add_quality))
        .route("/defects", get(defects).post(add_defect))
        .route("/defect-categories", get(categories).post(add_category));
    let addr = serve(app).await;
    let client = RestClient::new(format!("http://{addr}"));

    let centers = client.list_work_centers(PageParams::default()).await.unwrap();
    assert_eq!(centers[0].code.as_deref(), Some("WC-3"));
    let created = client
        .add_work_center(&shopfloor_client::models::NewWorkCenter {
            name: "Mill 2".to_string(),
            code: None,
            department_id: Some(4),
        })
        .await
        .unwrap();
    assert_eq!(created.department_id, Some(4));

    let listed = client.list_qualities(PageParams::default()).await.unwrap();
    assert_eq!(listed[0].part_id, Some(5));
    let quality = client
        .add_quality(&shopfloor_client::models::NewQuality {
            pass_fail: false,
            defect_count: 1,
            part_id: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(quality.id, 2);

    let defects = client.list_defects(PageParams::default()).await.unwrap();
    assert_eq!(defects[0].defect_category_id, Some(1));
    let defect = client
        .add_defect(&shopfloor_client::models::NewDefect {
            title: "Dent".to_string(),
            description: String::new(),
            part_id: Some(5),
            defect_category_id: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(defect.id, 2);

    let cats = client
        .list_defect_categories(PageParams::default())
        .await
        .unwrap();
    assert_eq!(cats[0].department_id, Some(4));
    let cat = client
        .add_defect_category(&shopfloor_client::models::NewDefectCategory {
            title: "Structural".to_string(),
            department_id: Some(4),
        })
        .await
        .unwrap();
    assert_eq!(cat.id, 2);
}

#[tokio::test]
async fn get_part_fetches_one_record() {
    async fn part(Path(id): Path<i64>) -> Json<Value> {
        Json(json!({"id": id, "name": "Bolt", "department_id": 2}))
    }
    let app = Router::new().route("/parts/{id}", get(part));
    let addr = serve(app).await;

    let client = RestClient::new(format!("http://{addr}"));
    let part = client.get_part(5).await.unwrap();
    assert_eq!(part.name, "Bolt");
    assert_eq!(part.department_id, Some(2));
}

#[tokio::test]
async fn non_2xx_is_an_http_error() {
    let app = Router::new().route(
        "/departments",
        get(|| async { (StatusCode::NOT_FOUND, Json(json!({"detail": "nope"}))) }),
    );
    let addr = serve(app).await;

    let client = RestClient::new(format!("http://{addr}"));
    let err = client
        .list_departments(PageParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404 }));
    assert_eq!(err.code(), "HTTP_ERROR");
}

#[tokio::test]
async fn store_runs_on_the_rest_transport_via_build_api() {
    async fn departments() -> Json<Value> {
        Json(json!([{"id": 1, "title": "Assembly", "description": "Main line"}]))
    }
    async fn parts() -> Json<Value> {
        Json(json!([{"id": 5, "name": "Bolt", "department_id": 1}]))
    }
    let app = Router::new()
        .route("/departments", get(departments))
        .route("/parts", get(parts));
    let addr = serve(app).await;

    let config = ApiConfig::new(format!("http://{addr}"), Protocol::Rest);
    let store = ShopFloorStore::new(build_api(&config));

    // The dashboard rollup composes the two list calls client-side.
    let dashboard = store.fetch_dashboard().await.unwrap();
    assert_eq!(dashboard.departments[0].title, "Assembly");
    assert_eq!(dashboard.parts[0].department_id, Some(1));

    let snap = store.dashboard();
    assert!(snap.data.is_some());
    assert_eq!(snap.error, None);
    assert!(!snap.loading);
}
