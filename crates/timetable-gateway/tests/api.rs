// End-to-end checks of the HTTP surface against an in-memory table.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use timetable_core::config::DatasetConfig;
use timetable_core::TimetableConfig;
use timetable_gateway::app::{build_router, AppState};
use timetable_table::Table;
use tower::ServiceExt;

const HEADER: &str =
    "Дата;ВремяНачала;ВремяОкончания;Мероприятие;КатегорияВремени;УчебнаяГруппа;Аудитория;Корпус;ФИО_полн";

const CATEGORIES: [&str; 3] = ["Лекция", "Практика", "Лабораторная"];
const TEACHERS: [&str; 4] = ["Иванов И.И.", "Петров П.П.", "Сидоров С.С.", "Кузнецова А.А."];
const BUILDINGS: [&str; 2] = ["А", "Б"];

/// 25 rows, one per day starting 2024-09-01.
fn sample_table() -> Table {
    let mut csv = String::from(HEADER);
    for i in 0..25 {
        csv.push_str(&format!(
            "\n2024-09-{:02};08:30:00;10:00:00;Предмет {i};{};ИВТ-21;{};{};{}",
            i + 1,
            CATEGORIES[i % 3],
            100 + i,
            BUILDINGS[i % 2],
            TEACHERS[i % 4],
        ));
    }
    Table::from_reader(csv.as_bytes(), &DatasetConfig::default()).unwrap()
}

fn state_with(config: TimetableConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config, sample_table()))
}

fn uri(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("{path}?{}", query.join("&"))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn data(router: &Router, params: &[(&str, &str)]) -> (StatusCode, Value) {
    get(router, &uri("/api/data", params)).await
}

fn column<'a>(body: &'a Value, name: &str) -> Vec<&'a str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r[name].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn default_page_is_first_ten_rows() {
    let router = build_router(state_with(TimetableConfig::default()));
    let (status, body) = data(&router, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 25);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["index"], 0);
    assert_eq!(rows[0]["Дата"], "2024-09-01");
    assert_eq!(rows[9]["index"], 9);
}

#[tokio::test]
async fn last_page_is_partial_and_past_end_is_empty() {
    let router = build_router(state_with(TimetableConfig::default()));

    let (_, body) = data(&router, &[("page", "3")]).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["total"], 25);

    let (status, body) = data(&router, &[("page", "9")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 25);
}

#[tokio::test]
async fn invalid_pagination_is_rejected() {
    let router = build_router(state_with(TimetableConfig::default()));
    for params in [
        [("per_page", "0")],
        [("per_page", "101")],
        [("page", "0")],
        [("page", "abc")],
    ] {
        let (status, body) = data(&router, &params).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{params:?}");
        assert_eq!(body["code"], "INVALID_PARAMETER");
        assert!(body["error"].as_str().unwrap().contains(params[0].0));
    }
}

#[tokio::test]
async fn all_filter_matches_no_filter() {
    let router = build_router(state_with(TimetableConfig::default()));
    let (_, plain) = data(&router, &[]).await;
    let (_, all) = data(
        &router,
        &[("event_type", "all"), ("teacher", "all"), ("building", "all")],
    )
    .await;
    assert_eq!(plain, all);
}

#[tokio::test]
async fn filters_combine_with_and() {
    let router = build_router(state_with(TimetableConfig::default()));

    let (_, body) = data(&router, &[("building", "А"), ("per_page", "100")]).await;
    assert_eq!(body["total"], 13);
    assert!(column(&body, "Корпус").iter().all(|b| *b == "А"));

    // i % 2 == 0 and i % 4 == 0
    let (_, body) = data(
        &router,
        &[("building", "А"), ("teacher", "Иванов И.И."), ("per_page", "100")],
    )
    .await;
    assert_eq!(body["total"], 7);

    let (_, body) = data(&router, &[("teacher", "Никто")]).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn date_range_is_inclusive() {
    let router = build_router(state_with(TimetableConfig::default()));
    let (_, body) = data(
        &router,
        &[("start_date", "2024-09-05"), ("end_date", "2024-09-07")],
    )
    .await;
    assert_eq!(body["total"], 3);
    assert_eq!(column(&body, "Дата"), ["2024-09-05", "2024-09-06", "2024-09-07"]);

    let (_, body) = data(&router, &[("start_date", "not a date")]).await;
    assert_eq!(body["total"], 25);
}

#[tokio::test]
async fn datatables_order_sorts_by_named_column() {
    let router = build_router(state_with(TimetableConfig::default()));
    let (_, body) = data(
        &router,
        &[
            ("order[0][column]", "1"),
            ("order[0][dir]", "desc"),
            ("columns[1][data]", "Дата"),
        ],
    )
    .await;
    let dates = column(&body, "Дата");
    assert_eq!(dates[0], "2024-09-25");
    assert_eq!(dates[9], "2024-09-16");
}

#[tokio::test]
async fn ties_keep_file_order_in_both_directions() {
    let router = build_router(state_with(TimetableConfig::default()));
    for dir in ["asc", "desc"] {
        let (_, body) = data(
            &router,
            &[
                ("order[0][column]", "0"),
                ("order[0][dir]", dir),
                ("columns[0][data]", "Корпус"),
                ("per_page", "100"),
            ],
        )
        .await;
        let rows = body["data"].as_array().unwrap();
        let indexes: Vec<u64> = rows.iter().map(|r| r["index"].as_u64().unwrap()).collect();
        let split = if dir == "asc" { 13 } else { 12 };
        assert!(indexes[..split].windows(2).all(|w| w[0] < w[1]), "{dir}");
        assert!(indexes[split..].windows(2).all(|w| w[0] < w[1]), "{dir}");
    }
}

#[tokio::test]
async fn stats_count_whole_table() {
    let router = build_router(state_with(TimetableConfig::default()));
    let (status, body) = get(&router, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);

    let events = body["event_stats"].as_array().unwrap();
    assert_eq!(events[0]["type"], "Лекция");
    assert_eq!(events[0]["count"], 9);
    assert_eq!(events.iter().map(|e| e["count"].as_u64().unwrap()).sum::<u64>(), 25);

    let teachers = body["teacher_stats"].as_array().unwrap();
    assert_eq!(teachers.len(), 4);
    assert_eq!(teachers[0]["teacher"], "Иванов И.И.");
    assert_eq!(teachers[0]["count"], 7);

    let buildings = body["building_stats"].as_array().unwrap();
    assert_eq!(buildings[0]["building"], "А");
    assert_eq!(buildings[0]["count"], 13);
    assert_eq!(buildings[1]["building"], "Б");
    assert_eq!(buildings[1]["count"], 12);
}

#[tokio::test]
async fn repeated_request_is_served_from_cache() {
    let state = state_with(TimetableConfig::default());
    let router = build_router(state.clone());
    let params = [("teacher", "Петров П.П."), ("page", "1")];

    let (_, first) = data(&router, &params).await;
    let (_, second) = data(&router, &params).await;
    assert_eq!(first, second);
    assert_eq!(state.cache.misses(), 1);
    assert_eq!(state.cache.hits(), 1);

    // same parameters in another order share the entry
    let (_, _) = data(&router, &[("page", "1"), ("teacher", "Петров П.П.")]).await;
    assert_eq!(state.cache.hits(), 2);
}

#[tokio::test]
async fn rejected_requests_are_not_cached() {
    let state = state_with(TimetableConfig::default());
    let router = build_router(state.clone());
    data(&router, &[("per_page", "0")]).await;
    assert!(state.cache.is_empty());
}

#[tokio::test]
async fn zero_ttl_always_recomputes() {
    let mut config = TimetableConfig::default();
    config.cache.ttl_secs = 0;
    let state = state_with(config);
    let router = build_router(state.clone());

    get(&router, "/api/stats").await;
    get(&router, "/api/stats").await;
    assert_eq!(state.cache.hits(), 0);
    assert_eq!(state.cache.misses(), 2);
}

#[tokio::test]
async fn health_reports_record_count() {
    let router = build_router(state_with(TimetableConfig::default()));
    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 25);
}

#[tokio::test]
async fn dashboard_is_served_at_root() {
    let router = build_router(state_with(TimetableConfig::default()));
    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/api/data"));
}
