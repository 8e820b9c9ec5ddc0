use crate::handlers::one_offs::{CreateOneOffRequest, UpdateOneOffRequest};
use crate::handlers::recurring::{CreateRecurringRequest, UpdateRecurringRequest};
use crate::handlers::users::CreateUserRequest;
use crate::schemas::{ApiResponse, ErrorResponse};
use crate::test_utils::{init_test_tracing, setup_test_app, setup_test_app_with_state};
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Days, NaiveDate, Utc};
use common::{BalanceDto, BalanceSheetDto, EntryKind, FinancialPlannerDto};
use model::entities::recurring_transaction::{self, BasePeriod};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

async fn test_server() -> TestServer {
    TestServer::new(setup_test_app().await).unwrap()
}

fn one_off_request(on: NaiveDate, amount: i64) -> CreateOneOffRequest {
    CreateOneOffRequest {
        name: None,
        amount: dec(amount),
        date: on,
        is_salary: None,
    }
}

fn recurring_request(start: NaiveDate, amount: i64, base_period: BasePeriod) -> CreateRecurringRequest {
    CreateRecurringRequest {
        name: None,
        amount: dec(amount),
        start_date: start,
        end_date: None,
        base_period,
        frequency: None,
        is_salary: None,
    }
}

async fn create_one_off(server: &TestServer, user_id: i32, request: &CreateOneOffRequest) -> i64 {
    let response = server
        .post(&format!("/api/v1/users/{}/one-offs", user_id))
        .json(request)
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<serde_json::Value> = response.json();
    body.data["id"].as_i64().unwrap()
}

async fn create_recurring(server: &TestServer, user_id: i32, request: &CreateRecurringRequest) -> i64 {
    let response = server
        .post(&format!("/api/v1/users/{}/recurring", user_id))
        .json(request)
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<serde_json::Value> = response.json();
    body.data["id"].as_i64().unwrap()
}

async fn balance_sheet(server: &TestServer, user_id: i32, today: &str) -> BalanceSheetDto {
    let response = server
        .get(&format!("/api/v1/users/{}/balance-sheet", user_id))
        .add_query_param("today", today)
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<BalanceSheetDto> = response.json();
    assert!(body.success);
    body.data
}

#[tokio::test]
async fn test_health_check() {
    let server = test_server().await;

    let response = server.get("/health").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_create_and_get_user() {
    let _guard = init_test_tracing();
    let server = test_server().await;

    let response = server
        .post("/api/v1/users")
        .json(&CreateUserRequest {
            username: "alice".to_string(),
        })
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<serde_json::Value> = response.json();
    assert!(body.success);
    assert_eq!(body.message, "User created successfully");
    assert_eq!(body.data["username"], "alice");
    let user_id = body.data["id"].as_i64().unwrap();

    let response = server.get(&format!("/api/v1/users/{}", user_id)).await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = response.json();
    assert_eq!(body.data["username"], "alice");
}

#[tokio::test]
async fn test_duplicate_and_invalid_usernames() {
    let server = test_server().await;

    // test_user1 is registered by the test state
    let response = server
        .post("/api/v1/users")
        .json(&CreateUserRequest {
            username: "test_user1".to_string(),
        })
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "USERNAME_ALREADY_EXISTS");
    assert!(!body.success);

    let response = server
        .post("/api/v1/users")
        .json(&CreateUserRequest {
            username: String::new(),
        })
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let server = test_server().await;

    server.get("/api/v1/users/999").await.assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/api/v1/users/999/balance-sheet").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_one_off_crud() {
    let server = test_server().await;
    let upcoming = Utc::now().date_naive() + Days::new(30);

    let mut request = one_off_request(upcoming, -120);
    request.name = Some("Groceries".to_string());
    let id = create_one_off(&server, 1, &request).await;

    let response = server.get(&format!("/api/v1/users/1/one-offs/{}", id)).await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = response.json();
    assert_eq!(body.data["name"], "Groceries");
    assert_eq!(body.data["owner_id"], 1);

    let response = server
        .put(&format!("/api/v1/users/1/one-offs/{}", id))
        .json(&UpdateOneOffRequest {
            amount: Some(dec(-150)),
            is_salary: Some(false),
            ..Default::default()
        })
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = response.json();
    let amount: Decimal = body.data["amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(amount, dec(-150));
    assert_eq!(body.data["name"], "Groceries");

    let response = server.get("/api/v1/users/1/one-offs").await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Vec<serde_json::Value>> = response.json();
    assert_eq!(body.data.len(), 1);
    assert_eq!(body.data[0]["id"].as_i64(), Some(id));

    server
        .delete(&format!("/api/v1/users/1/one-offs/{}", id))
        .await
        .assert_status(StatusCode::OK);
    server
        .get(&format!("/api/v1/users/1/one-offs/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_one_off_list_skips_past_entries() {
    let server = test_server().await;
    let today = Utc::now().date_naive();

    create_one_off(&server, 1, &one_off_request(today - Days::new(1), -10)).await;
    create_one_off(&server, 1, &one_off_request(today, -20)).await;

    let response = server.get("/api/v1/users/1/one-offs").await;
    let body: ApiResponse<Vec<serde_json::Value>> = response.json();
    assert_eq!(body.data.len(), 1);
    assert_eq!(body.data[0]["date"], today.to_string());
}

#[tokio::test]
async fn test_records_of_another_user_are_forbidden() {
    let server = test_server().await;

    let one_off_id = create_one_off(&server, 1, &one_off_request(date(2030, 1, 1), -10)).await;
    let rule_id = create_recurring(
        &server,
        1,
        &recurring_request(date(2030, 1, 1), -10, BasePeriod::Monthly),
    )
    .await;

    let response = server.get(&format!("/api/v1/users/2/one-offs/{}", one_off_id)).await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "FORBIDDEN");

    server
        .put(&format!("/api/v1/users/2/recurring/{}", rule_id))
        .json(&UpdateRecurringRequest {
            amount: Some(dec(-1)),
            ..Default::default()
        })
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .delete(&format!("/api/v1/users/2/recurring/{}", rule_id))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .delete(&format!("/api/v1/users/2/one-offs/{}", one_off_id))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // Still there for the owner
    server
        .get(&format!("/api/v1/users/1/recurring/{}", rule_id))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_recurring_validation() {
    let server = test_server().await;

    let mut zero_frequency = recurring_request(date(2030, 1, 1), -10, BasePeriod::Weekly);
    zero_frequency.frequency = Some(0);
    server
        .post("/api/v1/users/1/recurring")
        .json(&zero_frequency)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut inverted = recurring_request(date(2030, 1, 1), -10, BasePeriod::Weekly);
    inverted.end_date = Some(date(2029, 12, 31));
    server
        .post("/api/v1/users/1/recurring")
        .json(&inverted)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut long_name = recurring_request(date(2030, 1, 1), -10, BasePeriod::Weekly);
    long_name.name = Some("x".repeat(256));
    server
        .post("/api/v1/users/1/recurring")
        .json(&long_name)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // A patch that is fine on its own but breaks the stored rule
    let rule_id = create_recurring(
        &server,
        1,
        &recurring_request(date(2030, 6, 1), -10, BasePeriod::Weekly),
    )
    .await;
    let response = server
        .put(&format!("/api/v1/users/1/recurring/{}", rule_id))
        .json(&UpdateRecurringRequest {
            end_date: Some(date(2030, 1, 1)),
            ..Default::default()
        })
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_recurring_update_and_list() {
    let server = test_server().await;

    let mut request = recurring_request(date(2030, 1, 31), -800, BasePeriod::Monthly);
    request.name = Some("Rent".to_string());
    request.end_date = Some(date(2031, 1, 31));
    let rule_id = create_recurring(&server, 1, &request).await;

    let response = server
        .put(&format!("/api/v1/users/1/recurring/{}", rule_id))
        .json(&UpdateRecurringRequest {
            base_period: Some(BasePeriod::Quarterly),
            frequency: Some(2),
            clear_end_date: Some(true),
            ..Default::default()
        })
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = response.json();
    assert_eq!(body.data["base_period"], "quarterly");
    assert_eq!(body.data["frequency"], 2);
    assert!(body.data["end_date"].is_null());
    assert_eq!(body.data["name"], "Rent");

    // An ended rule is not listed
    let mut ended = recurring_request(date(2020, 1, 1), -5, BasePeriod::Daily);
    ended.end_date = Some(date(2020, 12, 31));
    create_recurring(&server, 1, &ended).await;

    // One ending today is still active
    let mut ends_today = recurring_request(date(2020, 1, 1), -5, BasePeriod::Weekly);
    ends_today.end_date = Some(Utc::now().date_naive());
    let ends_today_id = create_recurring(&server, 1, &ends_today).await;

    let response = server.get("/api/v1/users/1/recurring").await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<Vec<serde_json::Value>> = response.json();
    let ids: Vec<_> = body.data.iter().filter_map(|rule| rule["id"].as_i64()).collect();
    assert_eq!(ids, vec![rule_id, ends_today_id]);
}

#[tokio::test]
async fn test_starting_balance_round_trip() {
    let server = test_server().await;

    let response = server.get("/api/v1/users/1/balance").await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<BalanceDto> = response.json();
    assert_eq!(body.data.balance, Decimal::ZERO);

    let response = server
        .put("/api/v1/users/1/balance")
        .json(&serde_json::json!({ "balance": "250.50" }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: ApiResponse<BalanceDto> = server.get("/api/v1/users/1/balance").await.json();
    assert_eq!(body.data.balance, Decimal::new(25050, 2));

    // Balances are per user
    let body: ApiResponse<BalanceDto> = server.get("/api/v1/users/2/balance").await.json();
    assert_eq!(body.data.balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_balance_sheet_orders_equal_dates_by_amount() {
    let server = test_server().await;

    create_one_off(&server, 1, &one_off_request(date(2021, 3, 1), 1000)).await;
    create_one_off(&server, 1, &one_off_request(date(2021, 3, 1), -50)).await;

    let sheet = balance_sheet(&server, 1, "2021-01-01").await;

    assert_eq!(sheet.today, date(2021, 1, 1));
    assert_eq!(sheet.horizon_end, Some(date(2022, 1, 1)));
    let amounts: Vec<_> = sheet.entries.iter().map(|e| e.amount).collect();
    let balances: Vec<_> = sheet.entries.iter().map(|e| e.balance).collect();
    assert_eq!(amounts, vec![dec(-50), dec(1000)]);
    assert_eq!(balances, vec![dec(-50), dec(950)]);
    assert!(sheet.entries.iter().all(|e| e.kind == EntryKind::OneOff));
}

#[tokio::test]
async fn test_empty_balance_sheet_shows_starting_balance() {
    let server = test_server().await;

    server
        .put("/api/v1/users/1/balance")
        .json(&serde_json::json!({ "balance": "200" }))
        .await
        .assert_status(StatusCode::OK);

    let sheet = balance_sheet(&server, 1, "2021-01-01").await;

    assert!(sheet.entries.is_empty());
    assert_eq!(sheet.opening_balance, dec(200));
    assert_eq!(sheet.closing_balance, dec(200));
}

#[tokio::test]
async fn test_balance_sheet_and_financial_planner() {
    let server = test_server().await;

    let mut salary = recurring_request(date(2024, 1, 25), 2500, BasePeriod::Monthly);
    salary.name = Some("Salary".to_string());
    salary.is_salary = Some(true);
    salary.end_date = Some(date(2024, 2, 29));
    create_recurring(&server, 1, &salary).await;

    let mut rent = recurring_request(date(2024, 2, 1), -900, BasePeriod::Monthly);
    rent.end_date = Some(date(2024, 3, 1));
    create_recurring(&server, 1, &rent).await;

    // Another user's rule never shows up
    create_recurring(
        &server,
        2,
        &recurring_request(date(2024, 1, 1), -1, BasePeriod::Daily),
    )
    .await;

    server
        .put("/api/v1/users/1/balance")
        .json(&serde_json::json!({ "balance": "1000" }))
        .await
        .assert_status(StatusCode::OK);

    let sheet = balance_sheet(&server, 1, "2024-01-10").await;
    let rows: Vec<_> = sheet
        .entries
        .iter()
        .map(|e| (e.date, e.amount, e.balance, e.unallocated))
        .collect();
    assert_eq!(
        rows,
        vec![
            (date(2024, 1, 25), dec(2500), dec(3500), None),
            (date(2024, 2, 1), dec(-900), dec(2600), None),
            (date(2024, 2, 25), dec(2500), dec(5100), Some(dec(1600))),
            (date(2024, 3, 1), dec(-900), dec(4200), None),
        ]
    );
    assert_eq!(sheet.closing_balance, dec(4200));

    let response = server
        .get("/api/v1/users/1/financial-planner")
        .add_query_param("today", "2024-01-10")
        .await;
    response.assert_status(StatusCode::OK);
    let body: ApiResponse<FinancialPlannerDto> = response.json();
    let salaries: Vec<_> = body
        .data
        .salaries
        .iter()
        .map(|e| (e.date, e.balance, e.unallocated))
        .collect();
    assert_eq!(
        salaries,
        vec![
            (date(2024, 1, 25), dec(2500), None),
            (date(2024, 2, 25), dec(4100), Some(dec(1600))),
        ]
    );
}

#[tokio::test]
async fn test_stored_rule_with_invalid_frequency_is_unprocessable() {
    let (app, state) = setup_test_app_with_state().await;
    let server = TestServer::new(app).unwrap();

    // Bypasses request validation on purpose
    recurring_transaction::ActiveModel {
        name: Set(Some("Broken".to_string())),
        amount: Set(dec(-10)),
        start_date: Set(date(2024, 1, 1)),
        end_date: Set(None),
        base_period: Set(BasePeriod::Monthly),
        frequency: Set(0),
        is_salary: Set(false),
        owner_id: Set(1),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap();

    let response = server
        .get("/api/v1/users/1/balance-sheet")
        .add_query_param("today", "2024-01-10")
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "INVALID_RULE");
    assert!(!body.success);
}
