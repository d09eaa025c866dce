//! Application router configuration.

use axum::{
    Router,
    routing::{get, put},
};

use crate::{
    AppState, Error,
    dashboard::{get_dashboard_endpoint, get_weekly_report_endpoint},
    endpoints,
    goal::{create_goal_endpoint, delete_goal_endpoint, edit_goal_endpoint, get_goals_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_categories_endpoint, get_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .route(
            endpoints::GOALS,
            get(get_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            put(edit_goal_endpoint).delete(delete_goal_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::WEEKLY_REPORT, get(get_weekly_report_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod routing_tests {
    use axum::http::{StatusCode, header::LOCATION};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints, user::USER_ID_HEADER};

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();
        let app = build_router(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn transaction_lifecycle() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "type": "expense",
                "title": "Groceries",
                "amount": 54.2,
                "category": "Food",
                "created_at": "2024-03-15T10:00:00Z"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.header(LOCATION), "/api/transactions/1");
        let created = response.json::<Value>();
        assert_eq!(created["type"], "expense");
        assert_eq!(created["created_at"], "2024-03-15T10:00:00Z");

        let response = server
            .put("/api/transactions/1")
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "title": "Train",
                "amount": 4.5,
                "category": "Transportation"
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["type"], "expense");

        let response = server
            .get("/api/transactions/1")
            .add_header(USER_ID_HEADER, "user-1")
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["title"], "Train");

        server
            .delete("/api/transactions/1")
            .add_header(USER_ID_HEADER, "user-1")
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete("/api/transactions/1")
            .add_header(USER_ID_HEADER, "user-1")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn lists_transactions_newest_first_by_type() {
        let server = get_test_server();
        for (transaction_type, title, category, created_at) in [
            ("income", "Pay", "Salary & Wages", "2024-03-01T00:00:00Z"),
            ("expense", "Older", "Food", "2024-03-02T00:00:00Z"),
            ("expense", "Newer", "Food", "2024-03-20T00:00:00Z"),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .add_header(USER_ID_HEADER, "user-1")
                .json(&json!({
                    "type": transaction_type,
                    "title": title,
                    "amount": 10.0,
                    "category": category,
                    "created_at": created_at
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("type", "expense")
            .add_header(USER_ID_HEADER, "user-1")
            .await;

        response.assert_status_ok();
        let titles: Vec<String> = response
            .json::<Vec<Value>>()
            .iter()
            .map(|transaction| transaction["title"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn other_users_transactions_are_not_found() {
        let server = get_test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "type": "income",
                "title": "Pay",
                "amount": 100.0,
                "category": "Salary & Wages"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .get("/api/transactions/1")
            .add_header(USER_ID_HEADER, "user-2")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn invalid_transaction_is_unprocessable() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "type": "income",
                "title": "Groceries",
                "amount": 54.2,
                "category": "Food"
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(
            response.json::<Value>()["error"]
                .as_str()
                .unwrap()
                .contains("Food")
        );
    }

    #[tokio::test]
    async fn goal_lifecycle() {
        let server = get_test_server();

        let response = server
            .post(endpoints::GOALS)
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "title": "Holiday",
                "target_amount": 500.0,
                "current_amount": 125.0
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.header(LOCATION), "/api/goals/1");

        let response = server
            .get(endpoints::GOALS)
            .add_header(USER_ID_HEADER, "user-1")
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()[0]["progress"], 0.25);

        server
            .put("/api/goals/1")
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "title": "Holiday",
                "target_amount": 0.0,
                "current_amount": 10.0
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        server
            .delete("/api/goals/1")
            .add_header(USER_ID_HEADER, "user-1")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn serves_reports() {
        let server = get_test_server();
        for body in [
            json!({
                "type": "income",
                "title": "Pay",
                "amount": 100.0,
                "category": "Salary & Wages",
                "created_at": "2024-03-01T00:00:00Z"
            }),
            json!({
                "type": "expense",
                "title": "Groceries",
                "amount": 40.0,
                "category": "Food",
                "created_at": "2024-03-15T00:00:00Z"
            }),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .add_header(USER_ID_HEADER, "user-1")
                .json(&body)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let dashboard = server
            .get(endpoints::DASHBOARD)
            .add_header(USER_ID_HEADER, "user-1")
            .await
            .json::<Value>();
        let weekly = server
            .get(endpoints::WEEKLY_REPORT)
            .add_query_param("type", "expense")
            .add_query_param("anchor", "2024-03-15")
            .add_header(USER_ID_HEADER, "user-1")
            .await
            .json::<Value>();

        assert_eq!(dashboard["totals"]["balance"], 60.0);
        assert_eq!(weekly["total"], 40.0);
        assert_eq!(weekly["categories"]["Food"], 40.0);
    }

    #[tokio::test]
    async fn lists_categories() {
        let server = get_test_server();

        let response = server
            .get(endpoints::CATEGORIES)
            .add_query_param("type", "expense")
            .await;

        response.assert_status_ok();
        let lists = response.json::<Value>();
        assert_eq!(lists[0]["type"], "expense");
        assert_eq!(lists[0]["categories"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn missing_user_id_is_unauthorized() {
        let server = get_test_server();

        server
            .get(endpoints::TRANSACTIONS)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/nothing-here").await;

        response.assert_status_not_found();
        assert!(response.json::<Value>()["error"].is_string());
    }
}
