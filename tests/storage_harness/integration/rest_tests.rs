//! REST integration test macro for storage backends
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that run the
//! full router over one backend: JSON → handler → service → store → JSON.

/// Generate a REST integration test suite for a storage backend.
///
/// `$factory` must evaluate to a fresh `paytrack::storage::Stores`.
///
/// # Generated Tests
///
/// ## CRUD
/// - `test_rest_create`, `test_rest_get`, `test_rest_list`
/// - `test_rest_update_merges_fields`, `test_rest_update_keeps_immutable_keys`
/// - `test_rest_delete`
///
/// ## Pagination / Filter / Sort
/// - `test_rest_list_pagination`, `test_rest_list_page_past_the_end`
/// - `test_rest_list_filter`, `test_rest_list_filter_by_bare_date`, `test_rest_list_sort`
///
/// ## Population and payment queries
/// - `test_rest_payment_is_populated`, `test_rest_dangling_reference_is_null`
/// - `test_rest_shop_embeds_region_and_payments`
/// - `test_rest_payments_all_date_range`, `test_rest_payments_all_by_shop`
/// - `test_rest_payments_for_date`
///
/// ## Error handling
/// - not found, invalid uuid, missing input, malformed JSON, failed validation,
///   bad dates and missing `date`
/// - unparseable query arguments, unknown sort direction, five-digit years
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use serde_json::{Value, json};
            use storage_harness::integration::{build_test_router, create_via_api, id_of};

            async fn make_server() -> TestServer {
                let stores = $factory;
                TestServer::new(build_test_router(stores))
            }

            /// Area, shop, company and collector every payment test refers to
            struct Fixture {
                area: Value,
                shop: Value,
                company: Value,
                collector: Value,
            }

            async fn seed(server: &TestServer) -> Fixture {
                let area = create_via_api(server, "areas", "area", json!({ "name": "Gulshan" })).await;
                let shop = create_via_api(
                    server,
                    "shops",
                    "shop",
                    json!({ "name": "Corner Store", "address": "Road 11", "region": id_of(&area) }),
                )
                .await;
                let company =
                    create_via_api(server, "companies", "company", json!({ "name": "Acme" })).await;
                let collector = create_via_api(
                    server,
                    "collectors",
                    "collector",
                    json!({ "name": "Karim", "phone": "01712345678", "email": "karim@example.com" }),
                )
                .await;

                Fixture { area, shop, company, collector }
            }

            async fn create_payment(server: &TestServer, fixture: &Fixture, invoice: &str, date: &str) -> Value {
                create_via_api(
                    server,
                    "payments",
                    "payment",
                    json!({
                        "invoice": invoice,
                        "shop": id_of(&fixture.shop),
                        "company": id_of(&fixture.company),
                        "collector": id_of(&fixture.collector),
                        "amount": 500.0,
                        "paidAmount": 300.0,
                        "dueAmount": 200.0,
                        "paymentDate": date,
                        "paymentStatus": "partial",
                        "paymentMethod": "cash"
                    }),
                )
                .await
            }

            fn invoices(body: &Value) -> Vec<String> {
                body["payments"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|p| p["invoice"].as_str().unwrap().to_string())
                    .collect()
            }

            // ==============================================================
            // CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;

                let response = server
                    .post("/collectors")
                    .json(&json!({
                        "input": { "name": "Rahim", "phone": "01812345678", "email": "rahim@example.com" }
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["message"], "collector created");
                assert_eq!(body["collector"]["name"], "Rahim");
                assert_eq!(body["collector"]["phone"], "01812345678");
                uuid::Uuid::parse_str(body["collector"]["_id"].as_str().unwrap()).unwrap();
                assert!(body["collector"]["createdAt"].is_string());
                assert_eq!(body["collector"]["createdAt"], body["collector"]["updatedAt"]);
            }

            #[tokio::test]
            async fn test_rest_get() {
                let server = make_server().await;
                let company = create_via_api(&server, "companies", "company", json!({ "name": "Acme" })).await;
                let id = id_of(&company);

                let response = server.get(&format!("/companies/{}", id)).await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["company"]["_id"], id.as_str());
                assert_eq!(body["company"]["name"], "Acme");
            }

            #[tokio::test]
            async fn test_rest_list() {
                let server = make_server().await;
                for name in ["Banani", "Dhanmondi", "Mirpur"] {
                    create_via_api(&server, "areas", "area", json!({ "name": name })).await;
                }

                let response = server.get("/areas").await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["areas"].as_array().unwrap().len(), 3);
                assert_eq!(body["pagination"]["total"], 3);
                assert_eq!(body["pagination"]["page"], 1);
            }

            #[tokio::test]
            async fn test_rest_update_merges_fields() {
                let server = make_server().await;
                let collector = create_via_api(
                    &server,
                    "collectors",
                    "collector",
                    json!({ "name": "Karim", "phone": "01712345678", "email": "karim@example.com" }),
                )
                .await;
                let id = id_of(&collector);

                let response = server
                    .patch(&format!("/collectors/{}", id))
                    .json(&json!({ "input": { "phone": "01998765432" } }))
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["message"], "collector updated");
                assert_eq!(body["collector"]["phone"], "01998765432");
                assert_eq!(body["collector"]["name"], "Karim");
                assert_eq!(body["collector"]["email"], "karim@example.com");
                assert_eq!(body["collector"]["createdAt"], collector["createdAt"]);

                let stored: Value = server.get(&format!("/collectors/{}", id)).await.json();
                assert_eq!(stored["collector"]["phone"], "01998765432");
            }

            #[tokio::test]
            async fn test_rest_update_keeps_immutable_keys() {
                let server = make_server().await;
                let area = create_via_api(&server, "areas", "area", json!({ "name": "Banani" })).await;
                let id = id_of(&area);

                let response = server
                    .patch(&format!("/areas/{}", id))
                    .json(&json!({
                        "input": {
                            "_id": uuid::Uuid::new_v4().to_string(),
                            "createdAt": "2000-01-01T00:00:00.000Z",
                            "name": "Banani DOHS"
                        }
                    }))
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["area"]["_id"], id.as_str());
                assert_eq!(body["area"]["createdAt"], area["createdAt"]);
                assert_eq!(body["area"]["name"], "Banani DOHS");
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let server = make_server().await;
                let area = create_via_api(&server, "areas", "area", json!({ "name": "Uttara" })).await;
                let id = id_of(&area);

                let response = server.delete(&format!("/areas/{}", id)).await;
                response.assert_status_ok();
                response.assert_json(&json!({ "message": "area deleted" }));

                let gone = server.get(&format!("/areas/{}", id)).await;
                gone.assert_status(StatusCode::NOT_FOUND);
                let body: Value = gone.json();
                assert_eq!(body["code"], "ENTITY_NOT_FOUND");
            }

            // ==============================================================
            // Pagination / Filter / Sort
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_pagination() {
                let server = make_server().await;
                for i in 0..5 {
                    create_via_api(&server, "companies", "company", json!({ "name": format!("Co {}", i) })).await;
                }

                let response = server
                    .get("/companies")
                    .add_query_param("page", 2)
                    .add_query_param("limit", 2)
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["companies"].as_array().unwrap().len(), 2);
                assert_eq!(body["pagination"]["total"], 5);
                assert_eq!(body["pagination"]["totalPages"], 3);
                assert_eq!(body["pagination"]["hasNext"], true);
                assert_eq!(body["pagination"]["hasPrev"], true);
            }

            #[tokio::test]
            async fn test_rest_list_page_past_the_end() {
                let server = make_server().await;
                create_via_api(&server, "areas", "area", json!({ "name": "Banani" })).await;

                let response = server
                    .get("/areas")
                    .add_query_param("page", u64::MAX)
                    .add_query_param("limit", 100)
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert!(body["areas"].as_array().unwrap().is_empty());
                assert_eq!(body["pagination"]["total"], 1);
                assert_eq!(body["pagination"]["hasNext"], false);
            }

            #[tokio::test]
            async fn test_rest_list_filter() {
                let server = make_server().await;
                for name in ["Banani", "Dhanmondi"] {
                    create_via_api(&server, "areas", "area", json!({ "name": name })).await;
                }

                let response = server
                    .get("/areas")
                    .add_query_param("filter", r#"{"name":"Dhanmondi"}"#)
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                let areas = body["areas"].as_array().unwrap();
                assert_eq!(areas.len(), 1);
                assert_eq!(areas[0]["name"], "Dhanmondi");
            }

            #[tokio::test]
            async fn test_rest_list_filter_by_bare_date() {
                let server = make_server().await;
                let fixture = seed(&server).await;
                create_payment(&server, &fixture, "INV-9", "2024-02-09").await;
                create_payment(&server, &fixture, "INV-10", "2024-02-10").await;

                let body: Value = server
                    .get("/payments")
                    .add_query_param("filter", r#"{"paymentDate":"2024-02-10"}"#)
                    .await
                    .json();
                assert_eq!(invoices(&body), vec!["INV-10"]);

                let body: Value = server
                    .get("/payments")
                    .add_query_param("filter", r#"{"paymentDate<=":"2024-02-09"}"#)
                    .await
                    .json();
                assert_eq!(invoices(&body), vec!["INV-9"]);
            }

            #[tokio::test]
            async fn test_rest_list_sort() {
                let server = make_server().await;
                for name in ["Mirpur", "Banani", "Dhanmondi"] {
                    create_via_api(&server, "areas", "area", json!({ "name": name })).await;
                }

                let response = server.get("/areas").add_query_param("sort", "name:asc").await;

                let body: Value = response.json();
                let names: Vec<&str> = body["areas"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|a| a["name"].as_str().unwrap())
                    .collect();
                assert_eq!(names, vec!["Banani", "Dhanmondi", "Mirpur"]);
            }

            // ==============================================================
            // Population and payment queries
            // ==============================================================

            #[tokio::test]
            async fn test_rest_payment_is_populated() {
                let server = make_server().await;
                let fixture = seed(&server).await;
                let payment = create_payment(&server, &fixture, "INV-1", "2024-02-10").await;

                assert_eq!(payment["shop"]["name"], "Corner Store");
                assert_eq!(payment["shop"]["region"]["name"], "Gulshan");
                assert_eq!(payment["company"]["name"], "Acme");
                assert_eq!(payment["collector"]["name"], "Karim");

                let body: Value = server
                    .get(&format!("/payments/{}", id_of(&payment)))
                    .await
                    .json();
                assert_eq!(body["payment"]["shop"]["_id"], fixture.shop["_id"]);
                assert_eq!(body["payment"]["paymentDate"], "2024-02-10T00:00:00.000Z");
                assert_eq!(body["payment"]["dueAmount"], 200.0);
            }

            #[tokio::test]
            async fn test_rest_dangling_reference_is_null() {
                let server = make_server().await;
                let fixture = seed(&server).await;
                let payment = create_payment(&server, &fixture, "INV-1", "2024-02-10").await;

                server
                    .delete(&format!("/companies/{}", id_of(&fixture.company)))
                    .await
                    .assert_status_ok();

                let body: Value = server
                    .get(&format!("/payments/{}", id_of(&payment)))
                    .await
                    .json();
                assert!(body["payment"]["company"].is_null());
                assert_eq!(body["payment"]["shop"]["name"], "Corner Store");
            }

            #[tokio::test]
            async fn test_rest_shop_embeds_region_and_payments() {
                let server = make_server().await;
                let fixture = seed(&server).await;
                create_payment(&server, &fixture, "INV-1", "2024-01-10").await;
                create_payment(&server, &fixture, "INV-2", "2024-02-10").await;

                let body: Value = server
                    .get(&format!("/shops/{}", id_of(&fixture.shop)))
                    .await
                    .json();

                assert_eq!(body["shop"]["region"]["_id"], fixture.area["_id"]);
                assert_eq!(invoices(&json!({ "payments": body["shop"]["payments"] })), vec!["INV-2", "INV-1"]);
            }

            #[tokio::test]
            async fn test_rest_payments_all_date_range() {
                let server = make_server().await;
                let fixture = seed(&server).await;
                for (invoice, date) in [
                    ("INV-JAN", "2024-01-31T23:00:00Z"),
                    ("INV-FEB-1", "2024-02-01"),
                    ("INV-FEB-29", "2024-02-29T18:30:00Z"),
                    ("INV-MAR", "2024-03-01"),
                ] {
                    create_payment(&server, &fixture, invoice, date).await;
                }

                let response = server
                    .get("/payments/all")
                    .add_query_param("from", "2024-02-01")
                    .add_query_param("to", "2024-02-29")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(invoices(&body), vec!["INV-FEB-29", "INV-FEB-1"]);
                assert_eq!(body["payments"][0]["shop"]["region"]["name"], "Gulshan");
            }

            #[tokio::test]
            async fn test_rest_payments_all_by_shop() {
                let server = make_server().await;
                let fixture = seed(&server).await;
                let other_shop = create_via_api(
                    &server,
                    "shops",
                    "shop",
                    json!({ "name": "Other", "region": id_of(&fixture.area) }),
                )
                .await;
                create_payment(&server, &fixture, "INV-1", "2024-02-10").await;
                create_via_api(
                    &server,
                    "payments",
                    "payment",
                    json!({
                        "invoice": "INV-2",
                        "shop": id_of(&other_shop),
                        "company": id_of(&fixture.company),
                        "amount": 10.0
                    }),
                )
                .await;

                let body: Value = server
                    .get("/payments/all")
                    .add_query_param("shop", id_of(&other_shop))
                    .await
                    .json();
                assert_eq!(invoices(&body), vec!["INV-2"]);

                let everything: Value = server.get("/payments/all").await.json();
                assert_eq!(everything["payments"].as_array().unwrap().len(), 2);
            }

            #[tokio::test]
            async fn test_rest_payments_for_date() {
                let server = make_server().await;
                let fixture = seed(&server).await;
                create_payment(&server, &fixture, "INV-EARLY", "2024-02-10T01:00:00Z").await;
                create_payment(&server, &fixture, "INV-LATE", "2024-02-10T22:00:00Z").await;
                create_payment(&server, &fixture, "INV-NEXT", "2024-02-11T00:00:00Z").await;

                let response = server
                    .get("/payments/date")
                    .add_query_param("date", "2024-02-10")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(invoices(&body), vec!["INV-LATE", "INV-EARLY"]);
            }

            // ==============================================================
            // Error handling
            // ==============================================================

            #[tokio::test]
            async fn test_rest_error_not_found() {
                let server = make_server().await;
                let missing = uuid::Uuid::new_v4();

                for response in [
                    server.get(&format!("/shops/{}", missing)).await,
                    server
                        .patch(&format!("/shops/{}", missing))
                        .json(&json!({ "input": { "name": "x" } }))
                        .await,
                    server.delete(&format!("/shops/{}", missing)).await,
                ] {
                    response.assert_status(StatusCode::NOT_FOUND);
                    let body: Value = response.json();
                    assert_eq!(body["code"], "ENTITY_NOT_FOUND");
                    assert_eq!(body["details"]["id"], missing.to_string());
                }
            }

            #[tokio::test]
            async fn test_rest_error_invalid_uuid() {
                let server = make_server().await;

                let response = server.get("/payments/not-a-uuid").await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_UUID");
            }

            #[tokio::test]
            async fn test_rest_error_missing_input() {
                let server = make_server().await;

                let response = server.post("/areas").json(&json!({ "name": "Banani" })).await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "MISSING_ARGUMENT");
            }

            #[tokio::test]
            async fn test_rest_error_malformed_json() {
                let server = make_server().await;

                let response = server
                    .post("/areas")
                    .text("{ \"input\": ")
                    .content_type("application/json")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_JSON");
            }

            #[tokio::test]
            async fn test_rest_error_validation() {
                let server = make_server().await;

                let response = server
                    .post("/collectors")
                    .json(&json!({
                        "input": { "name": "Karim", "phone": "12", "email": "karim@example.com" }
                    }))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                assert_eq!(body["details"]["fields"][0]["field"], "phone");

                let listed: Value = server.get("/collectors").await.json();
                assert!(listed["collectors"].as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_rest_error_bad_dates() {
                let server = make_server().await;

                let bad_range = server.get("/payments/all").add_query_param("from", "yesterday").await;
                bad_range.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(bad_range.json::<Value>()["code"], "INVALID_DATE");

                let missing = server.get("/payments/date").await;
                missing.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(missing.json::<Value>()["code"], "MISSING_ARGUMENT");
            }

            #[tokio::test]
            async fn test_rest_error_unparseable_query() {
                let server = make_server().await;

                for (key, value) in [("page", "abc"), ("limit", "-5")] {
                    let response = server.get("/areas").add_query_param(key, value).await;

                    response.assert_status(StatusCode::BAD_REQUEST);
                    let body: Value = response.json();
                    assert_eq!(body["code"], "INVALID_ARGUMENT");
                    assert!(body["message"].as_str().unwrap().contains(key));
                }
            }

            #[tokio::test]
            async fn test_rest_error_unknown_sort_direction() {
                let server = make_server().await;
                create_via_api(&server, "areas", "area", json!({ "name": "Banani" })).await;

                let response = server.get("/areas").add_query_param("sort", "name:sideways").await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_ARGUMENT");
            }

            #[tokio::test]
            async fn test_rest_error_five_digit_year() {
                let server = make_server().await;
                let fixture = seed(&server).await;

                let response = server
                    .post("/payments")
                    .json(&json!({
                        "input": {
                            "invoice": "INV-FAR",
                            "shop": id_of(&fixture.shop),
                            "company": id_of(&fixture.company),
                            "amount": 10.0,
                            "paymentDate": "+12345-01-01"
                        }
                    }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let listed: Value = server.get("/payments").await.json();
                assert!(listed["payments"].as_array().unwrap().is_empty());

                let bad_range = server.get("/payments/all").add_query_param("from", "+12345-01-01").await;
                bad_range.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(bad_range.json::<Value>()["code"], "INVALID_DATE");
            }

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server().await;
                server
                    .get("/health")
                    .await
                    .assert_json(&json!({ "status": "ok", "service": "paytrack" }));
            }
        }
    };
}
