//! Integration tests for the DTM client.
//!
//! These tests verify the full request/response cycle against a local mock
//! server: query-parameter assembly, envelope normalization, tabular
//! reshaping, and the error taxonomy.

use mockito::{Matcher, Server};
use serde_json::{Value, json};

use dtmapi::{DtmClient, Error, IdpFilters, Record, RecordSet};

fn success_body(result: Value) -> String {
    json!({
        "isSuccess": true,
        "result": result,
        "errorMessages": [],
    })
    .to_string()
}

fn records(fixture: Value) -> Vec<Record> {
    serde_json::from_value(fixture).unwrap()
}

#[tokio::test]
async fn test_get_all_countries_tabular() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Common/GetAllCountryList")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(json!([
            {"admin0Name": "Ethiopia", "admin0Pcode": "ETH"},
            {"admin0Name": "Sudan", "admin0Pcode": "SDN"},
        ])))
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let countries = client.get_all_countries().await.unwrap();

    assert_eq!(countries.columns(), ["admin0Name", "admin0Pcode"]);
    assert_eq!(countries.len(), 2);
    assert_eq!(countries.get(1, "admin0Pcode"), Some(&json!("SDN")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_all_operations_raw_is_unchanged() {
    let fixture = json!([
        {"operation": "Flood Response", "admin0Pcode": "PAK"},
        {"operation": "Drought Response"},
    ]);

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/Common/GetAllOperationList")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(fixture.clone()))
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let operations = client.get_all_operations_raw().await.unwrap();

    assert_eq!(operations, records(fixture));
}

#[tokio::test]
async fn test_admin0_tabular_union_and_null_fill() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/IdpAdmin0Data/GetAdmin0Datav2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(json!([
            {"a": 1},
            {"a": 2, "b": 3},
        ])))
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let data = client
        .get_idp_admin0_data(&IdpFilters::for_country("Ethiopia"))
        .await
        .unwrap();

    assert_eq!(data.columns(), ["a", "b"]);
    assert_eq!(data.get(0, "a"), Some(&json!(1)));
    assert_eq!(data.get(0, "b"), Some(&Value::Null));
    assert_eq!(data.get(1, "a"), Some(&json!(2)));
    assert_eq!(data.get(1, "b"), Some(&json!(3)));
}

#[tokio::test]
async fn test_tabular_round_trip() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/IdpAdmin0Data/GetAdmin0Datav2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(json!([
            {"a": 1},
            {"a": 2, "b": 3},
        ])))
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let raw = client
        .get_idp_admin0_data_raw(&IdpFilters::for_country("Ethiopia"))
        .await
        .unwrap();

    let round_tripped = RecordSet::from_records(raw).to_records();
    assert_eq!(
        round_tripped,
        records(json!([
            {"a": 1, "b": null},
            {"a": 2, "b": 3},
        ]))
    );
}

#[tokio::test]
async fn test_set_filters_are_sent_url_encoded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/IdpAdmin1Data/GetAdmin1Datav2")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("CountryName".into(), "Côte d'Ivoire".into()),
            Matcher::UrlEncoded("Admin1Name".into(), "Lagunes".into()),
            Matcher::UrlEncoded("FromRoundNumber".into(), "4".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(json!([])))
        .create_async()
        .await;

    let filters = IdpFilters {
        country_name: Some("Côte d'Ivoire".to_string()),
        admin1_name: Some("Lagunes".to_string()),
        from_round_number: Some(4),
        ..Default::default()
    };

    let client = DtmClient::with_base_url(&server.url());
    client.get_idp_admin1_data(&filters).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_admin2_filters_reach_the_wire() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/IdpAdmin2Data/GetAdmin2Datav2")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("Operation".into(), "Ukraine Response".into()),
            Matcher::UrlEncoded("Admin2Pcode".into(), "UA0512".into()),
            Matcher::UrlEncoded("FromReportingDate".into(), "2023-01-01".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(json!([])))
        .create_async()
        .await;

    let filters = IdpFilters {
        operation: Some("Ukraine Response".to_string()),
        admin2_pcode: Some("UA0512".to_string()),
        from_reporting_date: Some("2023-01-01".to_string()),
        ..Default::default()
    };

    let client = DtmClient::with_base_url(&server.url());
    client.get_idp_admin2_data(&filters).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unidentified_request_is_still_sent() {
    // No identifying filter set; the convention is the server's to enforce.
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/IdpAdmin0Data/GetAdmin0Datav2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(json!([])))
        .create_async()
        .await;

    let filters = IdpFilters::default();
    assert!(!filters.has_identifying_filter());

    let client = DtmClient::with_base_url(&server.url());
    let data = client.get_idp_admin0_data(&filters).await.unwrap();

    assert!(data.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_rejection_carries_exact_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/IdpAdmin0Data/GetAdmin0Datav2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "isSuccess": false,
                "result": [],
                "errorMessages": ["bad date"],
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let err = client
        .get_idp_admin0_data(&IdpFilters::for_country("Ethiopia"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Rejected(_)));
    assert_eq!(err.to_string(), "bad date");
}

#[tokio::test]
async fn test_transport_error_is_distinct_from_rejection() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/IdpAdmin0Data/GetAdmin0Datav2")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let err = client
        .get_idp_admin0_data(&IdpFilters::for_country("Ethiopia"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_rejection_applies_to_common_endpoints_too() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/Common/GetAllCountryList")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "isSuccess": false,
                "errorMessages": ["service unavailable"],
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let err = client.get_all_countries().await.unwrap_err();

    assert_eq!(err.to_string(), "service unavailable");
}

#[tokio::test]
async fn test_envelope_without_success_flag_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/IdpAdmin0Data/GetAdmin0Datav2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"result": []}).to_string())
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let err = client
        .get_idp_admin0_data(&IdpFilters::for_country("Ethiopia"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Malformed("isSuccess")));
}

#[tokio::test]
async fn test_success_without_result_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/IdpAdmin0Data/GetAdmin0Datav2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"isSuccess": true, "errorMessages": []}).to_string())
        .create_async()
        .await;

    let client = DtmClient::with_base_url(&server.url());
    let err = client
        .get_idp_admin0_data(&IdpFilters::for_country("Ethiopia"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Malformed("result")));
}
