//! HTTP client tests against a mock Mercury server.

use mercury_cli::client::{
    ClientError, Credentials, MercuryClient, MercuryConfig, ReportEnvelope, SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
};
use mercury_report::{
    test_utils::{
        fixture_full_report, sign_report, signer, v1_fixture_full_report, v3_report,
        FIXTURE_BLOB, V1_FIXTURE_BLOB, V2_FEED, V3_FEED,
    },
    FeedId, ReportSchema,
};
use rstest::rstest;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, Request, ResponseTemplate,
};

const LEGACY_FEED_HEX: &str = "0x4254432d5553442d415242495452554d2d544553544e45540000000000000000";

fn client(server: &MockServer) -> MercuryClient {
    MercuryClient::new(MercuryConfig::new(server.uri().parse().unwrap())).unwrap()
}

fn signed_client(server: &MockServer) -> MercuryClient {
    let config = MercuryConfig::new(server.uri().parse().unwrap())
        .with_credentials(Credentials::new("client-id", "client-key"));
    MercuryClient::new(config).unwrap()
}

/// Accepts a request only if its HMAC headers were produced with `client-key`.
fn valid_signature(request: &Request) -> bool {
    let Some(timestamp) = request
        .headers
        .get(TIMESTAMP_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
    else {
        return false;
    };
    let Some(signature) = request.headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let path = match request.url.query() {
        Some(query) => format!("{}?{query}", request.url.path()),
        None => request.url.path().to_string(),
    };
    let expected = Credentials::new("client-id", "client-key")
        .signature(request.method.as_str(), &path, &request.body, timestamp)
        .unwrap();
    signature == expected
}

#[tokio::test]
async fn test_get_legacy_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/client"))
        .and(query_param("feedIdHex", LEGACY_FEED_HEX))
        .and(query_param("blockNumber", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chainlinkBlob": FIXTURE_BLOB })))
        .expect(1)
        .mount(&server)
        .await;

    let feed: FeedId = LEGACY_FEED_HEX.parse().unwrap();
    let full = client(&server).get_legacy_report(feed, 1000).await.unwrap();
    assert_eq!(full, fixture_full_report());
}

#[tokio::test]
async fn test_signed_requests_carry_valid_hmac() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/client"))
        .and(header("Authorization", "client-id"))
        .and(valid_signature)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chainlinkBlob": FIXTURE_BLOB })))
        .expect(1)
        .mount(&server)
        .await;

    let feed: FeedId = LEGACY_FEED_HEX.parse().unwrap();
    signed_client(&server).get_legacy_report(feed, 5).await.unwrap();
}

#[tokio::test]
async fn test_unsigned_request_rejected_by_signing_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/client"))
        .and(valid_signature)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chainlinkBlob": FIXTURE_BLOB })))
        .mount(&server)
        .await;

    let feed: FeedId = LEGACY_FEED_HEX.parse().unwrap();
    let err = client(&server).get_legacy_report(feed, 5).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }), "{err}");
}

#[tokio::test]
async fn test_get_report_v3() {
    let server = MockServer::start().await;
    let full = sign_report(&v3_report(V3_FEED, 1_700_000_000, 99).into(), &[signer(1)]);
    let envelope = ReportEnvelope {
        feed_id: V3_FEED,
        valid_from_timestamp: 1_699_999_999,
        observations_timestamp: 1_700_000_000,
        full_report: full.to_hex(),
    };
    Mock::given(method("GET"))
        .and(path("/api/v1/reports"))
        .and(query_param("feedID", V3_FEED.to_string()))
        .and(query_param("timestamp", "1700000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "report": envelope })))
        .mount(&server)
        .await;

    let received = client(&server).get_report(V3_FEED, 1_700_000_000).await.unwrap();
    assert_eq!(received, envelope);
    let report = received.decode().unwrap().report_auto().unwrap();
    assert_eq!(report.schema(), ReportSchema::V3);
}

#[tokio::test]
async fn test_get_reports_bulk_joins_feed_ids() {
    let server = MockServer::start().await;
    let other: FeedId = LEGACY_FEED_HEX.parse().unwrap();
    let ids = format!("{V3_FEED},{other}");
    Mock::given(method("GET"))
        .and(path("/api/v1/reports/bulk"))
        .and(query_param("feedIDs", ids.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reports": [{
                "feedID": V3_FEED.to_string(),
                "validFromTimestamp": 0,
                "observationsTimestamp": 0,
                "fullReport": FIXTURE_BLOB,
            }]
        })))
        .mount(&server)
        .await;

    let reports = client(&server).get_reports_bulk(&[V3_FEED, other], 0).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].decode().unwrap(), fixture_full_report());
}

#[tokio::test]
async fn test_bulk_fixture_decodes_as_v1() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reports/bulk"))
        .and(query_param("feedIDs", V2_FEED.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reports": [{
                "feedID": V2_FEED.to_string(),
                "validFromTimestamp": 0,
                "observationsTimestamp": 0,
                "fullReport": V1_FIXTURE_BLOB,
            }]
        })))
        .mount(&server)
        .await;

    let reports = client(&server).get_reports_bulk(&[V2_FEED], 1_686_707_352).await.unwrap();
    let full = reports[0].decode().unwrap();
    assert_eq!(full, v1_fixture_full_report());
    assert_eq!(full.report_auto().unwrap().schema(), ReportSchema::V1);
}

#[rstest]
#[case(200, Some(true))]
#[case(401, Some(false))]
#[case(500, None)]
#[tokio::test]
async fn test_is_admin(#[case] status: u16, #[case] expected: Option<bool>) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/user"))
        .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
        .mount(&server)
        .await;

    let result = signed_client(&server).is_admin().await;
    match expected {
        Some(admin) => assert_eq!(result.unwrap(), admin),
        None => assert!(matches!(
            result,
            Err(ClientError::Status { status: 500, ref body }) if body == "nope"
        )),
    }
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mercury/admin/user"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/mercury", server.uri()).parse().unwrap();
    let client = MercuryClient::new(MercuryConfig::new(url)).unwrap();
    assert!(client.is_admin().await.unwrap());
}

#[tokio::test]
async fn test_malformed_blob_is_report_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chainlinkBlob": "0x1234" })))
        .mount(&server)
        .await;

    let feed: FeedId = LEGACY_FEED_HEX.parse().unwrap();
    let err = client(&server).get_legacy_report(feed, 1).await.unwrap_err();
    assert!(matches!(err, ClientError::Report(_)), "{err}");
}
