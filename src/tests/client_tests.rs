//! Client construction and dispatch tests.

use crate::client::{PercipioClient, RequestExecutor, RequestOptions};
use crate::config::ClientConfig;
use crate::errors::{is_client_error, ClientErrorKind, PercipioError, TransportError};
use crate::fixtures::{self, test_config, test_config_with_transport, TEST_BEARER_TOKEN, TEST_ORG_ID};
use crate::mocks::{MockHttpTransport, MockResponse};
use crate::transport::TransportCapabilities;
use futures::future::join_all;
use http::Method;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const COLLECTIONS: &str = "/common/v1/organizations/{orgId}/collections";

fn client_with(mock: MockHttpTransport) -> (PercipioClient, Arc<MockHttpTransport>) {
    let mock = Arc::new(mock);
    let client = PercipioClient::new(test_config_with_transport(mock.clone())).unwrap();
    (client, mock)
}

fn ok_client() -> (PercipioClient, Arc<MockHttpTransport>) {
    client_with(
        MockHttpTransport::new()
            .with_timing()
            .with_default_response(MockResponse::json(json!({"ok": true}))),
    )
}

fn extras(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// Construction

#[test]
fn test_construction_injects_org_id_placeholder() {
    let config = ClientConfig {
        resource_placeholders: extras(&[("orgId", "spoofed"), ("region", "eu")]),
        ..test_config()
    };
    let client = PercipioClient::new(config).unwrap();

    assert_eq!(client.resource_placeholders().get("orgId").unwrap(), TEST_ORG_ID);
    assert_eq!(client.resource_placeholders().get("region").unwrap(), "eu");
    assert_eq!(client.org_id(), TEST_ORG_ID);
}

#[test]
fn test_construction_builds_default_transport() {
    let client = PercipioClient::new(test_config()).unwrap();
    let transport = client.transport();

    assert!(transport.capabilities().is_complete());
    assert_eq!(transport.interceptors().unwrap().request_count(), 1);
    assert_eq!(transport.interceptors().unwrap().response_count(), 1);
}

#[test]
fn test_default_headers() {
    let client = PercipioClient::new(test_config()).unwrap();
    let headers = client.default_headers();

    assert_eq!(headers.get("content-type").unwrap(), "application/json");
    assert_eq!(
        headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Bearer {}", TEST_BEARER_TOKEN)
    );
}

#[test]
fn test_clients_have_distinct_ids() {
    let a = PercipioClient::new(test_config()).unwrap();
    let b = PercipioClient::new(test_config()).unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.clone().id(), a.id());
}

#[test]
fn test_missing_fields_are_required_errors_in_order() {
    let err = PercipioClient::new(ClientConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ClientErrorKind::ConfigurationRequired);
    assert_eq!(err.message(), "baseUrl is a required configuration property");

    let config = ClientConfig {
        org_id: None,
        ..test_config()
    };
    let err = PercipioClient::new(config).unwrap_err();
    assert_eq!(err.message(), "orgId is a required configuration property");

    let config = ClientConfig {
        bearer_token: None,
        ..test_config()
    };
    let err = PercipioClient::new(config).unwrap_err();
    assert!(err.is_required());
    assert_eq!(err.message(), "bearer is a required configuration property");
}

#[test]
fn test_invalid_fields_are_invalid_errors() {
    let bad_url = ClientConfig {
        base_url: Some("http://api.percipio.com".into()),
        ..test_config()
    };
    assert!(PercipioClient::new(bad_url).unwrap_err().is_invalid());

    let bad_org = ClientConfig {
        org_id: Some("not-a-uuid".into()),
        ..test_config()
    };
    assert!(PercipioClient::new(bad_org).unwrap_err().is_invalid());

    let bad_token = ClientConfig::builder()
        .base_url(fixtures::TEST_BASE_URL)
        .org_id(TEST_ORG_ID)
        .bearer_token("not.a.jwt")
        .build();
    let err = PercipioClient::new(bad_token).unwrap_err();
    assert!(err.is_invalid());
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_empty_fields_are_invalid_not_required() {
    let config = ClientConfig::builder()
        .base_url("")
        .org_id(TEST_ORG_ID)
        .bearer_token(TEST_BEARER_TOKEN)
        .build();
    let err = PercipioClient::new(config).unwrap_err();
    assert_eq!(err.kind(), ClientErrorKind::ConfigurationInvalid);
    assert_eq!(err.message(), "baseUrl is invalid, it must be a valid https URL");

    let config = ClientConfig::builder()
        .base_url(fixtures::TEST_BASE_URL)
        .org_id("")
        .bearer_token(TEST_BEARER_TOKEN)
        .build();
    let err = PercipioClient::new(config).unwrap_err();
    assert_eq!(err.kind(), ClientErrorKind::ConfigurationInvalid);
    assert_eq!(err.message(), "orgId is invalid, it must be a uuid");

    let config = ClientConfig::builder()
        .base_url(fixtures::TEST_BASE_URL)
        .org_id(TEST_ORG_ID)
        .bearer_token("")
        .build();
    let err = PercipioClient::new(config).unwrap_err();
    assert_eq!(err.kind(), ClientErrorKind::ConfigurationInvalid);
    assert_eq!(err.message(), "bearer is invalid, it must be a JWT");
}

#[test]
fn test_invalid_url_reported_before_missing_org() {
    let config = ClientConfig::builder().base_url("ftp://example.com").build();
    let err = PercipioClient::new(config).unwrap_err();
    assert!(err.is_invalid());
    assert!(err.message().starts_with("baseUrl"));
}

#[test]
fn test_incomplete_transport_rejected() {
    let partial = Arc::new(
        MockHttpTransport::new().with_capabilities(TransportCapabilities {
            create: true,
            request: true,
            interceptors: false,
        }),
    );
    let err = PercipioClient::new(test_config_with_transport(partial)).unwrap_err();
    assert!(err.is_invalid());
    assert!(err.message().starts_with("transport is invalid"));
}

// Path and header building

#[test]
fn test_build_path() {
    let client = PercipioClient::new(test_config()).unwrap();

    let path = client.build_path("/a/{x}/{y}", &extras(&[("x", "1"), ("y", "2")])).unwrap();
    assert_eq!(path, "/a/1/2");

    let path = client.build_path("/a/{orgId}", &extras(&[("orgId", "spoofed")])).unwrap();
    assert_eq!(path, format!("/a/{}", TEST_ORG_ID));

    let err = client.build_path("/a/{x}", &HashMap::new()).unwrap_err();
    assert!(err.is_required());
    assert!(err.message().contains("x"));
}

#[test]
fn test_build_headers() {
    let client = PercipioClient::new(test_config()).unwrap();

    let headers = client
        .build_headers(&[("X-Custom".to_string(), "v".to_string())])
        .unwrap();
    assert_eq!(headers.get("x-custom").unwrap(), "v");
    assert_eq!(headers.get("content-type").unwrap(), "application/json");
    assert!(headers.get("authorization").is_some());

    let err = client
        .build_headers(&[("Authorization".to_string(), "Basic xyz".to_string())])
        .unwrap_err();
    assert!(err.is_invalid());
    assert_eq!(client.default_headers().len(), 2);
}

// Dispatch

#[tokio::test]
async fn test_get_dispatches_get() {
    let (client, mock) = ok_client();

    let response = client.get(RequestOptions::for_resource(COLLECTIONS)).await.unwrap();
    assert!(response.is_success());

    let request = mock.last_request().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.base_url, fixtures::TEST_BASE_URL);
    assert_eq!(
        request.url,
        format!("/common/v1/organizations/{}/collections", TEST_ORG_ID)
    );
    assert!(request.query.is_none());
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_verb_wrappers_fix_method() {
    let (client, mock) = ok_client();
    let options = || RequestOptions::for_resource("/x");

    client.put(options()).await.unwrap();
    client.post(options()).await.unwrap();
    client.patch(options()).await.unwrap();
    client.delete(options()).await.unwrap();
    client.head(options()).await.unwrap();
    client.options(options()).await.unwrap();

    let methods: Vec<Method> = mock.recorded_requests().into_iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![
            Method::PUT,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS
        ]
    );
}

#[tokio::test]
async fn test_method_override_rejected() {
    let (client, mock) = ok_client();

    let err = client
        .get(RequestOptions::for_resource(COLLECTIONS).method(Method::POST))
        .await
        .unwrap_err();

    assert!(is_client_error(Some(&err)));
    match err {
        PercipioError::Client(e) => {
            assert!(e.is_invalid());
            assert_eq!(e.message(), "method cannot be overridden");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(mock.request_count(), 0);

    client
        .get(RequestOptions::for_resource(COLLECTIONS).method(Method::GET))
        .await
        .unwrap();
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_send_request_requires_method_and_resource() {
    let (client, mock) = ok_client();

    let err = client
        .send_request(RequestOptions::for_resource("/x"))
        .await
        .unwrap_err();
    let client_err = match &err {
        PercipioError::Client(e) => e,
        other => panic!("unexpected error: {:?}", other),
    };
    assert!(client_err.is_required());
    assert!(client_err.message().starts_with("method"));

    let err = client.get(RequestOptions::new()).await.unwrap_err();
    assert!(is_client_error(Some(&err)));

    let err = client.get(RequestOptions::for_resource("")).await.unwrap_err();
    assert!(is_client_error(Some(&err)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_unresolved_placeholder_rejected_through_future() {
    let (client, mock) = ok_client();

    let err = client
        .get(RequestOptions::for_resource("/users/{userId}"))
        .await
        .unwrap_err();
    assert!(matches!(&err, PercipioError::Client(e) if e.is_required()));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_bad_authorization_override_rejected() {
    let (client, mock) = ok_client();

    let err = client
        .get(RequestOptions::for_resource("/x").header("Authorization", "Basic xyz"))
        .await
        .unwrap_err();
    assert!(matches!(&err, PercipioError::Client(e) if e.is_invalid()));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_query_nulls_dropped_and_empty_query_omitted() {
    let (client, mock) = ok_client();

    client
        .get(
            RequestOptions::for_resource("/x")
                .query_param("a", 1)
                .query_param("b", Value::Null),
        )
        .await
        .unwrap();
    let query = mock.last_request().unwrap().query.unwrap();
    assert_eq!(query.len(), 1);
    assert_eq!(query.get("a"), Some(&json!(1)));

    client
        .get(RequestOptions::for_resource("/x").query_params(serde_json::Map::new()))
        .await
        .unwrap();
    assert!(mock.last_request().unwrap().query.is_none());
}

#[tokio::test]
async fn test_body_nulls_dropped_and_empty_body_omitted() {
    let (client, mock) = ok_client();

    client
        .post(RequestOptions::for_resource("/x").body(json!({"name": "Ada", "email": null})))
        .await
        .unwrap();
    assert_eq!(mock.last_request().unwrap().body, Some(json!({"name": "Ada"})));

    client
        .post(RequestOptions::for_resource("/x").body(json!({})))
        .await
        .unwrap();
    assert!(mock.last_request().unwrap().body.is_none());

    client
        .post(RequestOptions::for_resource("/x").body(json!([{"loginName": "a"}])))
        .await
        .unwrap();
    assert_eq!(mock.last_request().unwrap().body, Some(json!([{"loginName": "a"}])));
}

#[tokio::test]
async fn test_headers_and_transport_options_forwarded() {
    let (client, mock) = ok_client();

    client
        .get(
            RequestOptions::for_resource("/x")
                .header("X-Trace", "t-1")
                .timeout(Duration::from_secs(3))
                .extension("maxRedirects", 0)
                .extension("responseType", "json"),
        )
        .await
        .unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(request.headers.get("x-trace").unwrap(), "t-1");
    assert_eq!(request.options.timeout, Some(Duration::from_secs(3)));
    assert_eq!(request.options.extensions.get("maxRedirects"), Some(&json!(0)));
    assert_eq!(request.options.extensions.get("responseType"), Some(&json!("json")));
}

#[tokio::test]
async fn test_transport_errors_pass_through_unchanged() {
    let (client, _mock) = client_with(
        MockHttpTransport::new()
            .with_timing()
            .add_response(MockResponse::error(TransportError::Timeout("3s elapsed".into())))
            .add_response(MockResponse::status(503, r#"{"message":"unavailable"}"#)),
    );

    let err = client.get(RequestOptions::for_resource("/x")).await.unwrap_err();
    assert!(!is_client_error(Some(&err)));
    assert!(matches!(
        err.as_transport(),
        Some(TransportError::Timeout(message)) if message == "3s elapsed"
    ));

    let err = client.get(RequestOptions::for_resource("/x")).await.unwrap_err();
    let transport_err = err.as_transport().unwrap();
    assert_eq!(transport_err.status(), Some(503));
    let response = transport_err.response().unwrap();
    assert_eq!(response.text(), r#"{"message":"unavailable"}"#);
    assert!(response.timings.is_none());
    assert!(response.correlation_id.is_none());
}

// Timing and correlation

#[tokio::test]
async fn test_successful_response_carries_timings() {
    let (client, mock) = client_with(
        MockHttpTransport::new()
            .with_timing()
            .add_response(MockResponse::json(fixtures::collections()).with_delay(5)),
    );

    let response = client.get(RequestOptions::for_resource(COLLECTIONS)).await.unwrap();
    let timings = response.timings.unwrap();

    assert!(timings.received >= timings.sent);
    assert!(timings.duration_ms >= 5);
    assert_eq!(response.correlation_id, mock.last_request().unwrap().correlation_id);
    assert!(response.correlation_id.is_some());
}

#[tokio::test]
async fn test_caller_correlation_id_kept() {
    let (client, _mock) = ok_client();
    let id = Uuid::new_v4();

    let response = client
        .get(RequestOptions::for_resource("/x").correlation_id(id))
        .await
        .unwrap();
    assert_eq!(response.correlation_id, Some(id));
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let (client, mock) = ok_client();

    let calls = (0..16).map(|i| {
        let client = client.clone();
        async move {
            client
                .get(RequestOptions::for_resource("/items/{n}").placeholder("n", i))
                .await
        }
    });
    let responses: Vec<_> = join_all(calls).await.into_iter().map(Result::unwrap).collect();

    let mut ids: Vec<Uuid> = responses.iter().filter_map(|r| r.correlation_id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
    assert!(responses.iter().all(|r| r.timings.is_some()));
    assert_eq!(mock.request_count(), 16);
}

#[tokio::test]
async fn test_no_timings_without_timing_interceptor() {
    let (client, _mock) = client_with(
        MockHttpTransport::new().add_response(MockResponse::ok("{}")),
    );

    let response = client.get(RequestOptions::for_resource("/x")).await.unwrap();
    assert!(response.timings.is_none());
    assert!(response.correlation_id.is_none());
}
