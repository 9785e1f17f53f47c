//! Integration tests for the OCI HTTP client using wiremock
//!
//! These tests verify the signed client and the REST fetchers against
//! mocked endpoints: request signing headers, `opc-next-page` pagination,
//! API error mapping, and the object listing cursor.

use base64::prelude::*;
use ocinfo::inventory::aggregate::aggregate_objects;
use ocinfo::oci::auth::{signing_string, RequestSigner};
use ocinfo::oci::client::{Endpoints, OciClient};
use ocinfo::oci::http::{format_oci_error, ApiError};
use ocinfo::oci;
use ocinfo::resource::{Fetchers, ObjectPageRequest};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::json;
use sha2::Sha256;
use std::sync::OnceLock;
use wiremock::matchers::{header, header_exists, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANCY: &str = "ocid1.tenancy.oc1..aaaa";
const COMPARTMENT: &str = "ocid1.compartment.oc1..prod";
const KEY_ID: &str = "ocid1.tenancy.oc1..aaaa/ocid1.user.oc1..bbbb/aa:bb:cc";

fn test_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("key generation should succeed")
    })
}

fn client_for(server: &MockServer) -> OciClient {
    let signer = RequestSigner::new(KEY_ID, test_key().clone());
    let endpoints = Endpoints::single(&server.uri()).expect("mock server URI should parse");
    OciClient::with_endpoints(signer, TENANCY, "test-region-1", endpoints)
        .expect("client should build")
}

fn fetchers_for(server: &MockServer) -> Fetchers {
    oci::fetchers(&client_for(server))
}

/// Rebuild the signing string from what was actually sent and verify it
fn assert_signature_valid(request: &wiremock::Request) {
    let header = |name: &str| {
        request
            .headers
            .get(name)
            .unwrap_or_else(|| panic!("{} header missing", name))
            .to_str()
            .unwrap()
            .to_string()
    };
    let authorization = header("authorization");
    let encoded = authorization
        .split("signature=\"")
        .nth(1)
        .and_then(|rest| rest.strip_suffix('"'))
        .expect("signature field present");
    let signature = Signature::try_from(BASE64_STANDARD.decode(encoded).unwrap().as_slice())
        .expect("signature should decode");

    let path_and_query = match request.url.query() {
        Some(query) => format!("{}?{}", request.url.path(), query),
        None => request.url.path().to_string(),
    };
    let expected = signing_string("get", &path_and_query, &header("host"), &header("date"));
    let verifying_key = VerifyingKey::<Sha256>::new(RsaPublicKey::from(test_key()));
    verifying_key
        .verify(expected.as_bytes(), &signature)
        .expect("signature should verify");
}

/// Test module for request signing
mod signing_tests {
    use super::*;

    /// Test every request carries a verifiable signature and a request id
    #[tokio::test]
    async fn test_request_is_signed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/20160918/compartments/{}", TENANCY)))
            .and(header_exists("authorization"))
            .and(header_exists("date"))
            .and(header_exists("opc-request-id"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": TENANCY,
                "name": "acme",
                "lifecycleState": "ACTIVE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let scope = fetchers_for(&server)
            .identity
            .get_scope(TENANCY)
            .await
            .expect("Request should succeed");
        assert_eq!(scope.name, "acme");

        let requests = server.received_requests().await.unwrap();
        let authorization = requests[0].headers.get("authorization").unwrap().to_str().unwrap();

        assert!(authorization.starts_with("Signature version=\"1\""));
        assert!(authorization.contains("headers=\"date (request-target) host\""));
        assert!(authorization.contains(&format!("keyId=\"{}\"", KEY_ID)));
        assert!(authorization.contains("algorithm=\"rsa-sha256\""));
        assert_signature_valid(&requests[0]);
    }

    /// Test the signature covers the query string of list calls
    #[tokio::test]
    async fn test_signature_covers_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/compartments"))
            .and(query_param("compartmentIdInSubtree", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        fetchers_for(&server)
            .identity
            .list_scopes(TENANCY)
            .await
            .expect("Request should succeed");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query().is_some());
        assert_signature_valid(&requests[0]);
    }

    /// Test request ids are unique per request
    #[tokio::test]
    async fn test_request_ids_unique() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/availabilityDomains"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Uocm:PHX-AD-1"}
            ])))
            .mount(&server)
            .await;

        let fetchers = fetchers_for(&server);
        fetchers.identity.list_availability_domains(TENANCY).await.unwrap();
        fetchers.identity.list_availability_domains(TENANCY).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let ids: Vec<&str> = requests
            .iter()
            .map(|r| r.headers.get("opc-request-id").unwrap().to_str().unwrap())
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }
}

/// Test module for list pagination
mod pagination_tests {
    use super::*;

    fn instance(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "displayName": name,
            "compartmentId": COMPARTMENT,
            "lifecycleState": "RUNNING",
            "shape": "VM.Standard.E4.Flex",
            "availabilityDomain": "AD-1"
        })
    }

    /// Test list calls follow opc-next-page until it is absent
    #[tokio::test]
    async fn test_follows_next_page_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/instances"))
            .and(query_param("compartmentId", COMPARTMENT))
            .and(query_param_is_missing("page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("opc-next-page", "page-2")
                    .set_body_json(json!([instance("i1", "web-1"), instance("i2", "web-2")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/20160918/instances"))
            .and(query_param("page", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([instance("i3", "db-1")])))
            .expect(1)
            .mount(&server)
            .await;

        let instances = fetchers_for(&server)
            .compute
            .list_instances(COMPARTMENT)
            .await
            .expect("Request should succeed");

        let names: Vec<&str> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["web-1", "web-2", "db-1"]);
    }

    /// Test subtree compartment listing query
    #[tokio::test]
    async fn test_compartment_subtree_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/compartments"))
            .and(query_param("compartmentId", TENANCY))
            .and(query_param("compartmentIdInSubtree", "true"))
            .and(query_param("lifecycleState", "ACTIVE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": COMPARTMENT, "name": "prod", "lifecycleState": "ACTIVE"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let scopes = fetchers_for(&server)
            .identity
            .list_scopes(TENANCY)
            .await
            .unwrap();
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].name, "prod");
    }
}

/// Test module for API error handling
mod error_tests {
    use super::*;

    /// Test 404 NotAuthorizedOrNotFound maps to a typed error and short message
    #[tokio::test]
    async fn test_not_authorized_or_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/vnics/ocid1.vnic.oc1..x"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "NotAuthorizedOrNotFound",
                "message": "Authorization failed or requested resource not found."
            })))
            .mount(&server)
            .await;

        let err = fetchers_for(&server)
            .network
            .get_network_interface("ocid1.vnic.oc1..x")
            .await
            .unwrap_err();

        let api = err.downcast_ref::<ApiError>().expect("typed API error");
        assert_eq!(api.status, 404);
        assert_eq!(api.code, "NotAuthorizedOrNotFound");
        assert!(format_oci_error(&err).contains("Not authorized or not found"));
    }

    /// Test 401 indicates authentication failure
    #[tokio::test]
    async fn test_401_returns_authentication_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "NotAuthenticated",
                "message": "The required information to complete authentication was not provided."
            })))
            .mount(&server)
            .await;

        let err = fetchers_for(&server)
            .load_balancer
            .list_load_balancers(COMPARTMENT)
            .await
            .unwrap_err();
        assert!(format_oci_error(&err).contains("Authentication failed"));
    }

    /// Test 5xx with a non-JSON body
    #[tokio::test]
    async fn test_500_with_html_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>unavailable</html>"))
            .mount(&server)
            .await;

        let err = fetchers_for(&server)
            .storage
            .list_block_volumes(COMPARTMENT)
            .await
            .unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.status, 503);
        assert_eq!(api.code, "-");
        assert!(format_oci_error(&err).contains("temporarily unavailable"));
    }

    /// Test malformed success body is an error, not a panic
    #[tokio::test]
    async fn test_malformed_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = fetchers_for(&server)
            .network
            .list_security_groups(COMPARTMENT)
            .await;
        assert!(result.is_err());
    }
}

/// Test module for object storage
mod object_storage_tests {
    use super::*;

    /// Test namespace is read from a bare JSON string
    #[tokio::test]
    async fn test_namespace() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/n/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("acmens")))
            .mount(&server)
            .await;

        let namespace = fetchers_for(&server)
            .object_storage
            .get_namespace()
            .await
            .unwrap();
        assert_eq!(namespace, "acmens");
    }

    /// Test one object page sends limit, fields and start
    #[tokio::test]
    async fn test_object_page_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/n/acmens/b/logs/o"))
            .and(query_param("limit", "1000"))
            .and(query_param("fields", "size"))
            .and(query_param("start", "b.log"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objects": [{"name": "b.log", "size": 10}, {"name": "c.log", "size": 32}],
                "nextStartWith": "d.log"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ObjectPageRequest {
            limit: 1000,
            start: Some("b.log".to_string()),
        };
        let page = fetchers_for(&server)
            .object_storage
            .list_objects("acmens", "logs", &request)
            .await
            .unwrap();

        assert_eq!(page.sizes, vec![10, 32]);
        assert_eq!(page.next_start.as_deref(), Some("d.log"));
    }

    /// Test aggregation follows nextStartWith across real responses
    #[tokio::test]
    async fn test_aggregate_over_http() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/n/acmens/b/logs/o"))
            .and(query_param_is_missing("start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objects": [{"name": "a", "size": 100}, {"name": "b", "size": 200}],
                "nextStartWith": "c"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/n/acmens/b/logs/o"))
            .and(query_param("start", "c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objects": [{"name": "c", "size": 300}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetchers = fetchers_for(&server);
        let totals = aggregate_objects(fetchers.object_storage.as_ref(), "acmens", "logs").await;

        assert_eq!(totals.object_count, 3);
        assert_eq!(totals.total_size_bytes, 600);
        assert_eq!(totals.pages, 2);
        assert!(totals.complete);
    }
}
