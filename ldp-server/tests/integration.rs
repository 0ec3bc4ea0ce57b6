use axum::body::Body;
use http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use ldp_server::{routes::build_router, AppState, ServerConfig};
use std::sync::Arc;
use tower::ServiceExt;

const BASE: &str = "http://example.org";
const TURTLE: &str = "text/turtle";
const TITLE_X: &str = "<> <http://purl.org/dc/terms/title> \"x\" .";
const TITLE_Y: &str = "<> <http://purl.org/dc/terms/title> \"y\" .";

const ROOT_AUTH: &str = "Basic cm9vdDpzZWNyZXQ="; // root:secret
const ALICE_AUTH: &str = "Basic YWxpY2U6d29uZGVy"; // alice:wonder

fn state_with(cfg: ServerConfig) -> Arc<AppState> {
    Arc::new(AppState::new(cfg).expect("AppState::new"))
}

/// Open server: no authentication
fn test_state() -> Arc<AppState> {
    state_with(ServerConfig {
        base_uri: Some(BASE.to_string()),
        no_auth: true,
        ..Default::default()
    })
}

/// Authenticated server with a root user and an ordinary user
fn auth_state() -> Arc<AppState> {
    state_with(ServerConfig {
        base_uri: Some(BASE.to_string()),
        users: vec![
            "http://example.org/rootuser#i=root:secret".to_string(),
            "http://example.org/alice#me=alice:wonder".to_string(),
        ],
        ..Default::default()
    })
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> Response<Body> {
    build_router(state.clone()).oneshot(req).await.unwrap()
}

async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    resp.into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes()
        .to_vec()
}

async fn body_string(resp: Response<Body>) -> String {
    String::from_utf8(body_bytes(resp).await).expect("utf-8 body")
}

fn header(resp: &Response<Body>, name: &str) -> String {
    resp.headers()
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(", ")
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn request(method: &str, path: &str) -> http::request::Builder {
    Request::builder().method(method).uri(path)
}

async fn put_turtle(state: &Arc<AppState>, path: &str, body: &str) -> Response<Body> {
    send(
        state,
        request("PUT", path)
            .header("content-type", TURTLE)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn post_turtle(state: &Arc<AppState>, slug: &str, body: &str) -> Response<Body> {
    send(
        state,
        request("POST", "/")
            .header("content-type", TURTLE)
            .header("slug", slug)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn path_of(uri: &str) -> &str {
    uri.strip_prefix(BASE).unwrap_or(uri)
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn put_get_and_conditional_replace() {
    let state = test_state();

    let resp = put_turtle(&state, "/x", TITLE_X).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(header(&resp, "location"), format!("{BASE}/x"));

    let resp = send(&state, get("/x")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), TURTLE);
    let etag = header(&resp, "etag");
    assert!(etag.starts_with("W/\""), "RDF ETags are weak: {etag}");
    assert!(header(&resp, "link").contains("http://www.w3.org/ns/ldp#RDFSource"));
    assert!(body_string(resp).await.contains("\"x\""));

    // missing If-Match is required by default
    let resp = put_turtle(&state, "/x", TITLE_Y).await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_REQUIRED);

    let stale = request("PUT", "/x")
        .header("content-type", TURTLE)
        .header("if-match", "W/\"0000\"")
        .body(Body::from(TITLE_Y))
        .unwrap();
    assert_eq!(send(&state, stale).await.status(), StatusCode::PRECONDITION_FAILED);

    let current = request("PUT", "/x")
        .header("content-type", TURTLE)
        .header("if-match", etag.as_str())
        .body(Body::from(TITLE_Y))
        .unwrap();
    let resp = send(&state, current).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let new_etag = header(&resp, "etag");
    assert_ne!(new_etag, etag);

    let resp = send(&state, get("/x")).await;
    assert_eq!(header(&resp, "etag"), new_etag);
    assert!(body_string(resp).await.contains("\"y\""));
}

#[tokio::test]
async fn optional_if_match() {
    let state = state_with(ServerConfig {
        base_uri: Some(BASE.to_string()),
        no_auth: true,
        optional_if_match_etag: true,
        ..Default::default()
    });
    assert_eq!(put_turtle(&state, "/x", TITLE_X).await.status(), StatusCode::CREATED);
    assert_eq!(put_turtle(&state, "/x", TITLE_Y).await.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn post_links_into_container() {
    let state = test_state();

    let resp = post_turtle(&state, "doc", TITLE_X).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = header(&resp, "location");
    assert_eq!(location, format!("{BASE}/doc"));
    assert_eq!(body_string(resp).await, location);

    // same slug again gets a fresh URI
    let resp = post_turtle(&state, "doc", TITLE_X).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_ne!(header(&resp, "location"), location);

    let resp = send(&state, get("/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("contains"), "{body}");
    assert!(body.contains(&location), "{body}");
}

#[tokio::test]
async fn post_binary_creates_description() {
    let state = test_state();

    let req = request("POST", "/")
        .header("content-type", "image/png")
        .header("slug", "pic")
        .body(Body::from(vec![0x89u8, b'P', b'N', b'G']))
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let links = header(&resp, "link");
    assert!(links.contains("http://www.w3.org/ns/ldp#NonRDFSource"), "{links}");
    assert!(links.contains("rel=\"describedby\""), "{links}");

    let resp = send(&state, get("/pic")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), "image/png");
    assert!(header(&resp, "etag").starts_with('"'), "binary ETags are strong");
    assert_eq!(body_bytes(resp).await, vec![0x89u8, b'P', b'N', b'G']);

    let description = state
        .store
        .read()
        .get(&format!("{BASE}/pic"))
        .unwrap()
        .describedby
        .clone()
        .expect("description");
    let resp = send(&state, get(path_of(&description))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header(&resp, "link").contains("rel=\"describes\""));
}

#[tokio::test]
async fn delete_then_gone_vs_never_existed() {
    let state = test_state();
    put_turtle(&state, "/x", TITLE_X).await;

    let resp = send(&state, request("DELETE", "/x").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&state, get("/x")).await;
    assert_eq!(resp.status(), StatusCode::GONE);

    let resp = send(&state, get("/never")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let links = header(&resp, "link");
    assert!(links.contains("http://www.w3.org/ns/ldp#constrainedBy"), "{links}");
    assert!(links.contains("/constraints.txt"), "{links}");

    // a deleted URI cannot be recreated
    assert_eq!(put_turtle(&state, "/x", TITLE_X).await.status(), StatusCode::GONE);

    // and is gone from the container
    let body = body_string(send(&state, get("/")).await).await;
    assert!(!body.contains(&format!("{BASE}/x>")), "{body}");
}

#[tokio::test]
async fn delete_container_is_recursive() {
    let state = test_state();
    let req = request("PUT", "/c")
        .header("content-type", TURTLE)
        .header("link", "<http://www.w3.org/ns/ldp#BasicContainer>; rel=\"type\"")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::CREATED);
    assert_eq!(put_turtle(&state, "/c/child", TITLE_X).await.status(), StatusCode::CREATED);

    let resp = send(&state, request("DELETE", "/c").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(send(&state, get("/c/child")).await.status(), StatusCode::GONE);
}

// =============================================================================
// Protocol rules
// =============================================================================

#[tokio::test]
async fn client_cannot_assert_containment() {
    let state = test_state();

    let forged = format!("<> <http://www.w3.org/ns/ldp#contains> <{BASE}/fake> .");
    let resp = post_turtle(&state, "forged", &forged).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let patch = request("PATCH", "/")
        .header("content-type", "application/sparql-update")
        .body(Body::from(format!(
            "INSERT DATA {{ <{BASE}> <http://www.w3.org/ns/ldp#contains> <{BASE}/fake> . }}"
        )))
        .unwrap();
    let resp = send(&state, patch).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn patch_updates_content() {
    let state = test_state();
    put_turtle(&state, "/x", TITLE_X).await;
    let etag = header(&send(&state, get("/x")).await, "etag");

    let patch = request("PATCH", "/x")
        .header("content-type", "application/sparql-update")
        .header("if-match", etag.as_str())
        .body(Body::from(format!(
            "DELETE DATA {{ <{BASE}/x> <http://purl.org/dc/terms/title> \"x\" }} ; \
             INSERT DATA {{ <{BASE}/x> <http://purl.org/dc/terms/title> \"z\" }}"
        )))
        .unwrap();
    let resp = send(&state, patch).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_ne!(header(&resp, "etag"), etag);

    let body = body_string(send(&state, get("/x")).await).await;
    assert!(body.contains("\"z\"") && !body.contains("\"x\""), "{body}");

    let bad = request("PATCH", "/x")
        .header("content-type", "application/sparql-update")
        .body(Body::from("INSERT GARBAGE"))
        .unwrap();
    assert_eq!(send(&state, bad).await.status(), StatusCode::BAD_REQUEST);

    let wrong_type = request("PATCH", "/x")
        .header("content-type", TURTLE)
        .body(Body::from(TITLE_X))
        .unwrap();
    assert_eq!(
        send(&state, wrong_type).await.status(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
}

#[tokio::test]
async fn conflicting_type_links_rejected() {
    let state = test_state();
    let req = request("POST", "/")
        .header("content-type", TURTLE)
        .header(
            "link",
            "<http://www.w3.org/ns/ldp#NonRDFSource>; rel=\"type\", <http://www.w3.org/ns/ldp#RDFSource>; rel=\"type\"",
        )
        .body(Body::from(TITLE_X))
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unparsable_rdf_rejected() {
    let state = test_state();
    let resp = post_turtle(&state, "bad", "<> <broken").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(header(&resp, "link").contains("constrainedBy"));
}

#[tokio::test]
async fn options_reports_allow() {
    let state = test_state();
    let resp = send(&state, request("OPTIONS", "/").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let allow = header(&resp, "allow");
    for method in ["GET", "HEAD", "OPTIONS", "POST", "PUT", "PATCH", "DELETE"] {
        assert!(allow.contains(method), "{method} missing from {allow}");
    }
    assert_eq!(header(&resp, "accept-patch"), "application/sparql-update");
    assert!(header(&resp, "accept-post").contains(TURTLE));
}

#[tokio::test]
async fn disabled_methods() {
    let state = state_with(ServerConfig {
        base_uri: Some(BASE.to_string()),
        no_auth: true,
        no_delete: true,
        ..Default::default()
    });
    put_turtle(&state, "/x", TITLE_X).await;
    let resp = send(&state, request("DELETE", "/x").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = header(&send(&state, request("OPTIONS", "/x").body(Body::empty()).unwrap()).await, "allow");
    assert!(!allow.contains("DELETE"));
}

#[tokio::test]
async fn content_negotiation() {
    let state = test_state();
    put_turtle(&state, "/x", TITLE_X).await;

    let req = request("GET", "/x")
        .header("accept", "application/n-triples")
        .body(Body::empty())
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), "application/n-triples");

    let req = request("GET", "/x")
        .header("accept", "application/ld+json")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn prefer_minimal_container() {
    let state = test_state();
    post_turtle(&state, "doc", TITLE_X).await;

    let req = request("GET", "/")
        .header(
            "prefer",
            "return=representation; include=\"http://www.w3.org/ns/ldp#PreferMinimalContainer\"",
        )
        .body(Body::empty())
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "preference-applied"), "return=representation");
    let body = body_string(resp).await;
    assert!(!body.contains(&format!("{BASE}/doc")), "{body}");
}

#[tokio::test]
async fn head_has_headers_without_body() {
    let state = test_state();
    put_turtle(&state, "/x", TITLE_X).await;
    let resp = send(&state, request("HEAD", "/x").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!header(&resp, "etag").is_empty());
    assert!(body_bytes(resp).await.is_empty());
}

// =============================================================================
// Fixity
// =============================================================================

async fn post_hello(state: &Arc<AppState>, digest: Option<&str>) -> Response<Body> {
    let mut req = request("POST", "/")
        .header("content-type", "text/plain")
        .header("slug", "hello");
    if let Some(digest) = digest {
        req = req.header("digest", digest);
    }
    send(state, req.body(Body::from("hello")).unwrap()).await
}

#[tokio::test]
async fn want_digest_on_get() {
    let state = test_state();
    assert_eq!(post_hello(&state, None).await.status(), StatusCode::CREATED);

    let req = request("GET", "/hello")
        .header("want-digest", "sha-256;q=0.3, md5")
        .body(Body::empty())
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "digest"), "md5=XUFAKrxLKna5cZ2REBfFkg==");

    let req = request("GET", "/hello")
        .header("want-digest", "crc32c")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn request_digest_checked() {
    let state = test_state();
    let good = "sha-256=LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ=";
    assert_eq!(post_hello(&state, Some(good)).await.status(), StatusCode::CREATED);

    let wrong = "md5=AAAAAAAAAAAAAAAAAAAAAA==";
    assert_eq!(post_hello(&state, Some(wrong)).await.status(), StatusCode::CONFLICT);

    let unsupported = "crc32c=abc";
    assert_eq!(post_hello(&state, Some(unsupported)).await.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Versioning
// =============================================================================

#[tokio::test]
async fn memento_lifecycle() {
    let state = test_state();

    let req = request("POST", "/")
        .header("content-type", TURTLE)
        .header("slug", "versioned")
        .header("link", "<http://mementoweb.org/ns#OriginalResource>; rel=\"type\"")
        .body(Body::from(TITLE_X))
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(header(&resp, "link").contains("rel=\"timemap\""));

    let original = format!("{BASE}/versioned");
    let timemap = state
        .store
        .read()
        .get(&original)
        .unwrap()
        .timemap
        .clone()
        .expect("timemap");

    // snapshot of the current content
    let resp = send(&state, request("POST", path_of(&timemap)).body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let memento = header(&resp, "location");

    let resp = send(&state, get(path_of(&memento))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!header(&resp, "memento-datetime").is_empty());
    assert!(header(&resp, "link").contains("http://mementoweb.org/ns#Memento"));
    assert!(body_string(resp).await.contains("\"x\""));

    // mementos are immutable
    let put = request("PUT", path_of(&memento))
        .header("content-type", TURTLE)
        .header("if-match", "*")
        .body(Body::from(TITLE_Y))
        .unwrap();
    assert_eq!(send(&state, put).await.status(), StatusCode::METHOD_NOT_ALLOWED);

    // datetime negotiation on the original
    let req = request("GET", "/versioned")
        .header("accept-datetime", "Fri, 01 Jan 2100 00:00:00 GMT")
        .body(Body::empty())
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(header(&resp, "location"), memento);
    assert_eq!(header(&resp, "vary"), "Accept-Datetime");

    // the TimeMap lists the memento
    let req = request("GET", path_of(&timemap))
        .header("accept", "application/link-format")
        .body(Body::empty())
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains(&memento));
}

#[tokio::test]
async fn memento_from_body_with_datetime() {
    let state = test_state();
    let req = request("PUT", "/v")
        .header("content-type", TURTLE)
        .header("link", "<http://mementoweb.org/ns#OriginalResource>; rel=\"type\"")
        .body(Body::from(TITLE_X))
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::CREATED);
    let timemap = state
        .store
        .read()
        .get(&format!("{BASE}/v"))
        .unwrap()
        .timemap
        .clone()
        .expect("timemap");

    let req = request("POST", path_of(&timemap))
        .header("content-type", TURTLE)
        .header("memento-datetime", "Tue, 20 Jun 2017 10:11:12 GMT")
        .body(Body::from(TITLE_Y))
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let memento = header(&resp, "location");

    let resp = send(&state, get(path_of(&memento))).await;
    assert_eq!(header(&resp, "memento-datetime"), "Tue, 20 Jun 2017 10:11:12 GMT");
    assert!(body_string(resp).await.contains("\"y\""));
}

// =============================================================================
// Access control
// =============================================================================

#[tokio::test]
async fn anonymous_read_but_not_write() {
    let state = auth_state();

    assert_eq!(send(&state, get("/")).await.status(), StatusCode::OK);

    let resp = post_turtle(&state, "anon", TITLE_X).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(header(&resp, "www-authenticate").starts_with("Basic"));
}

#[tokio::test]
async fn authenticated_without_grant_is_forbidden() {
    let state = auth_state();
    let req = request("POST", "/")
        .header("content-type", TURTLE)
        .header("authorization", ALICE_AUTH)
        .body(Body::from(TITLE_X))
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::FORBIDDEN);

    let req = request("POST", "/")
        .header("content-type", TURTLE)
        .header("authorization", ROOT_AUTH)
        .body(Body::from(TITLE_X))
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn bad_credentials_rejected() {
    let state = auth_state();
    let req = request("GET", "/")
        .header("authorization", "Basic cm9vdDp3cm9uZw==") // root:wrong
        .body(Body::empty())
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(header(&resp, "link").contains("constrainedBy"));
}

#[tokio::test]
async fn acl_link_advertised() {
    let state = auth_state();
    let resp = send(&state, get("/")).await;
    assert!(header(&resp, "link").contains(&format!("<{BASE}/.acl>; rel=\"acl\"")));
}

// =============================================================================
// Auxiliary routes
// =============================================================================

#[tokio::test]
async fn status_and_constraints() {
    let state = test_state();
    put_turtle(&state, "/x", TITLE_X).await;
    send(&state, request("DELETE", "/x").body(Body::empty()).unwrap()).await;

    let resp = send(&state, get("/status")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Deleted (1)"), "{body}");
    assert!(body.contains(&format!("{BASE}/x")), "{body}");

    let resp = send(&state, get("/constraints.txt")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("ldp:contains"));
}

// =============================================================================
// Container ETags and auxiliary paths
// =============================================================================

async fn put_container(state: &Arc<AppState>, path: &str) -> Response<Body> {
    let req = request("PUT", path)
        .header("content-type", TURTLE)
        .header("link", "<http://www.w3.org/ns/ldp#BasicContainer>; rel=\"type\"")
        .body(Body::from(TITLE_X))
        .unwrap();
    send(state, req).await
}

#[tokio::test]
async fn container_etag_survives_new_children() {
    let state = test_state();
    assert_eq!(put_container(&state, "/c").await.status(), StatusCode::CREATED);
    let etag = header(&send(&state, get("/c")).await, "etag");

    let req = request("POST", "/c")
        .header("content-type", TURTLE)
        .header("slug", "child")
        .body(Body::from(TITLE_Y))
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::CREATED);

    let resp = send(&state, get("/c")).await;
    assert_eq!(header(&resp, "etag"), etag);
    assert!(body_string(resp).await.contains(&format!("{BASE}/c/child")));

    let req = request("PUT", "/c")
        .header("content-type", TURTLE)
        .header("if-match", etag.as_str())
        .body(Body::from(TITLE_Y))
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::NO_CONTENT);

    // replacement keeps the child
    let body = body_string(send(&state, get("/c")).await).await;
    assert!(body.contains(&format!("{BASE}/c/child")), "{body}");
}

#[tokio::test]
async fn slug_cannot_claim_auxiliary_paths() {
    let state = test_state();
    let resp = post_turtle(&state, "status", TITLE_X).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_ne!(header(&resp, "location"), format!("{BASE}/status"));

    let resp = post_turtle(&state, "constraints.txt", TITLE_X).await;
    assert_ne!(header(&resp, "location"), format!("{BASE}/constraints.txt"));
}

// =============================================================================
// Extra inclusions
// =============================================================================

fn get_ntriples_preferring(path: &str, include: &str) -> Request<Body> {
    request("GET", path)
        .header("accept", "application/n-triples")
        .header("prefer", format!("return=representation; include=\"{include}\""))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn prefer_inbound_references() {
    let state = test_state();
    put_turtle(&state, "/target", TITLE_X).await;
    let referrer = format!("<> <http://example.org/cites> <{BASE}/target> .");
    assert_eq!(post_turtle(&state, "ref", &referrer).await.status(), StatusCode::CREATED);

    let cites = format!("<{BASE}/ref> <http://example.org/cites> <{BASE}/target>");
    let contains = format!("<{BASE}> <http://www.w3.org/ns/ldp#contains> <{BASE}/target>");

    let plain = request("GET", "/target")
        .header("accept", "application/n-triples")
        .body(Body::empty())
        .unwrap();
    let body = body_string(send(&state, plain).await).await;
    assert!(!body.contains(&cites), "{body}");

    let req = get_ntriples_preferring(
        "/target",
        "http://fedora.info/definitions/fcrepo#PreferInboundReferences",
    );
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "preference-applied"), "return=representation");
    let body = body_string(resp).await;
    assert!(body.contains(&cites), "{body}");
    assert!(body.contains(&contains), "{body}");
}

#[tokio::test]
async fn prefer_contained_descriptions() {
    let state = test_state();
    put_container(&state, "/c").await;
    assert_eq!(put_turtle(&state, "/c/child", TITLE_Y).await.status(), StatusCode::CREATED);

    let described = format!("<{BASE}/c/child> <http://purl.org/dc/terms/title> \"y\"");

    let plain = request("GET", "/c")
        .header("accept", "application/n-triples")
        .body(Body::empty())
        .unwrap();
    let body = body_string(send(&state, plain).await).await;
    assert!(!body.contains(&described), "{body}");

    let req = get_ntriples_preferring("/c", "http://www.w3.org/ns/ldp#PreferContainedDescriptions");
    let resp = send(&state, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains(&described), "{body}");
    // the container's own content and containment stay
    assert!(body.contains(&format!("<{BASE}/c> <http://purl.org/dc/terms/title> \"x\"")), "{body}");
    assert!(body.contains(&format!("<{BASE}/c/child>")), "{body}");
}

#[tokio::test]
async fn deleting_timemap_removes_mementos() {
    let state = test_state();
    let req = request("PUT", "/v")
        .header("content-type", TURTLE)
        .header("link", "<http://mementoweb.org/ns#OriginalResource>; rel=\"type\"")
        .body(Body::from(TITLE_X))
        .unwrap();
    assert_eq!(send(&state, req).await.status(), StatusCode::CREATED);
    let timemap = state
        .store
        .read()
        .get(&format!("{BASE}/v"))
        .unwrap()
        .timemap
        .clone()
        .expect("timemap");

    let resp = send(&state, request("POST", path_of(&timemap)).body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let memento = header(&resp, "location");

    let resp = send(&state, request("DELETE", path_of(&timemap)).body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(send(&state, get(path_of(&memento))).await.status(), StatusCode::GONE);
    assert_eq!(send(&state, get(path_of(&timemap))).await.status(), StatusCode::GONE);

    assert!(state.store.read().get(&format!("{BASE}/v")).unwrap().timemap.is_none());
    let resp = send(&state, get("/v")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!header(&resp, "link").contains("rel=\"timemap\""));
}
