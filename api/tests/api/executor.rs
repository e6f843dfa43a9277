use std::time::Duration;

use myapi::{Auth, CancellationToken, ExecuteError, FormType, HttpMethod, InFlight, Request, RequestBody};
use wiremock::{
  matchers::{body_string, header, method, path, query_param},
  Mock, MockServer, ResponseTemplate,
};

use crate::helpers::spawn_test_app;

#[tokio::test]
async fn post_with_json_body_returns_normalized_response_and_records_history() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/items"))
    .and(query_param("x", "1"))
    .and(header("accept", "*/*"))
    .and(header("content-type", "application/json"))
    .and(body_string(r#"{"a":1}"#))
    .respond_with(
      ResponseTemplate::new(201)
        .insert_header("ETag", "abc")
        .set_body_string("created"),
    )
    .expect(1)
    .mount(&test_server)
    .await;

  let mut request = Request::new(HttpMethod::POST, format!("{}/items?x=1", test_server.uri()));
  request.headers = vec![FormType::new("Accept", "*/*")];
  request.body = RequestBody::Json(r#"{"a":1}"#.into());
  request.mark_dirty();

  let sent = test_app
    .app
    .send(request.clone(), CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(sent.response.status, "201 Created");
  assert_eq!(sent.response.headers.get("Etag").map(String::as_str), Some("abc"));
  assert_eq!(sent.response.body, "created");
  assert_eq!(sent.response.size, "7 bytes");
  assert!(sent.response.duration > Duration::ZERO);

  let files = test_app.history_files();
  assert_eq!(files.len(), 1);
  let id = sent.request.id.clone().unwrap();
  assert_eq!(files[0], format!("{id}.json"));
  assert!(!sent.request.is_dirty);

  request.id = Some(id.clone());
  assert_eq!(test_app.app.load(&id).unwrap(), request);
}

#[tokio::test]
async fn canceling_in_flight_send_returns_canceled_and_writes_nothing() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
    .mount(&test_server)
    .await;

  let token = CancellationToken::new();
  let handle = test_app.app.executor.spawn(
    Request::new(HttpMethod::GET, format!("{}/slow", test_server.uri())),
    token.clone(),
  );
  tokio::time::sleep(Duration::from_millis(100)).await;
  token.cancel();

  let result = tokio::time::timeout(Duration::from_secs(2), handle)
    .await
    .expect("cancel did not abort the call promptly")
    .unwrap();
  assert!(matches!(result, Err(ExecuteError::Canceled)));
  assert!(test_app.history_files().is_empty());
}

#[tokio::test]
async fn already_canceled_token_never_dispatches() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&test_server)
    .await;

  let token = CancellationToken::new();
  token.cancel();
  let err = test_app
    .app
    .send(Request::new(HttpMethod::GET, test_server.uri()), token)
    .await
    .unwrap_err();
  assert!(err.is_canceled());
  assert!(test_app.history_files().is_empty());
}

#[tokio::test]
async fn new_send_cancels_the_outstanding_one() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(path("/slow"))
    .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
    .mount(&test_server)
    .await;
  Mock::given(path("/fast"))
    .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
    .mount(&test_server)
    .await;

  let mut slot = InFlight::default();
  let first = slot.begin();
  let slow = test_app.app.executor.spawn(
    Request::new(HttpMethod::GET, format!("{}/slow", test_server.uri())),
    first.token.clone(),
  );
  tokio::time::sleep(Duration::from_millis(50)).await;

  let second = slot.begin();
  let fast = test_app.app.executor.spawn(
    Request::new(HttpMethod::GET, format!("{}/fast", test_server.uri())),
    second.token.clone(),
  );

  assert!(slow.await.unwrap().unwrap_err().is_canceled());
  let sent = fast.await.unwrap().unwrap();
  slot.finish(&second);

  assert_eq!(sent.response.body, "ok");
  assert!(!slot.is_active());
  assert_eq!(test_app.history_files().len(), 1);
}

#[tokio::test]
async fn transport_errors_are_surfaced_and_not_recorded() {
  let test_app = spawn_test_app();
  let err = test_app
    .app
    .send(Request::new(HttpMethod::GET, "http://127.0.0.1:1/"), CancellationToken::new())
    .await
    .unwrap_err();
  assert!(matches!(err, ExecuteError::Transport(_)));
  assert!(test_app.history_files().is_empty());
}

#[tokio::test]
async fn invalid_url_is_rejected_before_dispatch() {
  let test_app = spawn_test_app();
  let err = test_app
    .app
    .send(Request::new(HttpMethod::GET, "::not a url::"), CancellationToken::new())
    .await
    .unwrap_err();
  assert!(matches!(err, ExecuteError::InvalidRequest(_)));
}

#[tokio::test]
async fn error_statuses_are_still_successful_sends() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(method("DELETE"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&test_server)
    .await;

  let sent = test_app
    .app
    .send(
      Request::new(HttpMethod::DELETE, format!("{}/gone", test_server.uri())),
      CancellationToken::new(),
    )
    .await
    .unwrap();
  assert_eq!(sent.response.status, "404 Not Found");
  assert_eq!(sent.response.size, "0 bytes");
  assert_eq!(test_app.history_files().len(), 1);
}

#[tokio::test]
async fn resending_a_recorded_request_overwrites_its_entry() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(200))
    .mount(&test_server)
    .await;

  let request = Request::new(HttpMethod::GET, test_server.uri());
  let first = test_app.app.send(request, CancellationToken::new()).await.unwrap();
  let second = test_app
    .app
    .send(first.request.clone(), CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(first.request.id, second.request.id);
  assert_eq!(test_app.history_files().len(), 1);
}

#[tokio::test]
async fn repeated_headers_keep_first_value_and_cookies_are_copied() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(
      ResponseTemplate::new(200)
        .append_header("X-Multi", "one")
        .append_header("X-Multi", "two")
        .append_header("Set-Cookie", "session=s3cr3t; Path=/; HttpOnly"),
    )
    .mount(&test_server)
    .await;

  let sent = test_app
    .app
    .send(Request::new(HttpMethod::GET, test_server.uri()), CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(sent.response.headers.get("X-Multi").map(String::as_str), Some("one"));
  assert_eq!(sent.response.cookies.len(), 1);
  let cookie = &sent.response.cookies[0];
  assert_eq!(cookie.name, "session");
  assert_eq!(cookie.value, "s3cr3t");
  assert_eq!(cookie.path.as_deref(), Some("/"));
  assert!(cookie.http_only);
}

#[tokio::test]
async fn auth_headers_and_form_fields_reach_the_server() {
  let test_app = spawn_test_app();
  let test_server = MockServer::start().await;
  Mock::given(method("PUT"))
    .respond_with(ResponseTemplate::new(204))
    .mount(&test_server)
    .await;

  let mut request = Request::new(HttpMethod::PUT, format!("{}/upload", test_server.uri()));
  request.headers = vec![FormType::new("Authorization", "Token manual")];
  request.auth = Auth::Bearer {
    token: "xyz".into(),
    prefix: "Bearer".into(),
  };
  request.body = RequestBody::Form(vec![FormType::new("name", "widget"), FormType::unchecked("hidden", "no")]);
  test_app.app.send(request, CancellationToken::new()).await.unwrap();

  let received = test_server.received_requests().await.unwrap();
  assert_eq!(received.len(), 1);
  let authorization: Vec<&str> = received[0]
    .headers
    .get_all("authorization")
    .iter()
    .map(|value| value.to_str().unwrap())
    .collect();
  assert_eq!(authorization, vec!["Token manual", "Bearer xyz"]);

  let body = String::from_utf8_lossy(&received[0].body);
  assert!(body.contains("name=\"name\""));
  assert!(body.contains("widget"));
  assert!(!body.contains("hidden"));
}
