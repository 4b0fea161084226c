use reqwest::{ClientBuilder, Url};
use serde_json::json;
use tawseek_misr::{ClientConfig, Error, HttpSession, Language, Repository, endpoints};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session(server: &MockServer, token: Option<&str>) -> HttpSession {
    let config = ClientConfig::new(Url::parse(&format!("{}/backend", server.uri())).unwrap())
        .auth_token(token.map(str::to_string))
        .language(Language::English);
    HttpSession::new(ClientBuilder::new(), config).unwrap()
}

#[tokio::test]
async fn get_returns_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backend/api/version/check"))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": "200",
            "data": { "androidVersionCode": 3, "iosVersionCode": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = session(&server, None)
        .get(endpoints::VERSION_CHECK)
        .await
        .unwrap();
    assert_eq!(value["data"]["androidVersionCode"], 3);
}

#[tokio::test]
async fn authenticated_post_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/backend/api/reservation/inquire"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(json!({ "nationalId": "29001011234567" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": "200",
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = session(&server, Some("secret"))
        .post(
            endpoints::INQUIRE_RESERVATIONS,
            json!({ "nationalId": "29001011234567" }),
            true,
        )
        .await
        .unwrap();
    assert_eq!(value["statusCode"], "200");
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backend/api/orgunits/status"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "description": "database down" })),
        )
        .mount(&server)
        .await;

    match session(&server, None).get(endpoints::OFFICES).await {
        Err(Error::Http { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database down");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backend/api/lookups/governments"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = session(&server, None)
        .get(endpoints::GOVERNMENTS)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(
        err.user_message(Language::English),
        "A connection error occurred, please try again"
    );
}
