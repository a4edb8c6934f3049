use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use showcase_core::ShowcaseCore;
use showcase_core::types::{AppConfig, Config};
use showcase_server::{AppState, router};
use std::io::Cursor;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "showcase-test-boundary";

struct TestApp {
    router: Router,
    temp: TempDir,
}

fn test_app() -> TestApp {
    let temp = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.storage.data_dir = temp.path().join("data");
    config.storage.public_dir = temp.path().join("public");

    let core = ShowcaseCore::open(Config::from(&config)).unwrap();
    TestApp {
        router: router(AppState::new(core), 4 * 1024 * 1024),
        temp,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn login(&self) -> String {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/admin/login",
                json!({ "username": "admin", "password": "RealTrust@2025" }),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, Vec<u8>),
}

fn multipart_request(uri: &str, parts: Vec<Part<'_>>, token: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(640, 480, image::Rgb([30, 160, 90]));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

mod auth {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_token_and_admin() {
        let app = test_app();

        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/admin/login",
                json!({ "username": "admin", "password": "RealTrust@2025" }),
                None,
            ))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["admin"]["username"], "admin");
        assert!(body["admin"]["timestamp"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let app = test_app();

        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/admin/login",
                json!({ "username": "admin", "password": "nope" }),
                None,
            ))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_with_missing_fields_is_bad_request() {
        let app = test_app();

        let (status, _) = app
            .send(json_request(
                "POST",
                "/api/admin/login",
                json!({ "username": "admin" }),
                None,
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validate_accepts_fresh_token() {
        let app = test_app();
        let token = app.login().await;

        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/admin/validate",
                json!({ "token": token }),
                None,
            ))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "valid": true }));
    }

    #[tokio::test]
    async fn test_validate_soft_fails_on_bad_input() {
        let app = test_app();

        for body in [json!({ "token": "garbage" }), json!({}), json!("not an object")] {
            let (status, response) = app
                .send(json_request("POST", "/api/admin/validate", body, None))
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(response, json!({ "valid": false }));
        }

        let (status, response) = app
            .send(empty_request("POST", "/api/admin/validate", None))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(response, json!({ "valid": false }));
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let app = test_app();

        for uri in ["/api/contact", "/api/subscribers"] {
            let (status, _) = app.send(empty_request("GET", uri, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");

            let (status, _) = app.send(empty_request("GET", uri, Some("forged"))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }

        let (status, _) = app
            .send(multipart_request(
                "/api/projects",
                vec![
                    Part::Text("name", "Harbor"),
                    Part::Text("description", "Lofts"),
                    Part::Text("imageSource", "url"),
                    Part::Text("imageUrl", "https://example.com/a.jpg"),
                ],
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

mod bearer_scheme {
    use super::*;

    #[tokio::test]
    async fn test_lowercase_scheme_is_admitted() {
        let app = test_app();
        let token = app.login().await;

        let request = Request::builder()
            .method("GET")
            .uri("/api/subscribers")
            .header(header::AUTHORIZATION, format!("bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}

mod projects {
    use super::*;

    #[tokio::test]
    async fn test_create_with_url_then_list() {
        let app = test_app();
        let token = app.login().await;

        let (status, created) = app
            .send(multipart_request(
                "/api/projects",
                vec![
                    Part::Text("name", "Harbor Lofts"),
                    Part::Text("description", "Riverside units"),
                    Part::Text("imageSource", "url"),
                    Part::Text("imageUrl", "https://example.com/a.jpg"),
                ],
                Some(&token),
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["imageUrl"], "https://example.com/a.jpg");
        assert_eq!(created["name"], "Harbor Lofts");

        let (status, listed) = app.send(empty_request("GET", "/api/projects", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_create_with_file_serves_cropped_jpeg() {
        let app = test_app();
        let token = app.login().await;

        let (status, created) = app
            .send(multipart_request(
                "/api/projects",
                vec![
                    Part::Text("name", "Harbor Lofts"),
                    Part::Text("description", "Riverside units"),
                    Part::Text("imageSource", "file"),
                    Part::File("image", "My Pic.png", png_bytes()),
                ],
                Some(&token),
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        let image_url = created["imageUrl"].as_str().unwrap().to_string();
        assert!(image_url.starts_with("/uploads/projects/project-"));
        assert!(image_url.ends_with("-cropped.jpg"));

        let on_disk = app
            .temp
            .path()
            .join("public")
            .join(image_url.trim_start_matches('/'));
        let derivative = image::open(on_disk).unwrap();
        assert_eq!((derivative.width(), derivative.height()), (450, 350));

        let response = app
            .router
            .clone()
            .oneshot(empty_request("GET", &image_url, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_file_source_without_file_is_bad_request() {
        let app = test_app();
        let token = app.login().await;

        let (status, body) = app
            .send(multipart_request(
                "/api/projects",
                vec![
                    Part::Text("name", "Harbor Lofts"),
                    Part::Text("description", "Riverside units"),
                    Part::Text("imageSource", "file"),
                ],
                Some(&token),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());

        let (_, listed) = app.send(empty_request("GET", "/api/projects", None)).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_garbage_upload_is_unprocessable() {
        let app = test_app();
        let token = app.login().await;

        let (status, _) = app
            .send(multipart_request(
                "/api/projects",
                vec![
                    Part::Text("name", "Harbor Lofts"),
                    Part::Text("description", "Riverside units"),
                    Part::Text("imageSource", "file"),
                    Part::File("image", "notes.png", b"not an image".to_vec()),
                ],
                Some(&token),
            ))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (_, listed) = app.send(empty_request("GET", "/api/projects", None)).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_missing_image_source_is_bad_request() {
        let app = test_app();
        let token = app.login().await;

        let (status, body) = app
            .send(multipart_request(
                "/api/clients",
                vec![
                    Part::Text("name", "Rowan"),
                    Part::Text("description", "Buyer"),
                    Part::Text("designation", "CEO"),
                ],
                Some(&token),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid image source");
    }

    #[tokio::test]
    async fn test_delete_project() {
        let app = test_app();
        let token = app.login().await;

        let (_, created) = app
            .send(multipart_request(
                "/api/projects",
                vec![
                    Part::Text("name", "Harbor Lofts"),
                    Part::Text("description", "Riverside units"),
                    Part::Text("imageSource", "url"),
                    Part::Text("imageUrl", "https://example.com/a.jpg"),
                ],
                Some(&token),
            ))
            .await;
        let uri = format!("/api/projects/{}", created["id"]);

        let (status, _) = app.send(empty_request("DELETE", &uri, Some(&token))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send(empty_request("DELETE", &uri, Some(&token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod clients {
    use super::*;

    #[tokio::test]
    async fn test_create_client_with_designation() {
        let app = test_app();
        let token = app.login().await;

        let (status, created) = app
            .send(multipart_request(
                "/api/clients",
                vec![
                    Part::Text("name", "Rowan Ellis"),
                    Part::Text("description", "Happy buyer"),
                    Part::Text("designation", "CEO, Foundry"),
                    Part::Text("imageSource", "file"),
                    Part::File("image", "head shot.png", png_bytes()),
                ],
                Some(&token),
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["designation"], "CEO, Foundry");
        assert!(
            created["imageUrl"]
                .as_str()
                .unwrap()
                .starts_with("/uploads/clients/client-")
        );

        let (_, listed) = app.send(empty_request("GET", "/api/clients", None)).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }
}

mod visitors {
    use super::*;

    #[tokio::test]
    async fn test_contact_submission_visible_to_admin() {
        let app = test_app();

        let (status, created) = app
            .send(json_request(
                "POST",
                "/api/contact",
                json!({ "name": "Ana", "email": "ana@example.com", "mobile": "5550100", "city": "Porto" }),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["createdAt"].as_str().is_some());

        let token = app.login().await;
        let (status, listed) = app
            .send(empty_request("GET", "/api/contact", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_contact_missing_field_is_bad_request() {
        let app = test_app();

        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/contact",
                json!({ "name": "Ana", "email": "ana@example.com" }),
                None,
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: mobile");
    }

    #[tokio::test]
    async fn test_duplicate_subscriber_conflicts() {
        let app = test_app();
        let subscribe = || {
            json_request(
                "POST",
                "/api/subscribers",
                json!({ "email": "news@example.com" }),
                None,
            )
        };

        let (status, _) = app.send(subscribe()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app.send(subscribe()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Database error: Email already subscribed");

        let token = app.login().await;
        let (_, listed) = app
            .send(empty_request("GET", "/api/subscribers", Some(&token)))
            .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_subscriber_is_not_found() {
        let app = test_app();
        let token = app.login().await;

        let (status, _) = app
            .send(empty_request("DELETE", "/api/subscribers/42", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
