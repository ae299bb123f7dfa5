#![allow(dead_code)]

pub mod temp_files {
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A route file inside its own temporary directory, removed on drop.
    pub struct RouteFile {
        dir: TempDir,
        pub path: PathBuf,
    }

    impl RouteFile {
        pub fn dir(&self) -> &Path {
            self.dir.path()
        }
    }

    pub fn write_route_file(content: &str) -> RouteFile {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api-route.yaml");
        std::fs::write(&path, content).unwrap();
        RouteFile { dir, path }
    }

    /// Write `content` at `relative` under `base`, creating parent directories.
    pub fn write_at(base: &Path, relative: &str, content: &str) -> PathBuf {
        let path = base.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}

pub mod fixtures {
    use routebind::{ApiError, HandlerResult, HandlerSet, MethodTable, RequestContext};
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use http::StatusCode;

    pub const USERS_ROUTES: &str = "\
users:
  route:
    - get: /users/{id}
      handler: GetUser
    - POST: /users
      handler: CreateUser
    - Delete: /users/{id}
      handler: DeleteUser
    - get: /users/{id}/raw
      handler: Raw
    - get: /boom
      handler: Boom
    - get: /broken
      handler: Broken
";

    #[derive(Serialize)]
    pub struct User {
        #[serde(rename = "ID")]
        pub id: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
    }

    #[derive(Deserialize)]
    struct NewUser {
        name: String,
    }

    /// Handler set used across the integration tests.
    pub struct Users;

    impl Users {
        fn get_user(&self, ctx: &mut RequestContext) -> HandlerResult<User> {
            match ctx.path_param("id") {
                Some("1") => Ok(User { id: 1, name: None }),
                _ => Err(ApiError::new("USER_NOT_FOUND", "user not found")
                    .with_status(404)
                    .into()),
            }
        }

        fn create_user(&self, ctx: &mut RequestContext) -> Result<User, ApiError> {
            let new: NewUser = ctx
                .json()
                .map_err(|_| ApiError::bad_request("body must be {\"name\": string}"))?;
            Ok(User {
                id: 2,
                name: Some(new.name),
            })
        }

        fn delete_user(&self, ctx: &mut RequestContext) -> HandlerResult {
            if ctx.path_param("id") == Some("0") {
                return Err(ApiError::new("FORBIDDEN", "cannot delete the root user")
                    .with_status(403)
                    .into());
            }
            ctx.set_status(StatusCode::NO_CONTENT);
            Ok(())
        }

        fn raw(&self, ctx: &mut RequestContext) {
            let id = ctx.path_param("id").unwrap_or_default().to_string();
            ctx.write_text(StatusCode::ACCEPTED, format!("raw {id}"));
        }

        fn boom(&self, _ctx: &mut RequestContext) {
            panic!("handler exploded");
        }

        fn broken(&self, _ctx: &mut RequestContext) -> HandlerResult<Value> {
            Err(anyhow::anyhow!("connection refused").context("loading users"))
        }
    }

    impl HandlerSet for Users {
        fn methods(table: &mut MethodTable<Self>) {
            table
                .returning("GetUser", Users::get_user)
                .returning("CreateUser", Users::create_user)
                .fallible("DeleteUser", Users::delete_user)
                .unit("Raw", Users::raw)
                .unit("Boom", Users::boom)
                .returning("Broken", Users::broken);
        }
    }

    pub fn ok_envelope(data: Value) -> Value {
        json!({"code": "OK", "message": "success", "data": data})
    }
}

pub mod http_util {
    use axum::body::Body;
    use axum::Router;
    use http::{HeaderMap, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Vec<u8>,
    }

    impl TestResponse {
        pub fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }

        pub fn text(&self) -> String {
            String::from_utf8(self.body.clone()).unwrap()
        }
    }

    pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(router: &Router, method: &str, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(router, request).await
    }

    pub async fn request_json(router: &Router, method: &str, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(router, request).await
    }
}
