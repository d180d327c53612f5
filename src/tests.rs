// Router-level tests: full request/response cycles through the session layer.
use super::*;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use tower::ServiceExt;
use crate::models::TaskStatus;

struct TestApp {
    router: Router,
    store: Arc<FixtureStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(FixtureStore::seed(4).unwrap());
        let router = build_router(store.clone(), Config::for_tests());
        Self { router, store }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, cookie: Option<&str>, form: &str) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap()).await
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/login", None, &format!("username={}&password={}", username, password))
            .await;
        assert_eq!(location(&response), "/dashboard");
        session_cookie(&response)
    }
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}

fn session_cookie(response: &Response) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn anonymous_visitor_is_sent_to_login() {
    let app = TestApp::new();
    let response = app.get("/dashboard/projects", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn login_page_lists_demo_accounts() {
    let app = TestApp::new();
    let response = app.get("/?error=Invalid%20username%20or%20password", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<code>sarah</code>"));
    assert!(html.contains("Invalid username or password"));
    assert!(!html.contains("sarah123"));
}

#[tokio::test]
async fn wrong_password_redirects_with_message() {
    let app = TestApp::new();
    let response = app.post("/login", None, "username=admin&password=wrong").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?error=Invalid%20username%20or%20password");
}

#[tokio::test]
async fn admin_dashboard_shows_company_figures() {
    let app = TestApp::new();
    let cookie = app.login("admin", "admin123").await;
    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome back, Alex Morgan"));
    assert!(html.contains("Completed Projects"));
    assert!(html.contains("4/9"));
    assert!(html.contains(r#"<p class="muted">Task Completion</p><p class="stat">44%</p>"#));
    assert!(html.contains(r#"<p class="muted">Total Projects</p><p class="stat">4</p>"#));
    assert!(html.contains("/dashboard/add-project"));
}

#[tokio::test]
async fn member_is_refused_admin_screens() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;
    let response = app.get("/dashboard/add-admin", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/dashboard?notice="));
}

#[tokio::test]
async fn manager_task_list_is_scoped_to_own_projects() {
    let app = TestApp::new();
    let cookie = app.login("sarah", "sarah123").await;
    let html = body_text(app.get("/dashboard/tasks", Some(&cookie)).await).await;
    assert!(html.contains("Build landing page"));
    assert!(html.contains("Set up CI pipeline"));
    assert!(!html.contains("Logo variations"));
    assert!(html.contains("<th>Assignee</th>"));
}

#[tokio::test]
async fn task_filter_narrows_by_status() {
    let app = TestApp::new();
    let cookie = app.login("sarah", "sarah123").await;
    let html = body_text(app.get("/dashboard/tasks?status=done", Some(&cookie)).await).await;
    assert!(html.contains("Accessibility audit"));
    assert!(!html.contains("Build landing page"));
}

#[tokio::test]
async fn status_change_is_session_only() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;

    let response = app.post("/dashboard/tasks/t4/status", Some(&cookie), "status=done").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/tasks?id=t4");

    let html = body_text(app.get("/dashboard/tasks?id=t4", Some(&cookie)).await).await;
    assert!(html.contains(r#"<option value="done" selected>Done</option>"#));
    assert_eq!(app.store.task("t4").unwrap().status, TaskStatus::ToDo);

    // A second visitor never sees the first visitor's override.
    let other = app.login("sarah", "sarah123").await;
    let html = body_text(app.get("/dashboard/tasks?id=t4", Some(&other)).await).await;
    assert!(html.contains(r#"<option value="to-do" selected>To Do</option>"#));
}

#[tokio::test]
async fn switching_user_in_same_browser_drops_overrides() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;
    app.post("/dashboard/tasks/t4/status", Some(&cookie), "status=done").await;

    let response = app
        .post("/login", Some(&cookie), "username=sarah&password=sarah123")
        .await;
    assert_eq!(location(&response), "/dashboard");
    let cookie = session_cookie(&response);

    let html = body_text(app.get("/dashboard/tasks?id=t4", Some(&cookie)).await).await;
    assert!(html.contains(r#"<option value="to-do" selected>To Do</option>"#));
    assert!(!html.contains(r#"<option value="done" selected>Done</option>"#));
}

#[tokio::test]
async fn relogin_as_same_user_keeps_overrides() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;
    app.post("/dashboard/tasks/t4/status", Some(&cookie), "status=done").await;

    let response = app
        .post("/login", Some(&cookie), "username=emily&password=emily123")
        .await;
    let cookie = session_cookie(&response);

    let html = body_text(app.get("/dashboard/tasks?id=t4", Some(&cookie)).await).await;
    assert!(html.contains(r#"<option value="done" selected>Done</option>"#));
}

#[tokio::test]
async fn placeholder_text_in_error_is_not_expanded() {
    let app = TestApp::new();
    let html = body_text(app.get("/?error=%7B%7Bdemo%7D%7D", None).await).await;
    assert_eq!(html.matches("<code>sarah</code>").count(), 1);
    assert!(!html.contains("{{demo}}"));

    let cookie = app.login("emily", "emily123").await;
    let html = body_text(app.get("/dashboard?error=%7B%7Bcontent%7D%7D", Some(&cookie)).await).await;
    assert!(html.contains(r#"<div class="alert alert-error">&#123;&#123;content&#125;&#125;</div>"#));
}

#[tokio::test]
async fn member_cannot_touch_someone_elses_task() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;
    let response = app.post("/dashboard/tasks/t2/status", Some(&cookie), "status=done").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.get("/dashboard/tasks?id=t2", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn password_mismatch_is_reported_inline() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;
    let response = app
        .post(
            "/dashboard/profile/password",
            Some(&cookie),
            "current=emily123&new_password=abc12345&confirm=abc12346",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/dashboard/profile?error=Passwords"));

    let html = body_text(app.get(&target, Some(&cookie)).await).await;
    assert!(html.contains("alert-error"));
    assert!(html.contains("match"));
}

#[tokio::test]
async fn matching_password_change_shows_banner_and_reverts() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;
    let response = app
        .post(
            "/dashboard/profile/password",
            Some(&cookie),
            "current=emily123&new_password=abc12345&confirm=abc12345",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Password changed successfully!"));
    assert!(html.contains(r#"content="3; url=/dashboard/profile""#));

    // Nothing was saved: the old password still works.
    app.login("emily", "emily123").await;
}

#[tokio::test]
async fn add_project_accepts_repeated_member_fields() {
    let app = TestApp::new();
    let cookie = app.login("admin", "admin123").await;
    let response = app
        .post(
            "/dashboard/add-project",
            Some(&cookie),
            "name=Data+Platform&description=Warehouse+rebuild&manager=u3&members=u5&members=u7",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("2 member(s) under Michael Brooks"));
    assert_eq!(app.store.projects().len(), 4);
}

#[tokio::test]
async fn add_project_rejects_non_member_team() {
    let app = TestApp::new();
    let cookie = app.login("admin", "admin123").await;
    let response = app
        .post(
            "/dashboard/add-project",
            Some(&cookie),
            "name=Data+Platform&description=Warehouse+rebuild&manager=u3&members=u2",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/dashboard/add-project?error="));
}

#[tokio::test]
async fn manager_cannot_assign_on_foreign_project() {
    let app = TestApp::new();
    let cookie = app.login("sarah", "sarah123").await;
    let response = app
        .post(
            "/dashboard/assign-task",
            Some(&cookie),
            "title=Review&description=Check+tokens&project=p4&assigned_to=u6&priority=high&due_date=2024-06-01",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/dashboard/assign-task?error="));

    let response = app
        .post(
            "/dashboard/assign-task",
            Some(&cookie),
            "title=Review&description=Check+copy&project=p1&assigned_to=u5&priority=high&due_date=2024-06-01",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("assigned to David Kim"));
}

#[tokio::test]
async fn duplicate_email_is_rejected_on_user_forms() {
    let app = TestApp::new();
    let cookie = app.login("admin", "admin123").await;
    let response = app
        .post(
            "/dashboard/add-manager",
            Some(&cookie),
            "name=Sarah+Again&email=sarah.chen%40example.com&department=d1",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/dashboard/add-manager?error="));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let cookie = app.login("sarah", "sarah123").await;
    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(location(&response), "/");

    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn unknown_project_detail_is_not_found() {
    let app = TestApp::new();
    let cookie = app.login("emily", "emily123").await;
    // p3 exists but Emily is not on its team
    let response = app.get("/dashboard/projects?id=p3", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.get("/dashboard/projects?id=p1", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_page_forwards_logged_in_visitors() {
    let app = TestApp::new();
    let cookie = app.login("michael", "michael123").await;
    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn fixture_file_replaces_seed() {
    use std::io::Write;
    let mut data = services::FixtureData::seed().unwrap();
    data.tasks.clear();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&data).unwrap().as_bytes()).unwrap();

    let mut config = Config::for_tests();
    config.fixtures.path = Some(file.path().to_string_lossy().into_owned());
    let store = load_store(&config).unwrap();
    assert!(store.tasks().is_empty());
    assert_eq!(store.users().len(), 7);
}
