use super::*;
use std::sync::Arc;

use async_trait::async_trait;
use shared::{domain::ContactRecord, error::ErrorCode};
use storage::{KeyValueStore, Storage};

async fn test_ctx() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext {
        contacts: ContactStore::new(Arc::new(storage)),
        render: RenderOptions::default(),
    }
}

async fn call(ctx: &ApiContext, path: &str, method: &str, body: &str) -> Option<String> {
    dispatch(ctx, &EndpointRequest::new(path, method, body))
        .await
        .expect("dispatch")
}

struct ReadOnlyBackend;

#[async_trait]
impl KeyValueStore for ReadOnlyBackend {
    async fn load(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    async fn store(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("read-only substrate")
    }
}

#[test]
fn route_table_resolves_known_paths() {
    assert_eq!(Route::resolve("/", "GET"), Some(Route::Home));
    assert_eq!(Route::resolve("/", "POST"), Some(Route::Home));
    assert_eq!(Route::resolve("/contact", "PUT"), Some(Route::UpdateContact));
    assert_eq!(Route::resolve("/contact", "GET"), Some(Route::ShowContact));
    assert_eq!(Route::resolve("/contact", "put"), Some(Route::ShowContact));
    assert_eq!(Route::resolve("/edit", "DELETE"), Some(Route::EditContact));
    assert_eq!(Route::resolve("/missing", "GET"), None);
    assert_eq!(Route::resolve("/contact/", "PUT"), None);
}

#[tokio::test]
async fn unknown_path_yields_no_response() {
    let ctx = test_ctx().await;
    assert!(call(&ctx, "/missing", "GET", "").await.is_none());
}

#[tokio::test]
async fn partial_update_changes_only_supplied_field() {
    let ctx = test_ctx().await;
    call(&ctx, "/contact", "PUT", "first=Jane").await.expect("html");
    assert_eq!(
        ctx.contacts.get().await.expect("get"),
        ContactRecord {
            first: "Jane".into(),
            last: "Doe".into(),
            email: "john@example.com".into(),
        }
    );
}

#[tokio::test]
async fn empty_value_clears_field() {
    let ctx = test_ctx().await;
    call(&ctx, "/contact", "PUT", "last=").await.expect("html");
    let contact = ctx.contacts.get().await.expect("get");
    assert_eq!(contact.last, "");
    assert_eq!(contact.first, "John");
}

#[tokio::test]
async fn update_then_view_round_trips() {
    let ctx = test_ctx().await;
    let after_put = call(&ctx, "/contact", "PUT", "first=A&last=B&email=c@d.com")
        .await
        .expect("html");
    let view = call(&ctx, "/contact", "GET", "").await.expect("html");

    assert_eq!(after_put, view);
    assert!(view.contains(": A</div>"));
    assert!(view.contains(": B</div>"));
    assert!(view.contains("c@d.com"));
}

#[tokio::test]
async fn non_put_methods_never_mutate() {
    let ctx = test_ctx().await;
    for method in ["GET", "DELETE", "POST", "PATCH"] {
        call(&ctx, "/contact", method, "first=Mallory").await.expect("html");
    }
    for method in ["GET", "DELETE", "POST", "PATCH", "PUT"] {
        call(&ctx, "/edit", method, "first=Mallory").await.expect("html");
        call(&ctx, "/", method, "first=Mallory").await.expect("html");
    }
    assert_eq!(ctx.contacts.get().await.expect("get"), ContactRecord::default());
}

#[tokio::test]
async fn repeated_views_are_identical() {
    let ctx = test_ctx().await;
    let first = call(&ctx, "/contact", "GET", "").await;
    let second = call(&ctx, "/contact", "GET", "").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn home_page_contains_current_view_fragment() {
    let ctx = test_ctx().await;
    call(&ctx, "/contact", "PUT", "email=new@example.com").await.expect("html");
    let page = call(&ctx, "/", "GET", "").await.expect("page");
    let fragment = call(&ctx, "/contact", "GET", "").await.expect("fragment");
    assert!(page.contains(&fragment));
}

#[tokio::test]
async fn edit_returns_prefilled_form() {
    let ctx = test_ctx().await;
    let form = call(&ctx, "/edit", "GET", "").await.expect("form");
    assert!(form.contains(r#"name="first" value="John""#));
    assert!(form.contains(r#"hx-put="/contact""#));
}

#[tokio::test]
async fn malformed_body_is_treated_as_no_change() {
    let ctx = test_ctx().await;
    let view = call(&ctx, "/contact", "PUT", "%%%not-a-form").await.expect("html");
    assert!(view.contains(": John</div>"));
    assert_eq!(ctx.contacts.get().await.expect("get"), ContactRecord::default());
}

#[tokio::test]
async fn persistence_failure_is_internal_error() {
    let ctx = ApiContext {
        contacts: ContactStore::new(Arc::new(ReadOnlyBackend)),
        render: RenderOptions::default(),
    };
    let error = dispatch(&ctx, &EndpointRequest::new("/contact", "PUT", "first=Jane"))
        .await
        .expect_err("persist failure");
    assert_eq!(error.code, ErrorCode::Internal);

    // The process keeps the update even though it was not written.
    let view = call(&ctx, "/contact", "GET", "").await.expect("html");
    assert!(view.contains(": Jane</div>"));
}
