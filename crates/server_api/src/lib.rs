use shared::error::ApiError;
use storage::{ContactStore, StoreError};
use tracing::{debug, error, info};

pub mod form;
pub mod render;
pub mod routes;

pub use form::parse_contact_update;
pub use render::{Escaping, RenderOptions};
pub use routes::Route;

#[derive(Clone)]
pub struct ApiContext {
    pub contacts: ContactStore,
    pub render: RenderOptions,
}

/// Transport-neutral request: the endpoint only ever looks at these three values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointRequest {
    pub path: String,
    pub method: String,
    pub body: String,
}

impl EndpointRequest {
    pub fn new(path: impl Into<String>, method: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            body: body.into(),
        }
    }
}

/// Routes a request to an optional mutation followed by a render.
///
/// `Ok(None)` means no route matched; the transport decides how to report it.
pub async fn dispatch(ctx: &ApiContext, req: &EndpointRequest) -> Result<Option<String>, ApiError> {
    let Some(route) = Route::resolve(&req.path, &req.method) else {
        debug!(path = %req.path, method = %req.method, "no route for request");
        return Ok(None);
    };

    let html = match route {
        Route::Home => {
            let contact = ctx.contacts.get().await.map_err(internal)?;
            render::home_page(&contact, &ctx.render)
        }
        Route::ShowContact => {
            let contact = ctx.contacts.get().await.map_err(internal)?;
            render::contact_fragment(&contact, &ctx.render)
        }
        Route::UpdateContact => {
            let update = parse_contact_update(&req.body);
            info!(
                first = update.first.is_some(),
                last = update.last.is_some(),
                email = update.email.is_some(),
                "updating contact"
            );
            let contact = ctx.contacts.update(update).await.map_err(internal)?;
            render::contact_fragment(&contact, &ctx.render)
        }
        Route::EditContact => {
            let contact = ctx.contacts.get().await.map_err(internal)?;
            render::form_fragment(&contact, &ctx.render)
        }
    };

    debug!(
        route = route.name(),
        method = %req.method,
        mutated = route.mutates(),
        "request dispatched"
    );
    Ok(Some(html))
}

fn internal(err: StoreError) -> ApiError {
    error!(error = %err, "contact store failure");
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
