use std::{borrow::Cow, str::FromStr};

use shared::domain::ContactRecord;

use crate::routes::{CONTACT_PATH, EDIT_PATH};

pub const DEFAULT_HTMX_SCRIPT_URL: &str = "https://unpkg.com/htmx.org@1.9.4";
pub const PAGE_TITLE: &str = "HTMX Contact Demo";

/// How contact fields are interpolated into markup.
///
/// `Trusted` writes field values into attribute and text positions verbatim,
/// which is only safe when every writer is trusted. Anything reachable from
/// an untrusted client must use `Html`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escaping {
    #[default]
    Html,
    Trusted,
}

impl FromStr for Escaping {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "trusted" | "none" => Ok(Self::Trusted),
            other => Err(format!("unknown escaping mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub escaping: Escaping,
    pub htmx_script_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escaping: Escaping::default(),
            htmx_script_url: DEFAULT_HTMX_SCRIPT_URL.into(),
        }
    }
}

impl RenderOptions {
    fn field<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self.escaping {
            Escaping::Html => html_escape(value),
            Escaping::Trusted => Cow::Borrowed(value),
        }
    }
}

pub fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;"),
    )
}

/// Read-only view of the contact; swaps itself for the edit form on click.
pub fn contact_fragment(contact: &ContactRecord, options: &RenderOptions) -> String {
    format!(
        r#"
    <div hx-target="this" hx-swap="outerHTML">
      <div><label>First Name</label>: {first}</div>
      <div><label>Last Name</label>: {last}</div>
      <div><label>Email</label>: {email}</div>
      <button hx-get="{edit}" class="btn btn-primary">
        Click To Edit
      </button>
    </div>
"#,
        first = options.field(&contact.first),
        last = options.field(&contact.last),
        email = options.field(&contact.email),
        edit = EDIT_PATH,
    )
}

/// Edit form pre-filled with the current values. Submitting PUTs the form to
/// `/contact`; cancelling fetches the read-only view again.
pub fn form_fragment(contact: &ContactRecord, options: &RenderOptions) -> String {
    format!(
        r#"
    <form hx-put="{contact_path}" hx-target="this" hx-swap="outerHTML">
      <div>
        <label>First Name</label>
        <input type="text" name="first" value="{first}">
      </div>
      <div class="form-group">
        <label>Last Name</label>
        <input type="text" name="last" value="{last}">
      </div>
      <div class="form-group">
        <label>Email</label>
        <input type="email" name="email" value="{email}">
      </div>
      <button class="btn">Submit</button>
      <button class="btn" hx-get="{contact_path}">Cancel</button>
    </form>
  "#,
        contact_path = CONTACT_PATH,
        first = options.field(&contact.first),
        last = options.field(&contact.last),
        email = options.field(&contact.email),
    )
}

pub fn home_page(contact: &ContactRecord, options: &RenderOptions) -> String {
    format!(
        r#"<!DOCTYPE html>
  <html>
    <head>
      <meta charset="utf-8">
      <title>{title}</title>
      <script src="{script}"></script>
      {style}
    </head>
    <body>
      <main class="container">
        <section>
        {fragment}
        </section>
        <section>
        The above form is rendered server-side but won't reload the page when editing or submitting.
        <p>
        The contact data is persisted by the server and survives restarts.
        </section>
        <footer>
        This is a demo of <a href="https://htmx.org">HTMX</a> fragments served from Rust.
        </footer>
      </main>
    </body>
  </html>
"#,
        title = PAGE_TITLE,
        script = html_escape(&options.htmx_script_url),
        style = STYLE,
        fragment = contact_fragment(contact, options),
    )
}

const STYLE: &str = r#"<style>
        body {
          font-family: sans-serif;
          color: #333;
          line-height: 1.5;
        }
        main {
          display: flex;
          justify-content: center;
          align-items: center;
          height: 100vh;
          flex-direction: column;
          gap: 1rem;
        }
        section {
          border: 1px solid #ccc;
          padding: 3rem;
          width: 300px;
        }
        button {
          margin-top: 1rem;
        }
        footer {
          opacity: 0.8;
        }
      </style>"#;

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
