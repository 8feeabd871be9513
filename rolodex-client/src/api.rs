/// Typed REST client for the Rolodex API
///
/// The only channel between the frontend and the server. Mirrors the HTTP
/// contract exactly: JSON for auth, multipart for contact create/edit, and
/// the `{ "error": ... }` failure shape everywhere.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};

use crate::session::UserProfile;

/// A contact record as the server returns it
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRecord {
    pub id: i32,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response to register and login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// An image attached to a create/edit request
#[derive(Debug, Clone)]
pub struct Picture {
    /// Original filename, the server keeps only the extension
    pub file_name: String,

    /// Declared MIME type; the server accepts `image/*` only
    pub mime_type: String,

    /// File contents (at most 5 MiB server-side)
    pub bytes: Vec<u8>,
}

/// Fields for a contact create or edit
#[derive(Debug, Clone)]
pub struct ContactFields {
    pub name: String,
    pub contact: String,
    pub email: String,
}

/// Error details the server attaches to failed requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed client for the Rolodex REST surface
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Creates an unauthenticated client
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid server URL")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        })
    }

    /// Attaches the session's bearer token to subsequent requests
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).context("failed to build API URL")
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let response = self.authorize(req).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("{}", api_error_message(status, &body));
        }
        serde_json::from_str(&body).context("failed to decode API response")
    }

    async fn send_empty(&self, req: reqwest::RequestBuilder) -> Result<()> {
        let response = self.authorize(req).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", api_error_message(status, &body));
        }
        Ok(())
    }

    /// POST /api/auth/register
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let url = self.url("/api/auth/register")?;
        self.send_json(
            self.http
                .post(url)
                .json(&serde_json::json!({ "email": email, "password": password })),
        )
        .await
    }

    /// POST /api/auth/login
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let url = self.url("/api/auth/login")?;
        self.send_json(
            self.http
                .post(url)
                .json(&serde_json::json!({ "email": email, "password": password })),
        )
        .await
    }

    /// GET /api/contacts
    pub async fn list_contacts(&self) -> Result<Vec<ContactRecord>> {
        let url = self.url("/api/contacts")?;
        self.send_json(self.http.get(url)).await
    }

    /// GET /api/contacts/:id
    pub async fn get_contact(&self, id: i32) -> Result<ContactRecord> {
        let url = self.url(&format!("/api/contacts/{id}"))?;
        self.send_json(self.http.get(url)).await
    }

    /// POST /api/contacts (multipart; the picture is required server-side)
    pub async fn create_contact(
        &self,
        fields: ContactFields,
        picture: Picture,
    ) -> Result<ContactRecord> {
        let url = self.url("/api/contacts")?;
        let form = contact_form(fields, Some(picture))?;
        self.send_json(self.http.post(url).multipart(form)).await
    }

    /// PUT /api/contacts/:id (multipart; omitting the picture keeps the
    /// stored one)
    pub async fn update_contact(
        &self,
        id: i32,
        fields: ContactFields,
        picture: Option<Picture>,
    ) -> Result<ContactRecord> {
        let url = self.url(&format!("/api/contacts/{id}"))?;
        let form = contact_form(fields, picture)?;
        self.send_json(self.http.put(url).multipart(form)).await
    }

    /// DELETE /api/contacts/:id
    pub async fn delete_contact(&self, id: i32) -> Result<()> {
        let url = self.url(&format!("/api/contacts/{id}"))?;
        self.send_empty(self.http.delete(url)).await
    }
}

/// Builds the multipart body shared by create and edit
fn contact_form(fields: ContactFields, picture: Option<Picture>) -> Result<Form> {
    let mut form = Form::new()
        .text("name", fields.name)
        .text("contact", fields.contact)
        .text("email", fields.email);

    if let Some(picture) = picture {
        let part = Part::bytes(picture.bytes)
            .file_name(picture.file_name)
            .mime_str(&picture.mime_type)
            .context("invalid picture MIME type")?;
        form = form.part("picture", part);
    }

    Ok(form)
}

/// Extracts the server's `{"error": ...}` message, falling back to the
/// status line for bodies that aren't in that shape
fn api_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => format!("API error ({})", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_prefers_server_shape() {
        let message = api_error_message(
            StatusCode::CONFLICT,
            r#"{"error":"Contact or email already exists"}"#,
        );
        assert_eq!(message, "Contact or email already exists");
    }

    #[test]
    fn test_api_error_message_falls_back_to_status() {
        let message = api_error_message(StatusCode::BAD_GATEWAY, "<html>nope</html>");
        assert_eq!(message, "API error (502 Bad Gateway)");
    }

    #[test]
    fn test_client_url_building() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        let url = client.url("/api/contacts/7").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/contacts/7");
    }
}
