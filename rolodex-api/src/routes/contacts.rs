/// Contact CRUD endpoints
///
/// # Endpoints
///
/// - `GET    /api/contacts`     - list all contacts (public)
/// - `GET    /api/contacts/:id` - fetch one contact (public)
/// - `POST   /api/contacts`     - create (bearer, multipart)
/// - `PUT    /api/contacts/:id` - edit (bearer, multipart)
/// - `DELETE /api/contacts/:id` - delete (bearer)
///
/// Each mutating handler is an explicit pipeline of stages, every stage a
/// `Result`: parse the multipart body (storing the picture as a side
/// effect), validate the fields, check for duplicates, persist, respond.
/// The bearer check ran earlier, in the route-level middleware.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    upload,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use rolodex_shared::{
    auth::middleware::AuthContext,
    models::contact::{Contact, CreateContact, UpdateContact},
};
use validator::Validate;

/// Field values extracted from a create/edit multipart body
#[derive(Debug, Default, Validate)]
pub struct ContactForm {
    /// Display name
    #[validate(length(min = 6, message = "Name must be at least 6 characters long"))]
    pub name: String,

    /// Phone-like contact number
    #[validate(length(min = 9, max = 9, message = "Contact must be exactly 9 digits"))]
    pub contact: String,

    /// Email address
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
}

/// A parsed create/edit request body
struct ContactSubmission {
    /// The text fields, not yet validated
    form: ContactForm,

    /// Stored filename of the uploaded picture, if one was attached
    picture: Option<String>,
}

/// Drains a multipart body into form fields, storing the picture on the way
///
/// The picture hits disk while the stream is parsed; a later validation or
/// duplicate failure leaves it behind, matching the documented intake
/// behavior. Missing text fields stay empty and fail validation afterwards.
async fn read_submission(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<ContactSubmission, ApiError> {
    let mut form = ContactForm::default();
    let mut picture = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };

        match field_name.as_str() {
            "name" => form.name = field.text().await?,
            "contact" => form.contact = field.text().await?,
            "email" => form.email = field.text().await?,
            upload::UPLOAD_FIELD => {
                let dir = std::path::Path::new(&state.config.files.upload_dir);
                picture = Some(upload::store_picture(dir, field).await?);
            }
            _ => {}
        }
    }

    Ok(ContactSubmission { form, picture })
}

/// Lists all contacts, newest first (public)
pub async fn list_contacts(State(state): State<AppState>) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = Contact::list(&state.db).await?;
    Ok(Json(contacts))
}

/// Fetches one contact by id (public)
///
/// # Errors
///
/// - `404 Not Found` when no row exists for the id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Contact>> {
    let contact = Contact::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("contact not found".to_string()))?;

    Ok(Json(contact))
}

/// Creates a contact from a multipart body (bearer required)
///
/// # Errors
///
/// - `400 Bad Request`: no picture attached (`"Picture is required"`, wins
///   over any field problems), the upload was rejected by intake, or field
///   validation failed
/// - `409 Conflict`: another row already holds the `contact` or `email`
/// - `500 Internal Server Error`: server error
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let submission = read_submission(&state, &mut multipart).await?;

    // A missing picture is reported regardless of what else is wrong with
    // the body.
    let Some(picture) = submission.picture else {
        return Err(ApiError::BadRequest("Picture is required".to_string()));
    };

    submission.form.validate()?;

    // Point-in-time duplicate check; the unique constraints backstop the
    // window between this lookup and the insert.
    if Contact::find_conflicting(&state.db, &submission.form.contact, &submission.form.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Contact or email already exists".to_string(),
        ));
    }

    let contact = Contact::create(
        &state.db,
        CreateContact {
            name: submission.form.name,
            contact: submission.form.contact,
            email: submission.form.email,
            picture,
        },
    )
    .await?;

    tracing::info!(contact_id = contact.id, user_id = auth.user_id, "Contact created");

    Ok((StatusCode::CREATED, Json(contact)))
}

/// Edits a contact from a multipart body (bearer required)
///
/// The picture is optional on edit: when no file is attached, the row keeps
/// its prior filename.
///
/// # Errors
///
/// - `400 Bad Request`: field validation failed, or the upload was rejected
/// - `404 Not Found`: no row exists for the id
/// - `409 Conflict`: a *different* row already holds the new `contact` or
///   `email`
/// - `500 Internal Server Error`: server error
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> ApiResult<Json<Contact>> {
    let submission = read_submission(&state, &mut multipart).await?;

    submission.form.validate()?;

    let existing = Contact::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))?;

    if Contact::find_conflicting_excluding(
        &state.db,
        &submission.form.contact,
        &submission.form.email,
        id,
    )
    .await?
    .is_some()
    {
        return Err(ApiError::Conflict(
            "Contact or email already exists".to_string(),
        ));
    }

    let picture = submission.picture.unwrap_or(existing.picture);

    let updated = Contact::update(
        &state.db,
        id,
        UpdateContact {
            name: submission.form.name,
            contact: submission.form.contact,
            email: submission.form.email,
            picture,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))?;

    tracing::info!(contact_id = updated.id, user_id = auth.user_id, "Contact updated");

    Ok(Json(updated))
}

/// Deletes a contact (bearer required)
///
/// # Errors
///
/// - `404 Not Found`: no row matched the id
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let deleted = Contact::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Contact not found".to_string()));
    }

    tracing::info!(contact_id = id, user_id = auth.user_id, "Contact deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form_valid() {
        let form = ContactForm {
            name: "Diego Dev".to_string(),
            contact: "123456789".to_string(),
            email: "diegodev@example.com".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_contact_form_short_name() {
        let form = ContactForm {
            name: "Bob".to_string(),
            contact: "123456789".to_string(),
            email: "bob@example.com".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_contact_form_contact_length() {
        for bad in ["12345678", "1234567890", ""] {
            let form = ContactForm {
                name: "Diego Dev".to_string(),
                contact: bad.to_string(),
                email: "diegodev@example.com".to_string(),
            };
            let errors = form.validate().unwrap_err();
            assert!(
                errors.field_errors().contains_key("contact"),
                "'{}' should fail the length rule",
                bad
            );
        }
    }

    #[test]
    fn test_contact_form_invalid_email() {
        let form = ContactForm {
            name: "Diego Dev".to_string(),
            contact: "123456789".to_string(),
            email: "nope".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_empty_form_collects_all_failures() {
        // An empty multipart body leaves every field empty; validation must
        // report each one rather than stopping at the first.
        let form = ContactForm::default();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("contact"));
        assert!(fields.contains_key("email"));
    }
}
