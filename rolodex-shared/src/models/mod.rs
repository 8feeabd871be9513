/// Database models for Rolodex
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts backing registration and login
/// - `contact`: Contact records, the record of truth for the address book
///
/// # Example
///
/// ```no_run
/// use rolodex_shared::models::contact::Contact;
/// use rolodex_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let contacts = Contact::list(&pool).await?;
/// println!("{} contacts", contacts.len());
/// # Ok(())
/// # }
/// ```

pub mod contact;
pub mod user;
