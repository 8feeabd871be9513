//! # Rolodex Client Core
//!
//! The non-view core of the Rolodex single-page app: everything the views
//! sit on top of, with no rendering concerns. The frontend talks to the
//! server exclusively through the HTTP contract in [`api`].
//!
//! ## Modules
//!
//! - `router`: client-side route table and the navigation guard
//! - `session`: explicit session state (token + cached user) over a storage
//!   seam, injected into views instead of ambient module state
//! - `api`: typed REST client for the server's API surface

pub mod api;
pub mod router;
pub mod session;
