//! Shared data model of the tenfold console.
//!
//! Plain serde types mirroring the backend's REST payloads. Nothing in this
//! crate touches the network; interpreting these records is the backend's
//! job, the console only carries them between forms and requests.

pub mod auth;
pub mod crm;
pub mod tenant;

mod serde_util;

pub use auth::AuthResponse;
pub use crm::{
    Contact, ContactCreate, ContactPatch, Lead, LeadCreate, LeadPatch, Opportunity,
    OpportunityCreate, OpportunityPatch,
};
pub use tenant::{Tenant, TenantCreate, TenantId, TenantPatch, User, UserCreate, UserPatch};
