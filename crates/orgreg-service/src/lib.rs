//! Orgreg Service: the tenant lifecycle.
//!
//! [`OrganizationService`] is the only writer of the organization
//! aggregate (metadata record, admin record and tenant collection).

pub mod models;
pub mod service;

pub use models::{
    ConsistencyReport, CreateOrgInput, DeleteOutput, LoginInput, LoginOutput, OrganizationView,
    UpdateOrgInput, Violation,
};
pub use service::OrganizationService;
