//! Domain models for the organization registry.
//!
//! An [`organization::Organization`], its single [`admin::Admin`] and its
//! physical tenant collection form one aggregate.

pub mod admin;
pub mod organization;
