//! Organization registry core: domain models, error taxonomy and the
//! repository trait that storage backends implement.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{CollectionError, RegistryError, RegistryResult};
