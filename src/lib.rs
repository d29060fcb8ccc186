//! Localizable resource model with translation sets, ICU plural conversion
//! and file/SQLite persistence.

pub mod error;
pub mod factory;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use error::{Error, Result};
pub use factory::{new_resource, ResourceClass, ResourceFactory};
pub use model::{Criteria, ResType, Resource, ResourceProps, TranslationSet};
pub use services::db::DbTranslationSet;
pub use services::local_repo::LocalRepository;
pub use services::repository::TranslationRepository;
