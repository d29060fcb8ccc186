pub mod criteria;
pub mod plural;
pub mod project;
pub mod props;
pub mod resource;
pub mod translation_set;

pub use criteria::{Criteria, OneOrMany};
pub use plural::{PluralCategory, PluralStrings};
pub use project::ProjectConfig;
pub use props::ResourceProps;
pub use resource::{
    Origin, ResType, Resource, ResourceArray, ResourceKind, ResourcePlural, ResourceState,
    ResourceString,
};
pub use translation_set::TranslationSet;
