use crate::error::Result;
use crate::model::criteria::Criteria;
use crate::model::resource::Resource;
use crate::model::translation_set::TranslationSet;

/// Persistence backend for translation sets.
///
/// Every operation either succeeds or surfaces the backend's error. `close`
/// consumes the repository, so it cannot be used afterwards.
pub trait TranslationRepository {
    /// Persists every resource of `set`. Returns the number of affected rows
    /// (or resources, for backends without rows).
    fn add_all(&mut self, set: &TranslationSet) -> Result<usize>;

    fn get_by(&self, criteria: &Criteria) -> Result<Vec<Resource>>;

    /// Removes `resource`. Returns the number of affected rows.
    fn remove(&mut self, resource: &Resource) -> Result<usize>;

    fn size(&self) -> Result<usize>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}
