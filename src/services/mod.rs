pub mod convert;
pub mod db;
pub mod encoding;
pub mod hash;
pub mod local_repo;
pub mod locale;
pub mod normalize;
pub mod project;
pub mod repository;
pub mod store;
