pub mod app;
pub mod config;
pub mod error;
pub mod taxonomy;
pub mod db {
    pub mod category_repository;
    #[cfg(test)]
    pub(crate) mod memory;
    pub mod models;
    pub mod repository;
    pub mod technology_repository;
}
pub mod api {
    pub mod categories;
    pub mod documents;
    pub mod errors;
    pub mod technologies;
    pub mod validation;
}
