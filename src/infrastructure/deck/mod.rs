pub mod json_repo;

pub use json_repo::JsonFileDeckRepo;
