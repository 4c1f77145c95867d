pub mod config;
pub mod error;
pub mod genres;
pub mod models;
pub mod mylist;
