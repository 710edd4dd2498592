pub mod entities;

pub use entities::{normalize_decimal, Category, Material, Project, Step};
