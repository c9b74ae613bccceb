// Domain layer: the school aggregate and the ports (interfaces) it is persisted and ordered through.

pub mod discipline;
pub mod ports;
pub mod school;
pub mod student;

pub use discipline::Discipline;
pub use ports::{Storage, StudentComparator};
pub use school::School;
pub use student::Student;

/// Case-insensitive name match used by every by-name lookup.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
