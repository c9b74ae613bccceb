use crate::domain::student::Student;
use crate::utils::error::Result;
use std::cmp::Ordering;

/// 檔案存取介面，持久化服務只透過它讀寫
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    /// Writes the whole file, creating parent directories as needed.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// Size in bytes, or `None` when nothing exists at `path`.
    fn file_len(&self, path: &str) -> Result<Option<u64>>;
}

/// Caller-supplied ordering of students, used by sorting and sorted export.
pub trait StudentComparator {
    fn compare(&self, a: &Student, b: &Student) -> Ordering;
}

impl<F> StudentComparator for F
where
    F: Fn(&Student, &Student) -> Ordering,
{
    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        self(a, b)
    }
}
