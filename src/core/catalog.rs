//! Unique-key catalogs of students and courses

use crate::core::error::{RecordKind, RegistryError, RegistryResult};
use crate::core::models::course::{MAX_CREDITS, MIN_CREDITS};
use crate::core::models::{Course, CoursePatch, CourseQuery, Student, StudentPatch, StudentQuery};
use std::collections::HashMap;

/// A record that can live in a [`Catalog`]
pub trait CatalogRecord: Clone {
    /// Partial update applied by [`Catalog::update`]
    type Patch;
    /// Criteria accepted by [`Catalog::search`]
    type Query;

    /// Which catalog this record belongs to, for error reporting
    const KIND: RecordKind;

    /// Identity of the record
    fn key(&self) -> &str;
    /// Trim surrounding whitespace from identity and text fields
    fn normalize(&mut self);
    /// Field-level validation messages; empty when valid
    fn validate(&self) -> Vec<String>;
    /// A numeric field outside its range, reported on its own when it is the
    /// only violation
    fn range_violation(&self) -> Option<RegistryError> {
        None
    }
    /// Apply a patch in place without validating
    fn apply(&mut self, patch: Self::Patch);
    /// Whether the record satisfies a query
    fn matches(&self, query: &Self::Query) -> bool;
}

impl CatalogRecord for Student {
    type Patch = StudentPatch;
    type Query = StudentQuery;
    const KIND: RecordKind = RecordKind::Student;

    fn key(&self) -> &str {
        &self.student_id
    }
    fn normalize(&mut self) {
        Self::normalize(self);
    }
    fn validate(&self) -> Vec<String> {
        Self::validate(self)
    }
    fn apply(&mut self, patch: StudentPatch) {
        Self::apply(self, patch);
    }
    fn matches(&self, query: &StudentQuery) -> bool {
        Self::matches(self, query)
    }
}

impl CatalogRecord for Course {
    type Patch = CoursePatch;
    type Query = CourseQuery;
    const KIND: RecordKind = RecordKind::Course;

    fn key(&self) -> &str {
        &self.course_code
    }
    fn normalize(&mut self) {
        Self::normalize(self);
    }
    fn validate(&self) -> Vec<String> {
        Self::validate(self)
    }
    fn range_violation(&self) -> Option<RegistryError> {
        (!(MIN_CREDITS..=MAX_CREDITS).contains(&self.credits)).then(|| RegistryError::OutOfRange {
            field: "credits",
            value: f64::from(self.credits),
        })
    }
    fn apply(&mut self, patch: CoursePatch) {
        Self::apply(self, patch);
    }
    fn matches(&self, query: &CourseQuery) -> bool {
        Self::matches(self, query)
    }
}

/// Records keyed by identity, remembering insertion order
///
/// Lookups go through a hash map; `order` keeps the keys in the order they
/// were added so listings are stable.
#[derive(Debug, Clone)]
pub struct Catalog<T: CatalogRecord> {
    records: HashMap<String, T>,
    order: Vec<String>,
}

/// Catalog of students keyed by `student_id`
pub type StudentCatalog = Catalog<Student>;
/// Catalog of courses keyed by `course_code`
pub type CourseCatalog = Catalog<Course>;

impl<T: CatalogRecord> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CatalogRecord> Catalog<T> {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add a record
    ///
    /// The record is normalized before its identity is checked, so `" S001 "`
    /// and `"S001"` are the same key.
    ///
    /// # Errors
    /// - [`RegistryError::DuplicateKey`] if the identity is already present
    /// - [`RegistryError::OutOfRange`] if a numeric field is the only problem
    /// - [`RegistryError::ValidationFailed`] with every field message otherwise
    pub fn add(&mut self, mut record: T) -> RegistryResult<&T> {
        record.normalize();
        let key = record.key().to_string();
        if self.records.contains_key(&key) {
            return Err(RegistryError::duplicate(T::KIND, key));
        }
        check(&record)?;

        self.order.push(key.clone());
        Ok(&*self.records.entry(key).or_insert(record))
    }

    /// Look up a record by identity
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.records.get(key)
    }

    /// Whether a record with this identity exists
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Apply `patch` to the record at `key`, keeping it only if it still validates
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`] if no record has this identity
    /// - [`RegistryError::OutOfRange`] or [`RegistryError::ValidationFailed`] if
    ///   the patched record is invalid; the stored record is left unchanged
    pub fn update(&mut self, key: &str, patch: T::Patch) -> RegistryResult<&T> {
        let stored = self
            .records
            .get_mut(key)
            .ok_or_else(|| RegistryError::not_found(T::KIND, key))?;

        let mut candidate = stored.clone();
        candidate.apply(patch);
        check(&candidate)?;

        *stored = candidate;
        Ok(&*stored)
    }

    /// Remove a record. Returns whether anything was removed.
    ///
    /// Dependent enrollments are not touched here; the registry cascades first.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.records.remove(key).is_none() {
            return false;
        }
        self.order.retain(|k| k != key);
        true
    }

    /// All records in insertion order
    #[must_use]
    pub fn list(&self) -> Vec<&T> {
        self.order
            .iter()
            .filter_map(|key| self.records.get(key))
            .collect()
    }

    /// Owned copies of all records in insertion order, as handed to storage
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.list().into_iter().cloned().collect()
    }

    /// Records satisfying `query`, in insertion order
    #[must_use]
    pub fn search(&self, query: &T::Query) -> Vec<&T> {
        self.list()
            .into_iter()
            .filter(|record| record.matches(query))
            .collect()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn check<T: CatalogRecord>(record: &T) -> RegistryResult<()> {
    let errors = record.validate();
    match (errors.len(), record.range_violation()) {
        (0, _) => Ok(()),
        (1, Some(err)) => Err(err),
        _ => Err(RegistryError::ValidationFailed(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str, program: &str) -> Student {
        Student::new(
            id.to_string(),
            name.to_string(),
            format!("{}@example.com", id.to_lowercase()),
            program.to_string(),
        )
    }

    #[test]
    fn test_add_then_get_returns_equal_record() {
        let mut catalog = StudentCatalog::new();
        let jane = student("S001", "Jane", "CS");
        catalog.add(jane.clone()).unwrap();
        assert_eq!(catalog.get("S001"), Some(&jane));
        assert!(catalog.get("S999").is_none());
    }

    #[test]
    fn test_duplicate_key_keeps_original() {
        let mut catalog = StudentCatalog::new();
        catalog.add(student("S001", "Jane", "CS")).unwrap();

        let err = catalog.add(student("S001", "Impostor", "SE")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateKey { kind: RecordKind::Student, ref key } if key == "S001"
        ));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("S001").unwrap().name, "Jane");
    }

    #[test]
    fn test_padded_identity_is_trimmed_on_add() {
        let mut catalog = StudentCatalog::new();
        let padded = Student {
            student_id: " S001 ".to_string(),
            name: "Jane ".to_string(),
            ..student("S001", "Jane", "CS")
        };
        catalog.add(padded).unwrap();

        assert_eq!(catalog.get("S001").unwrap().name, "Jane");
        assert!(matches!(
            catalog.add(student("S001", "Jane", "CS")),
            Err(RegistryError::DuplicateKey { .. })
        ));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_invalid_record_not_inserted() {
        let mut catalog = CourseCatalog::new();
        let err = catalog
            .add(Course::new("bad".to_string(), String::new(), 9, "X".to_string()))
            .unwrap_err();
        match err {
            RegistryError::ValidationFailed(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_credits_alone_are_out_of_range() {
        let mut catalog = CourseCatalog::new();
        let err = catalog
            .add(Course::new("CSC1234".to_string(), "Intro".to_string(), 0, "X".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::OutOfRange { field: "credits", value } if value.abs() < f64::EPSILON
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut catalog = StudentCatalog::new();
        for id in ["S003", "S001", "S002"] {
            catalog.add(student(id, "Name", "CS")).unwrap();
        }
        assert!(catalog.remove("S001"));
        catalog.add(student("S001", "Back", "CS")).unwrap();

        let ids: Vec<&str> = catalog.list().iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, ["S003", "S002", "S001"]);
    }

    #[test]
    fn test_remove_reports_outcome() {
        let mut catalog = StudentCatalog::new();
        catalog.add(student("S001", "Jane", "CS")).unwrap();
        assert!(catalog.remove("S001"));
        assert!(!catalog.remove("S001"));
        assert!(catalog.list().is_empty());
    }

    #[test]
    fn test_update_validates_whole_record() {
        let mut catalog = StudentCatalog::new();
        catalog.add(student("S001", "Jane", "CS")).unwrap();

        let bad = StudentPatch {
            name: Some("Janet".to_string()),
            email: Some("nope".to_string()),
            program: None,
        };
        assert!(matches!(
            catalog.update("S001", bad),
            Err(RegistryError::ValidationFailed(_))
        ));
        assert_eq!(catalog.get("S001").unwrap().name, "Jane");

        let good = StudentPatch {
            name: Some("Janet".to_string()),
            ..StudentPatch::default()
        };
        assert_eq!(catalog.update("S001", good).unwrap().name, "Janet");

        assert!(matches!(
            catalog.update("S404", StudentPatch::default()),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_search_students() {
        let mut catalog = StudentCatalog::new();
        catalog.add(student("S001", "Jane Doe", "CS")).unwrap();
        catalog.add(student("S002", "John Doe", "SE")).unwrap();
        catalog.add(student("S003", "Ann Lee", "CS")).unwrap();

        let does = catalog.search(&StudentQuery {
            name: Some("doe".to_string()),
            program: None,
        });
        assert_eq!(does.len(), 2);

        let cs_does = catalog.search(&StudentQuery {
            name: Some("doe".to_string()),
            program: Some("CS".to_string()),
        });
        assert_eq!(cs_does.len(), 1);
        assert_eq!(cs_does[0].student_id, "S001");

        assert_eq!(catalog.search(&StudentQuery::default()).len(), 3);
    }

    #[test]
    fn test_search_courses() {
        let mut catalog = CourseCatalog::new();
        catalog
            .add(Course::new(
                "CSC1234".to_string(),
                "Intro to Programming".to_string(),
                3,
                "Dr. Smith".to_string(),
            ))
            .unwrap();
        catalog
            .add(Course::new(
                "MAT5678".to_string(),
                "Calculus I".to_string(),
                4,
                "Prof. Johnson".to_string(),
            ))
            .unwrap();

        let by_code = catalog.search(&CourseQuery {
            course_code: Some("mat".to_string()),
            ..CourseQuery::default()
        });
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].course_code, "MAT5678");

        let by_instructor = catalog.search(&CourseQuery {
            instructor: Some("Dr. Smith".to_string()),
            ..CourseQuery::default()
        });
        assert_eq!(by_instructor.len(), 1);
    }
}
