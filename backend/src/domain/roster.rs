//! Class roster model.
//!
//! A roster is keyed by `(department, class_code)` and holds the ordered list
//! of enrolled students. Writes replace the whole list.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::identity::Department;

/// Validation errors raised by roster constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterValidationError {
    #[error("class code must not be empty")]
    EmptyClassCode,
    #[error("student roll must not be empty")]
    EmptyRoll,
    #[error("student name must not be empty")]
    EmptyName,
}

/// Class identifier, unique within a department.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassCode(String);

impl ClassCode {
    pub fn new(value: impl AsRef<str>) -> Result<Self, RosterValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RosterValidationError::EmptyClassCode);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ClassCode> for String {
    fn from(value: ClassCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for ClassCode {
    type Error = RosterValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Enrolled student. Rolls are opaque strings; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    roll: String,
    name: String,
}

impl Student {
    pub fn new(roll: &str, name: &str) -> Result<Self, RosterValidationError> {
        let roll = roll.trim();
        if roll.is_empty() {
            return Err(RosterValidationError::EmptyRoll);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterValidationError::EmptyName);
        }
        Ok(Self {
            roll: roll.to_owned(),
            name: name.to_owned(),
        })
    }

    pub fn roll(&self) -> &str {
        self.roll.as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Roster for one class of one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRoster {
    pub department: Department,
    pub class_code: ClassCode,
    pub display_name: String,
    pub students: Vec<Student>,
}

impl ClassRoster {
    /// Build a roster, defaulting a blank display name to the class code.
    pub fn new(
        department: Department,
        class_code: ClassCode,
        display_name: Option<&str>,
        students: Vec<Student>,
    ) -> Self {
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| class_code.as_str().to_owned(), str::to_owned);
        Self {
            department,
            class_code,
            display_name,
            students,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn cse() -> Department {
        Department::new("CSE").expect("department")
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn display_name_defaults_to_class_code(#[case] display_name: Option<&str>) {
        let class_code = ClassCode::new("CSE-I").expect("class code");
        let roster = ClassRoster::new(cse(), class_code, display_name, Vec::new());
        assert_eq!(roster.display_name, "CSE-I");
    }

    #[rstest]
    fn explicit_display_name_is_kept() {
        let class_code = ClassCode::new("CSE-I").expect("class code");
        let roster = ClassRoster::new(cse(), class_code, Some(" First Year "), Vec::new());
        assert_eq!(roster.display_name, "First Year");
    }

    #[rstest]
    #[case("", "Ann", RosterValidationError::EmptyRoll)]
    #[case("1", " ", RosterValidationError::EmptyName)]
    fn student_requires_roll_and_name(
        #[case] roll: &str,
        #[case] name: &str,
        #[case] expected: RosterValidationError,
    ) {
        assert_eq!(Student::new(roll, name), Err(expected));
    }
}
