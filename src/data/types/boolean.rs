use super::ValueType;
use crate::data::value::CellValue;
use std::cmp::Ordering;
use std::fmt;

const TRUE: &str = "true";
const FALSE: &str = "false";
const YES: &str = "yes";
const NO: &str = "no";

/// Literal family a boolean column reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BooleanCategory {
    #[default]
    TrueFalse,
    YesNo,
}

impl BooleanCategory {
    pub fn name(self) -> &'static str {
        match self {
            BooleanCategory::TrueFalse => "TRUE_FALSE",
            BooleanCategory::YesNo => "YES_NO",
        }
    }

    /// Case-insensitive lookup of `true_false` / `yes_no`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("true_false") {
            Some(BooleanCategory::TrueFalse)
        } else if name.eq_ignore_ascii_case("yes_no") {
            Some(BooleanCategory::YesNo)
        } else {
            None
        }
    }

    fn literals(self) -> (&'static str, &'static str) {
        match self {
            BooleanCategory::TrueFalse => (TRUE, FALSE),
            BooleanCategory::YesNo => (YES, NO),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanType {
    category: BooleanCategory,
}

impl BooleanType {
    pub fn new(category: BooleanCategory) -> Self {
        Self { category }
    }

    pub fn category(&self) -> BooleanCategory {
        self.category
    }

    /// Detects a boolean literal. Only exact (case-insensitive) literals count,
    /// so `"falseeee"` is not a boolean.
    pub fn check_and_get_type(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case(TRUE) || value.eq_ignore_ascii_case(FALSE) {
            Some(Self::new(BooleanCategory::TrueFalse))
        } else if value.eq_ignore_ascii_case(YES) || value.eq_ignore_ascii_case(NO) {
            Some(Self::new(BooleanCategory::YesNo))
        } else {
            None
        }
    }

    /// Builds a type from an optional category argument; `None` or an empty
    /// argument selects `TRUE_FALSE`.
    pub fn get_type(category: Option<&str>) -> Option<Self> {
        match category {
            None => Some(Self::default()),
            Some(name) if name.is_empty() => Some(Self::default()),
            Some(name) => BooleanCategory::from_name(name).map(Self::new),
        }
    }
}

impl ValueType for BooleanType {
    type Value = bool;

    /// Permissive: any non-empty text other than the true literal is `false`.
    fn parse(&self, text: &str) -> Option<bool> {
        if text.is_empty() {
            return None;
        }
        let (truthy, _) = self.category.literals();
        Some(text.eq_ignore_ascii_case(truthy))
    }

    fn format(&self, value: &bool) -> String {
        let (truthy, falsy) = self.category.literals();
        let literal = if *value { truthy } else { falsy };
        literal.to_string()
    }

    fn compare_values(&self, a: &bool, b: &bool) -> Ordering {
        a.cmp(b)
    }

    fn to_cell(value: &bool) -> CellValue {
        CellValue::Boolean(*value)
    }

    fn from_cell(value: &CellValue) -> Option<bool> {
        value.as_bool()
    }
}

impl fmt::Display for BooleanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", super::BOOLEAN_TYPE, self.category.name())
    }
}
