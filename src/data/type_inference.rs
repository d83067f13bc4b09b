//! Column type inference for loaded text.
//!
//! Single values are typed with [`ColumnType::find_type`]; a running guess per
//! column is kept while rows stream in, and any disagreement between guesses
//! collapses the column to `string`.

use crate::data::types::ColumnType;
use tracing::debug;

/// Type inference utilities
pub struct TypeInference;

impl TypeInference {
    /// Infer the type of a single string value. Empty text has no type.
    pub fn infer_from_string(value: &str) -> Option<ColumnType> {
        ColumnType::find_type(value)
    }

    /// Merge two guesses for the same column
    ///
    /// Rules:
    /// - Same type -> keep it
    /// - No guess with anything -> the other guess
    /// - Anything else -> the preferred type (always `string`)
    pub fn merge_types(current: Option<ColumnType>, next: Option<ColumnType>) -> Option<ColumnType> {
        match (current, next) {
            (None, t) | (t, None) => t,
            (Some(a), Some(b)) if a == b => Some(a),
            (Some(a), Some(b)) => Some(ColumnType::preferred_type(&a, &b)),
        }
    }

    /// Infer the type of a column from sample values.
    pub fn infer_from_samples<'a, I>(values: I) -> Option<ColumnType>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut result = None;

        for value in values {
            result = Self::merge_types(result, Self::infer_from_string(value));

            // Nothing merges back out of string
            if result == Some(ColumnType::string()) {
                break;
            }
        }

        result
    }
}

/// Running per-column type guess over a stream of rows.
///
/// Predefined types are fixed up front and never inferred. Columns first seen
/// in a later, wider row simply start without a guess.
#[derive(Debug, Clone, Default)]
pub struct ColumnTypeGuesser {
    predefined: Vec<Option<ColumnType>>,
    guesses: Vec<Option<ColumnType>>,
}

impl ColumnTypeGuesser {
    pub fn new(predefined: Vec<Option<ColumnType>>) -> Self {
        Self {
            predefined,
            guesses: Vec::new(),
        }
    }

    pub fn is_predefined(&self, position: usize) -> bool {
        matches!(self.predefined.get(position), Some(Some(_)))
    }

    /// Feeds one field into the guess for `position`.
    pub fn observe(&mut self, position: usize, value: &str) {
        if self.is_predefined(position) {
            return;
        }
        if self.guesses.len() <= position {
            self.guesses.resize(position + 1, None);
        }

        let current = self.guesses[position].take();
        let next = TypeInference::infer_from_string(value);
        if let (Some(a), Some(b)) = (&current, &next) {
            if a != b {
                debug!(
                    "Type conflict in column {}: {} vs {} ('{}')",
                    position, a, b, value
                );
            }
        }
        self.guesses[position] = TypeInference::merge_types(current, next);
    }

    pub fn observe_row<S: AsRef<str>>(&mut self, fields: &[S]) {
        for (position, field) in fields.iter().enumerate() {
            self.observe(position, field.as_ref());
        }
    }

    /// Current guess (or predefined type) for a column.
    pub fn guess(&self, position: usize) -> Option<&ColumnType> {
        match self.predefined.get(position) {
            Some(Some(predefined)) => Some(predefined),
            _ => self.guesses.get(position).and_then(Option::as_ref),
        }
    }

    /// Number of columns seen so far, predefined ones included.
    pub fn width(&self) -> usize {
        self.predefined.len().max(self.guesses.len())
    }

    /// Final types for `width` columns. Columns without any typed value fall
    /// back to `string`.
    pub fn finish(&self, width: usize) -> Vec<ColumnType> {
        (0..width)
            .map(|position| {
                self.guess(position).cloned().unwrap_or_else(|| {
                    debug!("No type resolved for column {}, using string", position);
                    ColumnType::string()
                })
            })
            .collect()
    }
}
