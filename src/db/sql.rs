//! SET-clause builder for sparse updates.
//!
//! Column names are taken from `column_names` when mapped, otherwise the field
//! name is used verbatim. Callers must only pass field names drawn from a fixed
//! allowlist (see [`crate::models::user::UserChanges::into_fields`]); names coming
//! straight from a request body would end up in the SQL text unescaped.

use sea_orm::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartialUpdateError {
    #[error("No data.")]
    NoData,
}

/// Compiled `"column"=$n` fragments and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub fragments: Vec<String>,
    pub values: Vec<Value>,
}

impl PartialUpdate {
    /// Fragments joined into the body of a `SET` clause.
    #[must_use]
    pub fn set_clause(&self) -> String {
        self.fragments.join(", ")
    }

    /// Placeholder for the first parameter bound after the generated ones,
    /// typically the `WHERE` key.
    #[must_use]
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Build the SET clause for an `UPDATE` touching exactly the given fields.
///
/// Placeholders are numbered from `$1` in the iteration order of `data`.
///
/// # Errors
///
/// Returns [`PartialUpdateError::NoData`] when `data` is empty.
pub fn sql_for_partial_update<K, V>(
    data: impl IntoIterator<Item = (K, V)>,
    column_names: &[(&str, &str)],
) -> Result<PartialUpdate, PartialUpdateError>
where
    K: AsRef<str>,
    V: Into<Value>,
{
    let mut fragments = Vec::new();
    let mut values = Vec::new();

    for (idx, (field, value)) in data.into_iter().enumerate() {
        let field = field.as_ref();
        let column = column_names
            .iter()
            .find(|(name, _)| *name == field)
            .map_or(field, |(_, column)| *column);

        fragments.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value.into());
    }

    if fragments.is_empty() {
        return Err(PartialUpdateError::NoData);
    }

    Ok(PartialUpdate { fragments, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field() {
        let result = sql_for_partial_update([("f1", "v1")], &[("f1", "f1"), ("fF2", "f2")]).unwrap();

        assert_eq!(result.set_clause(), "\"f1\"=$1");
        assert_eq!(result.values, vec![Value::from("v1")]);
    }

    #[test]
    fn test_unmapped_field_uses_own_name() {
        let result = sql_for_partial_update([("f1", "v1")], &[]).unwrap();

        assert_eq!(result.fragments, vec!["\"f1\"=$1".to_string()]);
        assert_eq!(result.values, vec![Value::from("v1")]);
    }

    #[test]
    fn test_two_fields_keep_input_order() {
        let result =
            sql_for_partial_update([("f1", "v1"), ("jsF2", "v2")], &[("jsF2", "f2")]).unwrap();

        assert_eq!(result.set_clause(), "\"f1\"=$1, \"f2\"=$2");
        assert_eq!(result.values, vec![Value::from("v1"), Value::from("v2")]);
        assert_eq!(result.next_placeholder(), "$3");
    }

    #[test]
    fn test_mixed_value_types() {
        let data: Vec<(&str, Value)> = vec![
            ("firstName", Value::from("Ada")),
            ("isAdmin", Value::from(true)),
        ];
        let result =
            sql_for_partial_update(data, &[("firstName", "first_name"), ("isAdmin", "is_admin")])
                .unwrap();

        assert_eq!(result.set_clause(), "\"first_name\"=$1, \"is_admin\"=$2");
        assert_eq!(result.into_values(), vec![Value::from("Ada"), Value::from(true)]);
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let data: Vec<(&str, Value)> = Vec::new();
        let err = sql_for_partial_update(data, &[("f1", "f1")]).unwrap_err();

        assert_eq!(err, PartialUpdateError::NoData);
    }
}
