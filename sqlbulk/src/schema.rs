//! Table name and column resolution for a batch of records

use crate::error::Result;
use crate::naming::to_snake_case;
use crate::traits::Record;

/// Resolve the table name of a record type.
///
/// `#[bulk(table = "...")]` is used verbatim; otherwise the type name is
/// converted to snake_case.
pub fn table_name<T: Record>() -> Result<String> {
    match T::TABLE_NAME {
        Some(name) => Ok(name.to_string()),
        None => to_snake_case(T::TYPE_NAME),
    }
}

/// Positional link between struct fields and statement columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// One slot per struct field; `None` for skipped or undetermined fields
    slots: Vec<Option<String>>,
    /// Resolved column names in field order
    columns: Vec<String>,
}

impl ColumnMapping {
    /// Resolve columns from the records of a batch.
    ///
    /// A field gets a column once any record holds a non-zero value for it.
    /// Fields that are zero in every record get no column and are left out
    /// of the statement entirely.
    pub fn resolve<T: Record>(records: &[T]) -> Result<Self> {
        let fields = T::fields();
        let mut slots: Vec<Option<String>> = vec![None; fields.len()];

        for (index, field) in fields.iter().enumerate() {
            if field.skip || !records.iter().any(|r| !r.is_zero_at(index)) {
                continue;
            }

            let column = match field.column {
                Some(column) => column.to_string(),
                None => to_snake_case(field.ident)?,
            };
            slots[index] = Some(column);
        }

        let columns = slots.iter().flatten().cloned().collect();
        Ok(Self { slots, columns })
    }

    /// One entry per struct field.
    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// The resolved column names in field order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Field positions that carry a column, in column order.
    pub fn field_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|_| index))
    }

    /// Whether no field resolved to a column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of resolved columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[derive(Record)]
    #[bulk(table = "tb_user")]
    struct User {
        id: i64,
        #[bulk(column = "name")]
        user_name: String,
        age: i32,
        #[bulk(skip)]
        #[allow(dead_code)]
        hobby: String,
    }

    #[allow(dead_code)]
    #[derive(Record)]
    struct OrderItem {
        sku: String,
    }

    #[allow(dead_code)]
    #[derive(Record)]
    struct HTMLFile {
        path: String,
    }

    /// Not a column type; only usable on skipped fields.
    struct Opaque;

    #[allow(dead_code)]
    #[derive(Record)]
    struct RawNames {
        r#type: String,
        #[bulk(skip)]
        other: Opaque,
        count: u32,
    }

    fn users() -> Vec<User> {
        vec![
            User {
                id: 0,
                user_name: "sunary".into(),
                age: 22,
                hobby: "chess".into(),
            },
            User {
                id: 0,
                user_name: "aku".into(),
                age: 68,
                hobby: "manga".into(),
            },
        ]
    }

    #[test]
    fn test_table_name() {
        assert_eq!(table_name::<User>().unwrap(), "tb_user");
        assert_eq!(table_name::<OrderItem>().unwrap(), "order_item");
        assert_eq!(table_name::<HTMLFile>().unwrap(), "html_file");
    }

    #[test]
    fn test_resolve_columns() {
        let mapping = ColumnMapping::resolve(&users()).unwrap();
        assert_eq!(
            mapping.slots(),
            &[None, Some("name".to_string()), Some("age".to_string()), None]
        );
        assert_eq!(mapping.columns(), &["name", "age"]);
        assert_eq!(mapping.field_indexes().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_later_record_resolves_column() {
        let mut records = users();
        records[1].id = 7;

        let mapping = ColumnMapping::resolve(&records).unwrap();
        assert_eq!(mapping.columns(), &["id", "name", "age"]);
        assert_eq!(mapping.slots().len(), User::fields().len());
    }

    #[test]
    fn test_all_zero_batch_has_no_columns() {
        let records = vec![User {
            id: 0,
            user_name: String::new(),
            age: 0,
            hobby: "ignored".into(),
        }];

        let mapping = ColumnMapping::resolve(&records).unwrap();
        assert!(mapping.is_empty());
        assert_eq!(mapping.slots(), &[None, None, None, None]);
    }

    #[test]
    fn test_raw_identifier_and_opaque_skipped_field() {
        let records = vec![RawNames {
            r#type: "admin".into(),
            other: Opaque,
            count: 3,
        }];

        assert_eq!(table_name::<RawNames>().unwrap(), "raw_names");
        assert_eq!(RawNames::fields()[0].ident, "type");
        assert!(RawNames::fields()[1].skip);

        let mapping = ColumnMapping::resolve(&records).unwrap();
        assert_eq!(
            mapping.slots(),
            &[Some("type".to_string()), None, Some("count".to_string())]
        );
        assert_eq!(mapping.columns(), &["type", "count"]);
    }
}
