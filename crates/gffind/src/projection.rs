//! Column selection for queries.

use serde::Serialize;

use crate::intent::ReturnField;
use crate::types::FixedField;

/// Columns a query returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Projection {
    /// Every column of the table.
    All,
    /// Named columns: fixed columns in canonical order, then attributes in
    /// request order.
    Columns(Vec<String>),
}

impl Projection {
    /// Named columns, or `None` for [`Projection::All`].
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            Projection::All => None,
            Projection::Columns(cols) => Some(cols),
        }
    }
}

/// Expand requested return fields into a projection.
///
/// `Region` selects `beginning` and `end`. An empty request, or `all`,
/// selects everything. Duplicates collapse.
pub fn build_projection(requested: &[ReturnField], all: bool) -> Projection {
    if all || requested.is_empty() {
        return Projection::All;
    }

    let mut fixed: Vec<FixedField> = Vec::new();
    let mut attributes: Vec<String> = Vec::new();
    for field in requested {
        match field {
            ReturnField::Fixed(f) => fixed.push(*f),
            ReturnField::Region => fixed.extend([FixedField::Beginning, FixedField::End]),
            ReturnField::Attribute(key) => {
                if !attributes.contains(key) {
                    attributes.push(key.clone());
                }
            }
        }
    }
    fixed.sort();
    fixed.dedup();

    let columns = fixed
        .into_iter()
        .map(|f| f.column().to_string())
        .chain(attributes)
        .collect();
    Projection::Columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(p: &Projection) -> Vec<&str> {
        p.columns()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_empty_and_all() {
        assert_eq!(build_projection(&[], false), Projection::All);
        assert_eq!(
            build_projection(&[ReturnField::Fixed(FixedField::Seqid)], true),
            Projection::All
        );
    }

    #[test]
    fn test_region_expands() {
        let p = build_projection(
            &[ReturnField::Region, ReturnField::Fixed(FixedField::Seqid)],
            false,
        );
        assert_eq!(cols(&p), vec!["seqid", "beginning", "end"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let p = build_projection(
            &[
                ReturnField::Fixed(FixedField::End),
                ReturnField::Region,
                ReturnField::Attribute("Name".into()),
                ReturnField::Attribute("ID".into()),
                ReturnField::Attribute("Name".into()),
            ],
            false,
        );
        assert_eq!(cols(&p), vec!["beginning", "end", "Name", "ID"]);
    }
}
