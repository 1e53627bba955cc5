//! Criteria filtering over items
//!
//! A criterion is a `(field, value, operator)` triple. Columns and operators come
//! from fixed tables below; the value is always bound as a parameter.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::Value;

use crate::database::ItemStatus;
use crate::error::{InventoryError, Result};

/// Item attribute a criterion applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
    Status,
    Category,
    Price,
    Stock,
    Quantity,
    Sold,
}

impl FilterField {
    /// Numeric fields accept every comparison, text fields only equality
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FilterField::Price | FilterField::Stock | FilterField::Quantity | FilterField::Sold
        )
    }

    fn column(&self) -> &'static str {
        match self {
            FilterField::Name => "item_name",
            FilterField::Status => "item_status",
            FilterField::Category => "category_id",
            FilterField::Price => "item_price",
            FilterField::Stock => "item_stock",
            FilterField::Quantity => "item_quantity_available",
            FilterField::Sold => "item_sold",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Status => "status",
            FilterField::Category => "category",
            FilterField::Price => "price",
            FilterField::Stock => "stock",
            FilterField::Quantity => "quantity",
            FilterField::Sold => "sold",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(FilterField::Name),
            "status" => Ok(FilterField::Status),
            "category" => Ok(FilterField::Category),
            "price" => Ok(FilterField::Price),
            "stock" => Ok(FilterField::Stock),
            "quantity" => Ok(FilterField::Quantity),
            "sold" => Ok(FilterField::Sold),
            other => Err(InventoryError::InvalidInput(format!("unknown filter field '{}'", other))),
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    #[default]
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// SQL spelling of the operator
    pub fn sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    /// True for `=` and `<>`
    pub fn is_equality(&self) -> bool {
        matches!(self, Comparison::Eq | Comparison::Ne)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

impl FromStr for Comparison {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "=" | "==" => Ok(Comparison::Eq),
            "!=" | "<>" => Ok(Comparison::Ne),
            "<" => Ok(Comparison::Lt),
            "<=" => Ok(Comparison::Le),
            ">" => Ok(Comparison::Gt),
            ">=" => Ok(Comparison::Ge),
            other => Err(InventoryError::InvalidInput(format!("unknown operator '{}'", other))),
        }
    }
}

/// Validated value of a criterion
#[derive(Debug, Clone, PartialEq, Eq)]
enum CriteriaValue {
    Text(String),
    Status(ItemStatus),
    Number(u32),
}

/// A validated filter criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    field: FilterField,
    comparison: Comparison,
    value: CriteriaValue,
}

impl Criteria {
    /// Build a criterion; `operator` defaults to `=`
    pub fn new(field: FilterField, value: &str, operator: Option<&str>) -> Result<Self> {
        let comparison = match operator {
            Some(op) => op.parse()?,
            None => Comparison::default(),
        };

        if !field.is_numeric() && !comparison.is_equality() {
            return Err(InventoryError::InvalidInput(format!(
                "operator '{}' is not allowed for field '{}'",
                comparison, field
            )));
        }

        let value = value.trim();
        let value = match field {
            FilterField::Name | FilterField::Category => {
                if value.is_empty() {
                    return Err(InventoryError::InvalidInput(format!(
                        "{} must not be empty",
                        field
                    )));
                }
                CriteriaValue::Text(value.to_string())
            }
            FilterField::Status => CriteriaValue::Status(value.parse()?),
            _ => CriteriaValue::Number(value.parse().map_err(|_| {
                InventoryError::InvalidInput(format!("'{}' is not a valid {}", value, field))
            })?),
        };

        Ok(Self { field, comparison, value })
    }

    /// Parse field and operator from user text
    pub fn parse(field: &str, value: &str, operator: Option<&str>) -> Result<Self> {
        Self::new(field.parse()?, value, operator)
    }

    /// Shorthand for a status equality criterion
    pub fn status(status: ItemStatus) -> Self {
        Self {
            field: FilterField::Status,
            comparison: Comparison::Eq,
            value: CriteriaValue::Status(status),
        }
    }

    pub fn field(&self) -> FilterField {
        self.field
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// WHERE fragment and its bound values
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let op = self.comparison.sql();
        let column = self.field.column();

        match &self.value {
            CriteriaValue::Text(text) if self.field == FilterField::Category => {
                let subquery =
                    "SELECT category_id FROM categories WHERE category_name = ? COLLATE NOCASE";
                let clause = if self.comparison == Comparison::Eq {
                    format!("{} IN ({})", column, subquery)
                } else {
                    format!("({} IS NULL OR {} NOT IN ({}))", column, column, subquery)
                };
                (clause, vec![Value::Text(text.clone())])
            }
            CriteriaValue::Text(text) => (
                format!("{} {} ? COLLATE NOCASE", column, op),
                vec![Value::Text(text.clone())],
            ),
            CriteriaValue::Status(status) => (
                format!("{} {} ?", column, op),
                vec![Value::Text(status.as_str().to_string())],
            ),
            CriteriaValue::Number(number) => (
                format!("{} {} ?", column, op),
                vec![Value::Integer(i64::from(*number))],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_spellings() {
        assert_eq!("=".parse::<Comparison>().unwrap(), Comparison::Eq);
        assert_eq!("==".parse::<Comparison>().unwrap(), Comparison::Eq);
        assert_eq!("!=".parse::<Comparison>().unwrap(), Comparison::Ne);
        assert_eq!("<>".parse::<Comparison>().unwrap(), Comparison::Ne);
        assert_eq!(" <= ".parse::<Comparison>().unwrap(), Comparison::Le);
        assert_eq!(">".parse::<Comparison>().unwrap(), Comparison::Gt);
        assert!("; DROP TABLE items".parse::<Comparison>().is_err());
        assert!("LIKE".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_default_operator_is_equality() {
        let c = Criteria::new(FilterField::Price, "10", None).unwrap();
        assert_eq!(c.comparison(), Comparison::Eq);
    }

    #[test]
    fn test_text_fields_reject_ordering() {
        assert!(Criteria::new(FilterField::Name, "Bolt", Some("<")).is_err());
        assert!(Criteria::new(FilterField::Category, "Tools", Some(">=")).is_err());
        assert!(Criteria::new(FilterField::Status, "InStock", Some("!=")).is_ok());
    }

    #[test]
    fn test_value_validation() {
        assert!(Criteria::new(FilterField::Status, "Backordered", None).is_err());
        assert!(Criteria::new(FilterField::Price, "cheap", None).is_err());
        assert!(Criteria::new(FilterField::Stock, "-1", None).is_err());
        assert!(Criteria::new(FilterField::Name, "  ", None).is_err());
    }

    #[test]
    fn test_parse_field_names() {
        let c = Criteria::parse("STOCK", "3", Some(">")).unwrap();
        assert_eq!(c.field(), FilterField::Stock);
        assert!(Criteria::parse("item_price; --", "3", None).is_err());
    }

    #[test]
    fn test_value_is_bound_not_inlined() {
        let c = Criteria::new(FilterField::Name, "x' OR '1'='1", None).unwrap();
        let (sql, values) = c.to_sql();
        assert_eq!(sql, "item_name = ? COLLATE NOCASE");
        assert_eq!(values, vec![Value::Text("x' OR '1'='1".to_string())]);
    }

    #[test]
    fn test_numeric_sql() {
        let c = Criteria::new(FilterField::Quantity, "7", Some(">=")).unwrap();
        let (sql, values) = c.to_sql();
        assert_eq!(sql, "item_quantity_available >= ?");
        assert_eq!(values, vec![Value::Integer(7)]);
    }
}
