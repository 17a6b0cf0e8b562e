//! Catalog product record.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// One product as supplied by the catalog provider.
///
/// Numeric fields are optional on the wire. Missing values (and values that are
/// not finite or are negative) are read as `0` through the accessors; the raw
/// fields are kept so callers can tell "absent" from "zero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    #[serde(default)]
    pub stock: Option<f64>,
    #[serde(default)]
    pub average_weekly_sales: Option<f64>,
    #[serde(default)]
    pub lead_time: Option<f64>,
}

impl ValueObject for ProductRecord {}

impl ProductRecord {
    /// Build a fully-populated record.
    pub fn new(name: impl Into<String>, stock: f64, average_weekly_sales: f64, lead_time: f64) -> Self {
        Self {
            name: name.into(),
            stock: Some(stock),
            average_weekly_sales: Some(average_weekly_sales),
            lead_time: Some(lead_time),
        }
    }

    /// Build a record whose numeric fields may be missing.
    pub fn partial(
        name: impl Into<String>,
        stock: Option<f64>,
        average_weekly_sales: Option<f64>,
        lead_time: Option<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            stock,
            average_weekly_sales,
            lead_time,
        }
    }

    /// Units on hand (missing → 0).
    pub fn stock(&self) -> f64 {
        coerce_quantity(self.stock)
    }

    /// Average units sold per week (missing → 0).
    pub fn average_weekly_sales(&self) -> f64 {
        coerce_quantity(self.average_weekly_sales)
    }

    /// Supplier lead time in days (missing → 0).
    pub fn lead_time(&self) -> f64 {
        coerce_quantity(self.lead_time)
    }

    /// Reject records that cannot be displayed or paired with a result.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        Ok(())
    }
}

/// Coerce an optional catalog quantity into a finite, non-negative number.
///
/// Absent, NaN, infinite and negative values all read as `0`. This is a
/// recovered condition, not a failure.
pub fn coerce_quantity(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            tracing::trace!(value = v, "coercing out-of-range quantity to 0");
            0.0
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_fields_read_as_zero() {
        let record: ProductRecord = serde_json::from_str(r#"{"name":"Widget","stock":10}"#).unwrap();
        assert_eq!(record.stock(), 10.0);
        assert_eq!(record.average_weekly_sales(), 0.0);
        assert_eq!(record.lead_time(), 0.0);
        assert!(record.lead_time.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"name":"Gadget","stock":21,"average_weekly_sales":7,"lead_time":5,"sku":"G-1","price":3.5}"#,
        )
        .unwrap();
        assert_eq!(record, ProductRecord::new("Gadget", 21.0, 7.0, 5.0));
    }

    #[test]
    fn null_fields_read_as_zero() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"name":"Gizmo","stock":null,"average_weekly_sales":null}"#).unwrap();
        assert_eq!(record.stock(), 0.0);
        assert_eq!(record.average_weekly_sales(), 0.0);
    }

    #[test]
    fn negative_and_non_finite_values_are_coerced() {
        let record = ProductRecord::partial("Odd", Some(-4.0), Some(f64::NAN), Some(f64::INFINITY));
        assert_eq!(record.stock(), 0.0);
        assert_eq!(record.average_weekly_sales(), 0.0);
        assert_eq!(record.lead_time(), 0.0);
    }

    #[test]
    fn blank_name_fails_validation() {
        let record = ProductRecord::new("   ", 1.0, 1.0, 1.0);
        assert_eq!(
            record.validate(),
            Err(DomainError::validation("product name cannot be empty"))
        );
        assert!(ProductRecord::new("Widget", 1.0, 1.0, 1.0).validate().is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: coercion always yields a finite, non-negative quantity.
        #[test]
        fn coerced_quantities_are_finite_and_non_negative(v in proptest::option::of(any::<f64>())) {
            let q = coerce_quantity(v);
            prop_assert!(q.is_finite());
            prop_assert!(q >= 0.0);
        }
    }
}
