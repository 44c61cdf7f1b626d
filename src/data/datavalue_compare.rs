use crate::data::datatable::DataValue;
use std::cmp::Ordering;

/// Three-way comparison of two cell values.
///
/// Numbers compare numerically and strings lexicographically. Null sorts first;
/// a number sorts before a string when the types are mixed so the order stays total.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a, b) {
        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (DataValue::String(a), DataValue::String(b)) => a.cmp(b),

        (DataValue::Null, DataValue::Null) => Ordering::Equal,
        (DataValue::Null, _) => Ordering::Less,
        (_, DataValue::Null) => Ordering::Greater,

        (DataValue::Integer(_), DataValue::String(_)) => Ordering::Less,
        (DataValue::String(_), DataValue::Integer(_)) => Ordering::Greater,
    }
}
