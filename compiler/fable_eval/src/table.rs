//! The table value: a hybrid sequence, mapping, and default slot.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::value::{Num, Value};

/// A hashable key for the mapping part of a table.
///
/// Reference values (tables, functions, generators) are not valid keys.
/// Floats with an integral value normalize to `Int`, so `t[2.0]` and `t[2]`
/// address the same entry; other floats key on their bit pattern with `-0.0`
/// folded into `0.0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TableKey {
    Nothing,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(Rc<str>),
}

impl TableKey {
    /// Convert a runtime value into a key, or `None` for reference values
    /// and `always`.
    pub fn from_value(value: &Value) -> Option<TableKey> {
        match value {
            Value::Nothing => Some(TableKey::Nothing),
            Value::Bool(b) => Some(TableKey::Bool(*b)),
            Value::Number(Num::Int(n)) => Some(TableKey::Int(*n)),
            Value::Number(Num::Float(f)) => Some(TableKey::from_float(*f)),
            Value::Text(s) => Some(TableKey::Text(Rc::clone(s))),
            Value::Function(_) | Value::Generator(_) | Value::Table(_) | Value::Always => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_float(f: f64) -> TableKey {
        if f.is_finite() && f.fract() == 0.0 && (-9_007_199_254_740_992.0..=9_007_199_254_740_992.0).contains(&f) {
            TableKey::Int(f as i64)
        } else if f == 0.0 {
            TableKey::Float(0.0_f64.to_bits())
        } else {
            TableKey::Float(f.to_bits())
        }
    }

    /// The value this key denotes, for iteration pairs.
    pub fn to_value(&self) -> Value {
        match self {
            TableKey::Nothing => Value::Nothing,
            TableKey::Bool(b) => Value::Bool(*b),
            TableKey::Int(n) => Value::Number(Num::Int(*n)),
            TableKey::Float(bits) => Value::Number(Num::Float(f64::from_bits(*bits))),
            TableKey::Text(s) => Value::Text(Rc::clone(s)),
        }
    }
}

/// Sequence plus mapping plus an optional `always` default.
///
/// An integer key inside the sequence range addresses the sequence; any
/// other key lives in the mapping. Reads fall through to the default when
/// the mapping misses. Mapping insertion order is tracked so iteration and
/// rendering are deterministic.
#[derive(Clone, Debug, Default)]
pub struct Table {
    seq: Vec<Value>,
    map: FxHashMap<TableKey, Value>,
    order: Vec<TableKey>,
    default: Option<Value>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn seq(&self) -> &[Value] {
        &self.seq
    }

    pub fn seq_len(&self) -> usize {
        self.seq.len()
    }

    /// Total entry count: sequence plus mapping (the default not included).
    pub fn len(&self) -> usize {
        self.seq.len() + self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty() && self.map.is_empty() && self.default.is_none()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn set_default(&mut self, value: Value) {
        self.default = Some(value);
    }

    /// Mapping keys in insertion order.
    pub fn keys(&self) -> &[TableKey] {
        &self.order
    }

    /// Indexed read: sequence, then mapping, then the default.
    pub fn get(&self, key: &TableKey) -> Option<Value> {
        if let TableKey::Int(n) = key {
            if let Ok(i) = usize::try_from(*n) {
                if i < self.seq.len() {
                    return Some(self.seq[i].clone());
                }
            }
        }
        self.map
            .get(key)
            .cloned()
            .or_else(|| self.default.clone())
    }

    /// Indexed write: an integer key inside the sequence range overwrites
    /// the sequence slot, everything else goes to the mapping.
    pub fn set(&mut self, key: TableKey, value: Value) {
        if let TableKey::Int(n) = key {
            if let Ok(i) = usize::try_from(n) {
                if i < self.seq.len() {
                    self.seq[i] = value;
                    return;
                }
            }
        }
        self.set_map(key, value);
    }

    /// Write straight to the mapping, bypassing the sequence-range rule.
    /// Keyed items in a table literal land here even with small int keys.
    pub fn set_map(&mut self, key: TableKey, value: Value) {
        if self.map.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    pub fn push(&mut self, value: Value) {
        self.seq.push(value);
    }

    /// `left << right` merge, producing the combined table.
    ///
    /// The right sequence wins positionally and the left tail beyond it is
    /// kept; mapping entries merge right-over-left; the right default wins
    /// when it exists.
    pub fn reload_merged(&self, right: &Table) -> Table {
        let mut new = Table::new();
        new.seq = right.seq.clone();
        if self.seq.len() > right.seq.len() {
            new.seq.extend(self.seq[right.seq.len()..].iter().cloned());
        }
        for key in &self.order {
            if let Some(value) = self.map.get(key) {
                new.set_map(key.clone(), value.clone());
            }
        }
        for key in &right.order {
            if let Some(value) = right.map.get(key) {
                new.set_map(key.clone(), value.clone());
            }
        }
        new.default = right.default.clone().or_else(|| self.default.clone());
        new
    }

    /// Splice `other` into this table: sequence appends, mapping entries
    /// overwrite, and the default is adopted only when `other` defines one.
    pub fn splice_merge(&mut self, other: &Table) {
        self.seq.extend(other.seq.iter().cloned());
        for key in &other.order {
            if let Some(value) = other.map.get(key) {
                self.set_map(key.clone(), value.clone());
            }
        }
        if other.default.is_some() {
            self.default = other.default.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Value {
        Value::Number(Num::Int(n))
    }

    // `Value` has no `PartialEq` (reference variants compare by identity at
    // runtime), so assertions go through the integer payload.
    fn as_int(value: &Value) -> i64 {
        match value {
            Value::Number(Num::Int(n)) => *n,
            other => panic!("not an int: {other:?}"),
        }
    }

    fn get_int(t: &Table, key: &TableKey) -> Option<i64> {
        t.get(key).map(|v| as_int(&v))
    }

    fn seq_ints(t: &Table) -> Vec<i64> {
        t.seq().iter().map(as_int).collect()
    }

    #[test]
    fn integral_float_keys_normalize_to_int() {
        let mut t = Table::new();
        t.set(TableKey::from_value(&Value::Number(Num::Float(2.0))).unwrap(), int(7));
        assert_eq!(get_int(&t, &TableKey::Int(2)), Some(7));
    }

    #[test]
    fn out_of_range_int_writes_go_to_the_mapping() {
        let mut t = Table::new();
        t.push(int(10));
        t.set(TableKey::Int(5), int(50));
        t.set(TableKey::Int(-1), int(-10));
        assert_eq!(t.seq_len(), 1);
        assert_eq!(get_int(&t, &TableKey::Int(5)), Some(50));
        assert_eq!(get_int(&t, &TableKey::Int(-1)), Some(-10));
    }

    #[test]
    fn in_range_int_writes_overwrite_the_sequence() {
        let mut t = Table::new();
        t.push(int(10));
        t.push(int(20));
        t.set(TableKey::Int(0), int(99));
        assert_eq!(seq_ints(&t), [99, 20]);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn reads_fall_through_to_the_default() {
        let mut t = Table::new();
        t.set_default(int(0));
        assert_eq!(get_int(&t, &TableKey::Text("missing".into())), Some(0));
        assert!(!t.is_empty());
    }

    #[test]
    fn reload_merge_keeps_the_longer_left_tail() {
        let mut left = Table::new();
        left.push(int(1));
        left.push(int(2));
        left.push(int(3));
        left.set_map(TableKey::Text("a".into()), int(1));
        left.set_default(int(0));

        let mut right = Table::new();
        right.push(int(9));
        right.set_map(TableKey::Text("a".into()), int(2));

        let merged = left.reload_merged(&right);
        assert_eq!(seq_ints(&merged), [9, 2, 3]);
        assert_eq!(get_int(&merged, &TableKey::Text("a".into())), Some(2));
        // No default on the right: the left one survives.
        assert_eq!(get_int(&merged, &TableKey::Text("zzz".into())), Some(0));
    }

    #[test]
    fn splice_merge_appends_and_overwrites() {
        let mut t = Table::new();
        t.push(int(1));
        t.set_map(TableKey::Text("k".into()), int(1));

        let mut other = Table::new();
        other.push(int(2));
        other.set_map(TableKey::Text("k".into()), int(2));

        t.splice_merge(&other);
        assert_eq!(seq_ints(&t), [1, 2]);
        assert_eq!(get_int(&t, &TableKey::Text("k".into())), Some(2));
        assert!(t.default_value().is_none());
    }
}
