//! Value-map rules: transforming or vetoing the value of a mapped leaf
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use super::equality::json_eq;
use serde_json::Value;

/// Result of a value-map rule
#[derive(Debug, Clone, PartialEq)]
pub enum ValueOutcome {
    /// Continue the chain with this value
    Keep(Value),
    /// Do not write this leaf at all
    Abort,
}

impl From<Value> for ValueOutcome {
    fn from(value: Value) -> Self {
        ValueOutcome::Keep(value)
    }
}

/// `None` aborts the write
impl From<Option<Value>> for ValueOutcome {
    fn from(value: Option<Value>) -> Self {
        value.map_or(ValueOutcome::Abort, ValueOutcome::Keep)
    }
}

/// Transforms the value of a leaf that a reference-map rule accepted
pub trait ValueMap: Send + Sync {
    fn apply(&self, value: Value) -> ValueOutcome;
}

impl<F, R> ValueMap for F
where
    F: Fn(Value) -> R + Send + Sync,
    R: Into<ValueOutcome>,
{
    fn apply(&self, value: Value) -> ValueOutcome {
        self(value).into()
    }
}

/// One value-map rule or an ordered list of them
pub enum ValueMaps {
    One(Box<dyn ValueMap>),
    Many(Vec<Box<dyn ValueMap>>),
}

impl ValueMaps {
    /// No value mapping; leaves are written unchanged
    pub fn none() -> Self {
        ValueMaps::Many(Vec::new())
    }

    pub fn one(rule: impl ValueMap + 'static) -> Self {
        ValueMaps::One(Box::new(rule))
    }

    pub fn many(rules: Vec<Box<dyn ValueMap>>) -> Self {
        ValueMaps::Many(rules)
    }

    /// Normalize to the ordered list the engine runs
    pub fn into_vec(self) -> Vec<Box<dyn ValueMap>> {
        match self {
            ValueMaps::One(rule) => vec![rule],
            ValueMaps::Many(rules) => rules,
        }
    }
}

impl Default for ValueMaps {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Box<dyn ValueMap>> for ValueMaps {
    fn from(rule: Box<dyn ValueMap>) -> Self {
        ValueMaps::One(rule)
    }
}

impl From<Vec<Box<dyn ValueMap>>> for ValueMaps {
    fn from(rules: Vec<Box<dyn ValueMap>>) -> Self {
        ValueMaps::Many(rules)
    }
}

impl From<ValueEquals> for ValueMaps {
    fn from(rule: ValueEquals) -> Self {
        ValueMaps::one(rule)
    }
}

impl From<SkipIfEquals> for ValueMaps {
    fn from(rule: SkipIfEquals) -> Self {
        ValueMaps::one(rule)
    }
}

impl std::fmt::Debug for ValueMaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueMaps::One(_) => f.write_str("ValueMaps::One"),
            ValueMaps::Many(rules) => write!(f, "ValueMaps::Many({})", rules.len()),
        }
    }
}

/// Replaces one specific value with another
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEquals {
    matches: Value,
    replacement: Value,
}

impl ValueMap for ValueEquals {
    fn apply(&self, value: Value) -> ValueOutcome {
        if json_eq(&value, &self.matches) {
            ValueOutcome::Keep(self.replacement.clone())
        } else {
            ValueOutcome::Keep(value)
        }
    }
}

pub fn value_equals(matches: Value, replacement: Value) -> ValueEquals {
    ValueEquals { matches, replacement }
}

/// Aborts the write of leaves holding one specific value
#[derive(Debug, Clone, PartialEq)]
pub struct SkipIfEquals {
    matches: Value,
}

impl ValueMap for SkipIfEquals {
    fn apply(&self, value: Value) -> ValueOutcome {
        if json_eq(&value, &self.matches) {
            ValueOutcome::Abort
        } else {
            ValueOutcome::Keep(value)
        }
    }
}

pub fn skip_if_equals(matches: Value) -> SkipIfEquals {
    SkipIfEquals { matches }
}
