//! Rule builders for the mapping engine
//!
//! Reference-map rules decide whether a leaf is written and where
//! ([`reference`]); value-map rules transform or veto the value on its way
//! ([`value`]). Plain closures work as either kind of rule.
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

pub mod equality;
pub mod reference;
pub mod value;

pub use equality::json_eq;
pub use reference::{
    all_rule, first_match, path_rule, ref_rule, AllRule, FirstMatch, PathRule, RefMap, RefTarget,
};
pub use value::{
    skip_if_equals, value_equals, SkipIfEquals, ValueEquals, ValueMap, ValueMaps, ValueOutcome,
};
