//! User-defined type table
//!
//! Coercion against enums, structs, and user-defined value types needs the
//! full definitions (option lists, member lists, underlying types), which
//! travel separately from the descriptors. Callers build one table per
//! compilation context and thread a reference through the options record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data_type::{DataType, Member, TypeId};

/// Definition of a single user-defined type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UserDefinedType {
    /// Enumeration with an ordered option list
    Enum {
        name: String,
        /// Contract the enum is defined in, if locally defined
        defining_contract: Option<String>,
        options: Vec<String>,
    },

    /// Struct with an ordered member list
    Struct { name: String, members: Vec<Member> },

    /// Value type wrapping a built-in underlying type
    ValueType { name: String, underlying: DataType },
}

/// Table of user-defined types, keyed by [`TypeId`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefinedTypes {
    types: HashMap<TypeId, UserDefinedType>,
}

impl UserDefinedTypes {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any previous one under the same id
    pub fn insert(&mut self, id: impl Into<TypeId>, definition: UserDefinedType) {
        self.types.insert(id.into(), definition);
    }

    /// Look up a definition
    pub fn get(&self, id: &str) -> Option<&UserDefinedType> {
        self.types.get(id)
    }

    /// Option list of an enum type, if `id` names one
    pub fn enum_options(&self, id: &str) -> Option<&[String]> {
        match self.types.get(id) {
            Some(UserDefinedType::Enum { options, .. }) => Some(options),
            _ => None,
        }
    }

    /// Name and defining contract of an enum type, if `id` names one
    pub fn enum_names(&self, id: &str) -> Option<(&str, Option<&str>)> {
        match self.types.get(id) {
            Some(UserDefinedType::Enum {
                name,
                defining_contract,
                ..
            }) => Some((name.as_str(), defining_contract.as_deref())),
            _ => None,
        }
    }

    /// Member list of a struct type, if `id` names one
    pub fn struct_members(&self, id: &str) -> Option<&[Member]> {
        match self.types.get(id) {
            Some(UserDefinedType::Struct { members, .. }) => Some(members),
            _ => None,
        }
    }

    /// Resolve a user-defined value type to its underlying built-in type,
    /// following chains of value types.
    ///
    /// Returns `Err` with the offending id when a referenced id is unknown,
    /// names a non-value type where a value type was expected, or the chain
    /// cycles.
    pub fn resolve_value_type(&self, ty: &DataType) -> Result<DataType, TypeId> {
        let mut current = ty.clone();
        let mut visited: Vec<TypeId> = Vec::new();
        loop {
            match current {
                DataType::UserDefinedValueType { id } => {
                    if visited.iter().any(|seen| *seen == id) {
                        return Err(id);
                    }
                    match self.types.get(&id) {
                        Some(UserDefinedType::ValueType { underlying, .. }) => {
                            visited.push(id);
                            current = underlying.clone();
                        }
                        _ => return Err(id),
                    }
                }
                other => return Ok(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> UserDefinedTypes {
        let mut types = UserDefinedTypes::new();
        types.insert(
            "Ticket",
            UserDefinedType::ValueType {
                name: "Ticket".to_string(),
                underlying: DataType::uint(64),
            },
        );
        types.insert(
            "Color",
            UserDefinedType::Enum {
                name: "Color".to_string(),
                defining_contract: Some("Registry".to_string()),
                options: vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()],
            },
        );
        types
    }

    #[test]
    fn test_enum_lookup() {
        let types = sample_table();
        assert_eq!(types.enum_options("Color").map(|o| o.len()), Some(3));
        assert_eq!(types.enum_names("Color"), Some(("Color", Some("Registry"))));
        assert!(types.enum_options("Ticket").is_none());
    }

    #[test]
    fn test_value_type_resolution() {
        let types = sample_table();
        let resolved = types
            .resolve_value_type(&DataType::UserDefinedValueType {
                id: "Ticket".to_string(),
            })
            .expect("Should resolve");
        assert_eq!(resolved, DataType::uint(64));
    }

    #[test]
    fn test_value_type_resolution_unknown_id() {
        let types = sample_table();
        let result = types.resolve_value_type(&DataType::UserDefinedValueType {
            id: "Missing".to_string(),
        });
        assert_eq!(result, Err("Missing".to_string()));
    }

    #[test]
    fn test_builtin_passes_through() {
        let types = sample_table();
        let resolved = types.resolve_value_type(&DataType::Bool).expect("builtin");
        assert_eq!(resolved, DataType::Bool);
    }
}
