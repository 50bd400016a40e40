//! Method signatures
//!
//! Candidate signatures for overload resolution. Only the parts the
//! coercion engine needs: a name and an ordered input list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data_type::{DataType, Member};

/// A callable method signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Parameters in order
    pub inputs: Vec<Member>,
}

impl MethodSignature {
    /// Create a signature with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
        }
    }

    /// Add an unnamed parameter
    pub fn with_input(mut self, ty: DataType) -> Self {
        self.inputs.push(Member::unnamed(ty));
        self
    }

    /// Add a named parameter
    pub fn with_named_input(mut self, name: impl Into<String>, ty: DataType) -> Self {
        self.inputs.push(Member::named(name, ty));
        self
    }

    /// Parameter types, without names
    pub fn input_types(&self) -> Vec<DataType> {
        self.inputs.iter().map(|member| member.ty.clone()).collect()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, member) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", member.ty)?;
        }
        write!(f, ")")
    }
}
