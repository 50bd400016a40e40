//! Coercion options
//!
//! A small configuration record threaded through every case. The
//! specificity floor is deliberately *not* inherited by nested dispatches:
//! it is cleared on entry to every case and only shapes the error raised
//! at the dispatch level that set it.

use lib_abi_types::UserDefinedTypes;

/// Options threaded through a coercion
#[derive(Debug, Clone)]
pub struct WrapOptions<'a> {
    /// Diagnostic name of the value being coerced; extended with
    /// `.member` / `[index]` segments on container recursion
    pub name: String,
    /// Relax exact type-match requirements (unlocks the cross-class
    /// coercions enumerated per case)
    pub loose: bool,
    /// Minimum specificity of any failure raised by the *current*
    /// dispatch; never propagates into nested dispatches
    pub specificity_floor: Option<u8>,
    /// Table for resolving enum option lists, struct members, and
    /// user-defined value types
    pub user_types: &'a UserDefinedTypes,
    /// Legacy compatibility: tolerate unknown transaction-options keys
    /// (at least one recognized key is still required)
    pub allow_options_junk: bool,
}

impl<'a> WrapOptions<'a> {
    /// Options with the default diagnostic name
    pub fn new(user_types: &'a UserDefinedTypes) -> Self {
        Self::named(user_types, "value")
    }

    /// Options with an explicit diagnostic name
    pub fn named(user_types: &'a UserDefinedTypes, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loose: false,
            specificity_floor: None,
            user_types,
            allow_options_junk: false,
        }
    }

    /// Enable loose mode
    pub fn loose(mut self) -> Self {
        self.loose = true;
        self
    }

    /// Set the specificity floor for the current dispatch
    pub fn with_floor(mut self, floor: u8) -> Self {
        self.specificity_floor = Some(floor);
        self
    }

    /// Copy with the floor cleared, for entering a case or nested dispatch
    pub fn cleared(&self) -> Self {
        Self {
            name: self.name.clone(),
            loose: self.loose,
            specificity_floor: None,
            user_types: self.user_types,
            allow_options_junk: self.allow_options_junk,
        }
    }

    /// Child options for a named member: `parent.member`, floor cleared
    pub fn named_child(&self, member: &str) -> Self {
        Self {
            name: format!("{}.{}", self.name, member),
            ..self.cleared()
        }
    }

    /// Child options for an indexed element: `parent[index]`, floor cleared
    pub fn indexed_child(&self, index: usize) -> Self {
        Self {
            name: format!("{}[{}]", self.name, index),
            ..self.cleared()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_extend_name_and_clear_floor() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::named(&types, "arg").loose().with_floor(5);
        let child = opts.named_child("inner");
        assert_eq!(child.name, "arg.inner");
        assert!(child.loose);
        assert_eq!(child.specificity_floor, None);

        let element = child.indexed_child(2);
        assert_eq!(element.name, "arg.inner[2]");
        assert_eq!(element.specificity_floor, None);
    }
}
