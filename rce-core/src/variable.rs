//! Variable metadata for everything the model writes.
//!
//! Every variable that can appear in an output record carries a unit and a CF-style
//! standard name. Definitions are registered at compile time with the
//! [`define_static_variable!`] macro and collected through `inventory`, so schemes in
//! other crates can register their own diagnostics.
//!
//! ```rust
//! use rce_core::variable::lookup;
//!
//! let temperature = lookup("T").unwrap();
//! assert_eq!(temperature.unit, "K");
//! assert_eq!(temperature.standard_name, "air_temperature");
//! ```

use crate::profile::FloatValue;
use serde::{Deserialize, Serialize};

/// Static variable definition holder for compile-time registration.
#[derive(Debug, Clone, Copy)]
pub struct StaticVariableDefinition {
    /// Variable name as used in the atmosphere, heating rates and output records
    pub name: &'static str,
    pub unit: &'static str,
    pub standard_name: &'static str,
    /// Default volume mixing ratio for well-mixed trace gases
    pub default_vmr: Option<FloatValue>,
}

impl StaticVariableDefinition {
    pub const fn new(
        name: &'static str,
        unit: &'static str,
        standard_name: &'static str,
        default_vmr: Option<FloatValue>,
    ) -> Self {
        Self {
            name,
            unit,
            standard_name,
            default_vmr,
        }
    }

    pub fn to_description(&self) -> VariableDescription {
        VariableDescription {
            name: self.name.to_string(),
            unit: self.unit.to_string(),
            standard_name: self.standard_name.to_string(),
        }
    }
}

inventory::collect!(StaticVariableDefinition);

/// Owned description of a variable, as stored in the header of an output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescription {
    pub name: String,
    pub unit: String,
    pub standard_name: String,
}

/// Define a static variable and register it with the variable registry.
#[macro_export]
macro_rules! define_static_variable {
    (
        $var_name:ident,
        name = $name:expr,
        unit = $unit:expr,
        standard_name = $standard_name:expr $(,)?
    ) => {
        #[doc = concat!("Static variable definition for `", $name, "`")]
        pub static $var_name: $crate::variable::StaticVariableDefinition =
            $crate::variable::StaticVariableDefinition::new($name, $unit, $standard_name, None);

        ::inventory::submit! { $var_name }
    };
    (
        $var_name:ident,
        name = $name:expr,
        unit = $unit:expr,
        standard_name = $standard_name:expr,
        default_vmr = $vmr:expr $(,)?
    ) => {
        #[doc = concat!("Static variable definition for `", $name, "`")]
        pub static $var_name: $crate::variable::StaticVariableDefinition =
            $crate::variable::StaticVariableDefinition::new(
                $name,
                $unit,
                $standard_name,
                Some($vmr),
            );

        ::inventory::submit! { $var_name }
    };
}

pub use crate::define_static_variable;

/// Look up a registered variable by name.
pub fn lookup(name: &str) -> Option<&'static StaticVariableDefinition> {
    inventory::iter::<StaticVariableDefinition>
        .into_iter()
        .find(|var| var.name == name)
}

/// Describe a set of variable names.
///
/// Names without a registered definition are described with an empty unit and standard name.
pub fn describe<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<VariableDescription> {
    names
        .into_iter()
        .map(|name| match lookup(name) {
            Some(var) => var.to_description(),
            None => VariableDescription {
                name: name.to_string(),
                unit: String::new(),
                standard_name: String::new(),
            },
        })
        .collect()
}

/// All registered variables with a default volume mixing ratio, sorted by name.
pub fn trace_gases() -> Vec<&'static StaticVariableDefinition> {
    let mut gases: Vec<_> = inventory::iter::<StaticVariableDefinition>
        .into_iter()
        .filter(|var| var.default_vmr.is_some())
        .collect();
    gases.sort_by_key(|var| var.name);
    gases
}
