pub mod atmosphere;
pub mod constants;
pub mod errors;
#[cfg(test)]
mod example_components;
pub mod heating_rates;
pub mod observer;
pub mod output;
pub mod parameters;
pub mod profile;
pub mod rce;
pub mod standard_variables;
pub mod submodel;
pub mod surface;
pub mod variable;
