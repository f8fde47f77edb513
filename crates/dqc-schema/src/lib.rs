mod compile;
mod document;
mod wildcard;

pub use compile::{compile_acquisition, compile_field, compile_from_record, compile_group};
pub use document::{AcquisitionSpec, FieldSpec, GroupSpec, SchemaDocument};
pub use wildcard::{compile_wildcard, is_wildcard};
