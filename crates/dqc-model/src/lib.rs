pub mod compliance;
pub mod constraint;
pub mod error;
pub mod mapping;
pub mod table;
pub mod value;

pub use compliance::{
    ComplianceReport, ComplianceVerdict, GroupRow, ValidationOutcome, ValidationRun,
};
pub use constraint::{ConstraintCheck, FieldConstraint, ReferenceSchema};
pub use error::{DqcError, Result};
pub use mapping::AcquisitionMapping;
pub use table::{
    ACQUISITION_COLUMN, DataTable, GROUP_COLUMN, Record, SESSION_ACQUISITION,
};
pub use value::{Value, ValueKey, value_eq};
