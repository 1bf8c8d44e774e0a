pub mod import;
pub mod models;

pub use import::{missing_file_error, validate_import, validate_vmdk_filename};
pub use models::{
    error_for, validate_step, FieldError, IncompleteDraft, StepValues, VmDraft, WizardStep,
};
