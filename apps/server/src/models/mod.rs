//! Domain models for patient records

pub mod patient;

pub use patient::{
    parse_float_prefix, require_fields, Condition, Patient, PatientFields, PatientUpdate, Test,
    TestFields, ADD_TEST_CRITICAL_THRESHOLD, CREATE_PATIENT_FIELDS, TEST_FIELDS_MESSAGE,
    UPDATE_PATIENT_FIELDS, UPDATE_TEST_CRITICAL_THRESHOLD,
};
