//! Validation modules

pub mod fields;

pub use fields::{
    validate_color, validate_custom_value, validate_name, MAX_NAME_LENGTH, MAX_TEXTAREA_LENGTH,
    MAX_TEXT_LENGTH,
};
