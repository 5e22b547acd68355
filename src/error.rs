use thiserror::Error;

use crate::roles::Role;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MockError {
    #[error("Configuration: {0}")]
    Configuration(String),

    #[error("Column '{column}' configured for role {role} not found in input headers")]
    Schema { role: Role, column: String },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Column '{column}' row {row}: '{value}' is not numeric")]
    DataType {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Input column '{0}' clashes with a generated column; rename or drop it first")]
    GeneratedColumn(String),

    #[error("Invalid noise parameters: {0}")]
    InvalidNoise(String),
}
