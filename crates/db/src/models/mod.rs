//! Row structs and their conversions into domain types.

pub mod customer;
