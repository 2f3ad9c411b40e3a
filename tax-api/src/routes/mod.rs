pub mod admin;
pub mod tax;
