pub mod contact;
pub mod founder;
pub mod social;
