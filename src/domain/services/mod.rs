pub mod admission;
pub mod conflict;
pub mod policy;
pub mod slots;
pub mod validation;
