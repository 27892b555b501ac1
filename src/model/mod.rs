pub mod advisory;
pub mod columns;
pub mod table;
pub mod value;
