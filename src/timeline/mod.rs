pub mod interp;
pub mod key;
pub mod store;
