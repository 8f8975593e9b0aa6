pub mod conf;
pub mod error;
pub mod ref_id;
pub mod weak_set;
