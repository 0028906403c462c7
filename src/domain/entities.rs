pub mod consultation;
pub mod labels;
