pub mod consultation;
pub mod home;
pub mod system;
