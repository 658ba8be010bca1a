pub mod booking;
pub mod id;
pub mod role;
pub mod room;
pub mod session;
pub mod trust;
pub mod user;
