//! Stored entity shapes shared by every persistence adapter.
//!
//! These are what the store hands back after an insert or a read. Input
//! shapes live in [`crate::validation`].

pub mod admin;
pub mod image;
pub mod order;
pub mod sheep;
pub mod user;

pub use admin::Admin;
pub use image::{Image, ImageSource, NewImage};
pub use order::{Order, OrderItem};
pub use sheep::Sheep;
pub use user::UserProfile;
