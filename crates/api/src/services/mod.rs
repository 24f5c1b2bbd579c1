//! Business services layered over the persistence port.

pub mod admins;
pub mod images;
pub mod imgbb;
pub mod uploads;

pub use admins::{AdminCheck, AdminDirectory, AdminEntry, AdminError};
pub use images::ImageResolver;
pub use imgbb::{HostedImage, ImageHostError, ImgBbClient};
pub use uploads::ImageStorage;
