pub mod client;
pub mod models;
pub mod walker;

pub use client::GraphClient;
pub use models::DriveItem;
pub use walker::ChildLister;
