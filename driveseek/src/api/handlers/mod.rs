pub mod download;
pub mod health;
pub mod listing;
pub mod retrieve;

pub use download::download;
pub use health::health;
pub use listing::{folder_listing, root_listing};
pub use retrieve::retrieve;
