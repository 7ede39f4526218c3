pub mod build;
pub mod geocode;
pub mod locate;
pub mod progress;
pub mod timeline;
pub mod tracking_id;
