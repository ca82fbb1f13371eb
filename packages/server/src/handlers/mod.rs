pub mod dashboard;
pub mod health;
pub mod like;
pub mod media;
pub mod playlist;
pub mod subscription;
pub mod video;
