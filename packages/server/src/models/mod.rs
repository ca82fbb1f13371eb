pub mod dashboard;
pub mod health;
pub mod like;
pub mod playlist;
pub mod shared;
pub mod subscription;
pub mod video;
