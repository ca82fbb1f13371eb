mod like;
mod video;
