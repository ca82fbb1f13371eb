pub mod enrich;
pub mod filename;
pub mod jwt;
pub mod media;
pub mod object_id;
pub mod ownership;
pub mod toggle;
