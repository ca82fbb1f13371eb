//! Pieces shared by the Vidnest server and its tooling.

pub mod media;
