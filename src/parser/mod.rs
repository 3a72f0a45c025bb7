//! Archive parsing: line decoding, chunking, header repair, header fields, dates, and posts.

pub mod chunk;
pub mod date;
pub mod decode;
pub mod header;
pub mod post;
pub mod repair;
