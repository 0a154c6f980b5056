pub mod access;
pub mod entities;
pub mod requests;
pub mod responses;
