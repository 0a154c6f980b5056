pub mod auth;

pub mod schools;

pub mod memberships;

pub mod posts;

pub use auth::configure_auth_routes;
pub use schools::configure_school_routes;
