pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod session;

pub use routes::auth_routes;
