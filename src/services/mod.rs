pub mod client_info;
pub mod clock;
pub mod hashing;
pub mod jwt;
pub mod metrics;
pub mod rate_limit;
pub mod security;
pub mod validation;
