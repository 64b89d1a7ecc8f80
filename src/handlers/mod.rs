// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod public;    // Service metadata and health (/, /health)
pub mod protected; // Tickets and the customer/employee directory
