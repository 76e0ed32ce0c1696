// CV generation endpoint: payload validation, rendering, response and archival.

pub mod handlers;
pub mod models;
