use actix_web::web;

pub mod health;
pub mod leaderboard;
pub mod realtime;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// In production, `main.rs` wires these under the same scopes with CORS
/// middleware on top; tests register the same paths without the wrapper
/// so endpoint behavior can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Leaderboard: /api/leaderboard
    cfg.service(web::scope("/api/leaderboard").configure(leaderboard::configure_routes));

    // Realtime: /api/ws
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
