pub mod formats;
pub mod handlers;
pub mod history;
pub mod middleware;
pub mod queue;
pub mod routes;
pub mod ws;

pub use routes::create_router;
