mod handlers;
mod server;
mod state;

pub use server::Server;
pub use state::AppState;
