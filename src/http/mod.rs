//! HTTP control API
//!
//! Lets other tools (shortcuts, transcription pipelines) feed and flush the
//! buffer without going through Telegram:
//! - GET /health - Health check
//! - GET /buffer - Today's buffer statistics
//! - POST /entries - Record a note for a chat
//! - POST /analyze - Run the analysis for a chat
//!
//! When `service.http.auth_token` is set, every route except `/health`
//! requires `Authorization: Bearer <token>`.

mod handlers;
mod routes;
mod state;

pub use handlers::{AnalyzeRequest, ErrorResponse, RecordEntryRequest};
pub use routes::create_router;
pub use state::AppState;
