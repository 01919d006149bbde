//! HTTP surface: accept loop and request routing.

use crate::bootstrap::AppContext;
use crate::proxy;
use crate::routes::{self, error_body, respond_json};
use anyhow::anyhow;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};
use tokio::runtime::Handle;

/// Starts the accept loop. Each request is handled on its own thread so
/// a long-lived streaming response cannot stall the listener.
pub fn serve(addr: &str, ctx: Arc<AppContext>, handle: Handle) -> anyhow::Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow!("Failed to bind {addr}: {e}"))?;
    tracing::info!("[Server] Listening on http://{addr}");

    for request in server.incoming_requests() {
        let ctx = ctx.clone();
        let handle = handle.clone();
        std::thread::spawn(move || route(request, ctx, handle));
    }
    Ok(())
}

fn route(request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let method = request.method().clone();
    // Strip any query string before matching.
    let path = request.url().split('?').next().unwrap_or("").to_string();

    match (&method, path.as_str()) {
        (Method::Post, "/api/ai-proxy") => proxy::handle(request, ctx, handle),
        (_, "/api/ai-proxy") => respond_json(
            request,
            405,
            &error_body("method not allowed", "only POST is accepted"),
        ),

        (Method::Get, "/api/session/screen") => routes::screen(request, ctx, handle),
        (Method::Post, "/api/session/login") => routes::login(request, ctx, handle),
        (Method::Post, "/api/session/agreement") => routes::agreement(request, ctx, handle),
        (Method::Post, "/api/session/view") => routes::select_view(request, ctx, handle),
        (Method::Post, "/api/session/logout") => routes::logout(request, ctx, handle),
        (Method::Post, "/api/session/simulate") => routes::simulate(request, ctx, handle),
        (Method::Post, "/api/session/award") => routes::award_coins(request, ctx, handle),
        (Method::Post, "/api/session/select-student") => {
            routes::select_student(request, ctx, handle)
        }

        (Method::Post, "/api/tutor/chat") => routes::tutor_chat(request, ctx, handle),
        (Method::Post, "/api/content/flashcards") => routes::flashcards(request, ctx, handle),
        (Method::Post, "/api/content/careers") => routes::careers(request, ctx, handle),
        (Method::Post, "/api/content/remedial") => routes::remedial(request, ctx, handle),
        (Method::Post, "/api/speech") => routes::speech(request, ctx, handle),

        _ => respond_json(
            request,
            404,
            &error_body("not found", format!("no route for {method} {path}")),
        ),
    }
}
