//! Thin JSON glue over the session gate and the application services.
//!
//! Handlers convert gate errors into `{error, details}` bodies; they
//! never panic and never leak an uncaught error into the response path.

use crate::bootstrap::AppContext;
use schola_core::ScholaError;
use schola_core::account::{Credentials, Role};
use schola_core::session::{SessionState, SimulatedPersona};
use schola_core::view::ViewId;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Display;
use std::io::Read;
use std::sync::Arc;
use tiny_http::{Header, Request, Response};
use tokio::runtime::Handle;

/// Builds a header; the inputs are compile-time constants.
pub(crate) fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("static header is valid")
}

/// Builds the standard error body.
pub(crate) fn error_body(error: &str, details: impl Display) -> Value {
    json!({ "error": error, "details": details.to_string() })
}

/// Sends a JSON response.
pub(crate) fn respond_json(request: Request, status: u16, body: &Value) {
    let response = Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(header("Content-Type", "application/json"));
    let _ = request.respond(response);
}

/// HTTP status for a gate error.
fn error_status(err: &ScholaError) -> u16 {
    match err {
        ScholaError::Auth(_) => 401,
        ScholaError::Validation { .. } => 400,
        ScholaError::NotFound { .. } => 404,
        ScholaError::AdapterUnavailable { .. } => 503,
        _ => 500,
    }
}

fn respond_error(request: Request, err: &ScholaError) {
    respond_json(
        request,
        error_status(err),
        &error_body("request failed", err),
    );
}

fn read_json<T: DeserializeOwned>(request: &mut Request) -> Result<T, String> {
    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .map_err(|e| format!("body is not readable: {e}"))?;
    serde_json::from_str(&body).map_err(|e| e.to_string())
}

/// Responds with the offline indicator used while the backing store is
/// unreachable.
fn respond_offline(request: Request) {
    respond_json(
        request,
        503,
        &error_body("offline", "the backing store is unreachable"),
    );
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    email: String,
    password: String,
    role: Role,
    #[serde(default)]
    guardian_contact: String,
}

#[derive(Deserialize)]
struct AgreementRequest {
    accept: bool,
}

#[derive(Deserialize)]
struct ViewRequest {
    view: ViewId,
}

#[derive(Deserialize)]
struct SimulateRequest {
    persona: String,
}

#[derive(Deserialize)]
struct AwardRequest {
    amount: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectStudentRequest {
    student_id: Option<String>,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Deserialize)]
struct FlashcardsRequest {
    topic: String,
}

#[derive(Deserialize)]
struct CareersRequest {
    interests: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemedialRequest {
    subject: String,
    missed_topics: Vec<String>,
}

#[derive(Deserialize)]
struct SpeechRequest {
    text: String,
}

pub fn screen(request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = &ctx.gate else {
        respond_json(
            request,
            200,
            &json!({ "offline": true, "screen": { "type": "Login" } }),
        );
        return;
    };
    let screen = handle.block_on(gate.screen());
    respond_json(
        request,
        200,
        &json!({ "offline": false, "screen": screen }),
    );
}

pub fn login(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = ctx.gate.clone() else {
        respond_offline(request);
        return;
    };
    let body: LoginRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    let credentials = Credentials {
        email: body.email,
        password: body.password,
        intended_role: body.role,
        guardian_contact: body.guardian_contact,
    };

    match handle.block_on(gate.login(&credentials)) {
        Ok(screen) => respond_json(request, 200, &json!({ "screen": screen })),
        Err(e) => respond_error(request, &e),
    }
}

pub fn agreement(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = ctx.gate.clone() else {
        respond_offline(request);
        return;
    };
    let body: AgreementRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    let result = handle.block_on(async {
        if body.accept {
            gate.accept_agreement().await
        } else {
            Ok(gate.decline_agreement().await)
        }
    });
    match result {
        Ok(screen) => respond_json(request, 200, &json!({ "screen": screen })),
        Err(e) => respond_error(request, &e),
    }
}

pub fn select_view(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = ctx.gate.clone() else {
        respond_offline(request);
        return;
    };
    let body: ViewRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    let (accepted, screen) = handle.block_on(async {
        let accepted = gate.select_view(body.view).await;
        (accepted, gate.screen().await)
    });
    respond_json(
        request,
        200,
        &json!({ "accepted": accepted, "screen": screen }),
    );
}

pub fn logout(request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = ctx.gate.clone() else {
        respond_offline(request);
        return;
    };
    let screen = handle.block_on(gate.logout());
    respond_json(request, 200, &json!({ "screen": screen }));
}

pub fn simulate(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = ctx.gate.clone() else {
        respond_offline(request);
        return;
    };
    let body: SimulateRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    let persona = match body.persona.to_ascii_lowercase().as_str() {
        "kids" => SimulatedPersona::kids(),
        "teen" => SimulatedPersona::teen(),
        "staff" => SimulatedPersona::staff(),
        other => {
            respond_json(
                request,
                400,
                &error_body("unknown persona", format!("'{other}' is not a preset")),
            );
            return;
        }
    };

    let screen = handle.block_on(gate.simulate_persona(persona));
    respond_json(request, 200, &json!({ "screen": screen }));
}

pub fn award_coins(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = ctx.gate.clone() else {
        respond_offline(request);
        return;
    };
    let body: AwardRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    match handle.block_on(gate.award_coins(body.amount)) {
        Ok(coins) => respond_json(request, 200, &json!({ "coins": coins })),
        Err(e) => respond_error(request, &e),
    }
}

pub fn select_student(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(gate) = ctx.gate.clone() else {
        respond_offline(request);
        return;
    };
    let body: SelectStudentRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    let accepted = handle.block_on(gate.select_student(body.student_id));
    respond_json(request, 200, &json!({ "accepted": accepted }));
}

pub fn tutor_chat(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(tutor) = &ctx.tutor else {
        respond_offline(request);
        return;
    };
    let body: ChatRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    match handle.block_on(tutor.chat(&body.message)) {
        Ok(reply) => respond_json(request, 200, &json!({ "reply": reply })),
        Err(e) => respond_error(request, &e),
    }
}

fn active_level(
    ctx: &AppContext,
    handle: &Handle,
) -> Option<schola_core::account::AcademicLevel> {
    let gate = ctx.gate.as_ref()?;
    match handle.block_on(gate.state()) {
        SessionState::Active(session) => Some(session.account.level),
        _ => None,
    }
}

pub fn flashcards(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(content) = &ctx.content else {
        respond_offline(request);
        return;
    };
    let body: FlashcardsRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };
    let Some(level) = active_level(&ctx, &handle) else {
        respond_json(
            request,
            400,
            &error_body("no active session", "sign in first"),
        );
        return;
    };

    let cards = handle.block_on(content.generate_flashcards(&body.topic, level));
    respond_json(request, 200, &json!({ "flashcards": cards }));
}

pub fn careers(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let Some(content) = &ctx.content else {
        respond_offline(request);
        return;
    };
    let body: CareersRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };
    let Some(level) = active_level(&ctx, &handle) else {
        respond_json(
            request,
            400,
            &error_body("no active session", "sign in first"),
        );
        return;
    };

    let suggestions = handle.block_on(content.generate_career_guidance(&body.interests, level));
    respond_json(request, 200, &json!({ "careers": suggestions }));
}

pub fn remedial(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let (Some(content), Some(gate)) = (&ctx.content, ctx.gate.clone()) else {
        respond_offline(request);
        return;
    };
    let body: RemedialRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    let student_id = match handle.block_on(gate.state()) {
        SessionState::Active(session) if session.account.role == Role::Student => {
            session.account.id
        }
        _ => {
            respond_json(
                request,
                400,
                &error_body("no active student session", "sign in as a student first"),
            );
            return;
        }
    };

    let result = handle.block_on(async {
        let remedial = content
            .generate_remedial_plan(&student_id, &body.subject, &body.missed_topics)
            .await?;
        if let Some(remedial) = &remedial {
            gate.attach_remedial(remedial.clone()).await;
        }
        Ok::<_, ScholaError>(remedial)
    });

    match result {
        Ok(remedial) => {
            let screen = handle.block_on(gate.screen());
            respond_json(
                request,
                200,
                &json!({ "remedial": remedial, "screen": screen }),
            );
        }
        Err(e) => respond_error(request, &e),
    }
}

pub fn speech(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let body: SpeechRequest = match read_json(&mut request) {
        Ok(body) => body,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };
    let Some(speech) = &ctx.speech else {
        respond_json(
            request,
            500,
            &error_body("speech provider offline", "ELEVENLABS_API_KEY is not configured"),
        );
        return;
    };

    match handle.block_on(speech.synthesize_data_url(&body.text)) {
        Ok(audio) => respond_json(request, 200, &json!({ "audio": audio })),
        Err(e) => {
            tracing::warn!("[Speech] Synthesis failed: {e}");
            respond_json(request, 500, &error_body("upstream provider error", e));
        }
    }
}
