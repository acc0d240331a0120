use agenda_shared::ScheduleRequest;
use gloo::net::http::Request;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Posts the request and returns the markup the collaborator answered with.
pub async fn post_form(request: &ScheduleRequest) -> Result<String, String> {
    let response = Request::post(&request.path)
        .header("Content-Type", FORM_CONTENT_TYPE)
        .body(request.form_body())
        .map_err(|e| format!("failed to build request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("request error: {e}"))?;

    if !response.ok() {
        return Err(format!("{} answered {}", request.path, response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| format!("decode error: {e}"))
}

/// Fires the request and swaps the target container's content once the
/// markup arrives. Nothing waits on the outcome.
pub fn dispatch(document: web_sys::Document, request: ScheduleRequest) {
    tracing::debug!(
        kind = request.kind.as_str(),
        path = %request.path,
        "sending schedule request"
    );

    wasm_bindgen_futures::spawn_local(async move {
        match post_form(&request).await {
            Ok(markup) => match document.get_element_by_id(&request.target) {
                Some(container) => container.set_inner_html(&markup),
                None => tracing::warn!(container = %request.target, "schedule container missing"),
            },
            Err(error) => tracing::error!(%error, "schedule request failed"),
        }
    });
}
