mod api;
mod dom;
mod page;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting agenda schedule page"
  );

  let Some(window) = web_sys::window()
  else {
    tracing::error!("no window; nothing to bind");
    return;
  };
  let Some(document) = window.document()
  else {
    tracing::error!(
      "no document; nothing to bind"
    );
    return;
  };

  let config = dom::load_config(&document);
  page::mount(window, document, config);
}
