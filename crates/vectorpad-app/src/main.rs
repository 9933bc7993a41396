//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    use vectorpad_core::{EditorConfig, Surface};

    env_logger::init();
    log::info!("Starting VectorPad (headless)");

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| EditorConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(err) => {
                log::error!("Failed to load config {path}: {err}");
                std::process::exit(1);
            }
        },
        None => EditorConfig::default(),
    };

    vectorpad_app::ShortcutRegistry::print_all();

    let editor = vectorpad_app::demo::run(config);
    let doc = editor.surface();
    for id in doc.shape_ids() {
        if let Some(shape) = doc.shape(id) {
            match serde_json::to_string(shape) {
                Ok(json) => println!("{json}"),
                Err(err) => log::warn!("Cannot serialize {id}: {err}"),
            }
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
