use archviz_editor_lib::command::{self, CommandResponse};
use archviz_editor_lib::harness::TestHarness;
use archviz_editor_lib::state::EditorSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "archviz_editor=info".into()),
        )
        .init();

    let args = parse_args();
    let Some(script_path) = args.script else {
        eprintln!("usage: archviz-editor --script <commands.json> [--export <scene.json>]");
        std::process::exit(2);
    };

    let script = match std::fs::read_to_string(&script_path) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to read script {script_path}: {e}");
            std::process::exit(1);
        }
    };

    let mut harness = TestHarness::with_settings(EditorSettings::load());
    let responses = match command::execute_json_batch(&mut harness, &script) {
        Ok(responses) => responses,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    let failed = responses.iter().filter(|r| !r.success).count();
    tracing::info!(
        "Ran {} command(s) from {script_path}, {failed} failed",
        responses.len()
    );
    print_responses(&responses);

    if let Some(path) = args.export {
        match std::fs::write(&path, harness.export_scene_json()) {
            Ok(()) => tracing::info!("Exported scene to {path}"),
            Err(e) => {
                tracing::error!("Failed to write scene to {path}: {e}");
                std::process::exit(1);
            }
        }
    }
}

#[derive(Default)]
struct Args {
    script: Option<String>,
    export: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--script" if value.is_some() => {
                parsed.script = value;
                i += 1;
            }
            "--export" if value.is_some() => {
                parsed.export = value;
                i += 1;
            }
            other => tracing::warn!("Ignoring argument {other}"),
        }
        i += 1;
    }
    parsed
}

fn print_responses(responses: &[CommandResponse]) {
    match serde_json::to_string_pretty(responses) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize responses: {e}"),
    }
}
