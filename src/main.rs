//! labelcanvas-replay
//!
//! Feeds a recorded input script through the canvas engine and prints the
//! resulting shapes as JSON records.
//!
//! ## Script Format
//!
//! ```json
//! {
//!   "config": { "epsilon": 10.0, "log_level": "debug" },
//!   "image": { "width": 640, "height": 480 },
//!   "shapes": [ { "label": "cat", "points": [[10, 10], [50, 40]], "shape_type": "rectangle" } ],
//!   "steps": [
//!     { "action": "set_mode", "edit": false, "kind": "polygon" },
//!     { "action": "press", "x": 100, "y": 100 },
//!     { "action": "move", "x": 120, "y": 90, "buttons": { "left": true } },
//!     { "action": "key_press", "key": "enter" }
//!   ]
//! }
//! ```
//!
//! Events emitted by each step are logged at info level.

use std::process::ExitCode;

use serde::Deserialize;

use labelcanvas::model::{records_from_shapes, records_to_json, shapes_from_records};
use labelcanvas::{
    Canvas, CanvasConfig, Key, Modifiers, Point, PointerButton, PointerButtons, Result,
    ShapeKind, ShapeRecord,
};

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    config: CanvasConfig,
    image: ImageSize,
    #[serde(default)]
    shapes: Vec<ShapeRecord>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct ImageSize {
    width: u32,
    height: u32,
}

/// One recorded input or edit-menu action.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    Press {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        buttons: PointerButtons,
    },
    Release {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    KeyPress {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyRelease {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    SetMode {
        edit: bool,
        #[serde(default)]
        kind: Option<ShapeKind>,
    },
    Undo,
    DeleteSelected,
    Duplicate,
    EndMove {
        copy: bool,
    },
}

fn apply(canvas: &mut Canvas, step: Step) {
    match step {
        Step::Press {
            x,
            y,
            button,
            modifiers,
        } => canvas.mouse_press(Point::new(x, y), button, modifiers),
        Step::Move { x, y, buttons } => canvas.mouse_move(Point::new(x, y), buttons),
        Step::Release { x, y, button } => canvas.mouse_release(Point::new(x, y), button),
        Step::DoubleClick { x, y } => {
            canvas.mouse_double_click(Point::new(x, y), PointerButton::Left)
        }
        Step::KeyPress { key, modifiers } => canvas.key_press(key, modifiers),
        Step::KeyRelease { key, modifiers } => canvas.key_release(key, modifiers),
        Step::SetMode { edit, kind } => {
            if let Some(kind) = kind {
                canvas.set_create_mode(kind);
            }
            canvas.set_editing(edit);
        }
        Step::Undo => {
            canvas.undo();
        }
        Step::DeleteSelected => {
            canvas.delete_selected();
        }
        Step::Duplicate => {
            canvas.duplicate_selected_shapes();
        }
        Step::EndMove { copy } => {
            canvas.end_move(copy);
        }
    }
}

/// Parse a script, replay it, and return the final shape records as JSON.
fn replay(script: Script) -> Result<String> {
    script.config.validate()?;

    let mut canvas = Canvas::new(script.config);
    canvas.load_image(script.image.width, script.image.height, true);
    canvas.load_shapes(shapes_from_records(&script.shapes)?, true);

    for (index, step) in script.steps.into_iter().enumerate() {
        log::debug!("Step {}: {:?}", index, step);
        apply(&mut canvas, step);
        for event in canvas.take_events() {
            log::info!("Step {}: {:?}", index, event);
        }
    }

    records_to_json(&records_from_shapes(canvas.shapes()))
}

fn load_script(path: &str) -> Result<Script> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: labelcanvas-replay <script.json>");
        return ExitCode::FAILURE;
    };

    let script = match load_script(&path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Failed to load script {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(script.config.log_level.to_level_filter())
        .parse_default_env()
        .init();
    log::info!("Replaying {} steps from {}", script.steps.len(), path);

    match replay(script) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay failed: {}", e);
            eprintln!("Replay error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelcanvas::model::records_from_json;

    fn run(json: &str) -> Vec<ShapeRecord> {
        let script: Script = serde_json::from_str(json).unwrap();
        records_from_json(&replay(script).unwrap()).unwrap()
    }

    #[test]
    fn test_replay_draws_rectangle() {
        let records = run(
            r#"{
                "image": {"width": 100, "height": 100},
                "steps": [
                    {"action": "set_mode", "edit": false, "kind": "rectangle"},
                    {"action": "press", "x": 10, "y": 10},
                    {"action": "release", "x": 10, "y": 10},
                    {"action": "move", "x": 40, "y": 30},
                    {"action": "press", "x": 40, "y": 30},
                    {"action": "release", "x": 40, "y": 30}
                ]
            }"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].shape_type, "rectangle");
        assert_eq!(records[0].points, vec![[10.0, 10.0], [40.0, 30.0]]);
    }

    #[test]
    fn test_replay_edits_loaded_shapes() {
        let records = run(
            r#"{
                "image": {"width": 100, "height": 100},
                "shapes": [
                    {"label": "a", "points": [[10, 10], [30, 30]], "shape_type": "rectangle"},
                    {"label": "b", "points": [[60, 60], [80, 80]], "shape_type": "rectangle"}
                ],
                "steps": [
                    {"action": "press", "x": 20, "y": 20},
                    {"action": "release", "x": 20, "y": 20},
                    {"action": "key_press", "key": "right"},
                    {"action": "key_release", "key": "right"},
                    {"action": "press", "x": 70, "y": 70, "modifiers": {"ctrl": true}},
                    {"action": "release", "x": 70, "y": 70},
                    {"action": "delete_selected"},
                    {"action": "undo"}
                ]
            }"#,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].points, vec![[15.0, 10.0], [35.0, 30.0]]);
        assert_eq!(records[1].label, "b");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let script: Script = serde_json::from_str(
            r#"{"config": {"num_backups": 0}, "image": {"width": 10, "height": 10}}"#,
        )
        .unwrap();
        assert!(replay(script).is_err());
    }
}
