use crate::{Cursor, CursorTarget, Effect, Msg, PanelState, Surface};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            state.mark_dirty();
            state.mount_effects()
        }
        Msg::Press { surface, x, y } => {
            // A press while another gesture is open replaces it; the release was lost.
            let mut effects = state
                .end_gesture()
                .map(|lost| clear_feedback(lost.surface))
                .unwrap_or_default();
            if !state.begin_gesture(surface, x, y) {
                return (state, effects);
            }
            match surface {
                Surface::ResizeHandle => effects.extend([
                    Effect::SetResizing { active: true },
                    Effect::SetCursor {
                        target: CursorTarget::Body,
                        cursor: Some(Cursor::ColResize),
                    },
                ]),
                Surface::Toggle => effects.push(Effect::SetCursor {
                    target: CursorTarget::Toggle,
                    cursor: Some(Cursor::Grabbing),
                }),
            }
            effects
        }
        Msg::Move { x, y } => state.track_pointer(x, y),
        Msg::Release { x, y } => {
            // The release position counts as a final move, so a press-jump-release
            // without intermediate moves is still judged by its displacement.
            let mut effects = state.track_pointer(x, y);
            let Some(gesture) = state.end_gesture() else {
                return (state, effects);
            };
            effects.extend(clear_feedback(gesture.surface));
            if !gesture.dragging {
                let toggled = match gesture.surface {
                    Surface::ResizeHandle => state.collapse(),
                    Surface::Toggle => state.expand(),
                };
                effects.extend(toggled);
            }
            effects
        }
        Msg::ViewportResized { height_px } => state.resize_viewport(height_px),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Effects undoing the press feedback of a finished or abandoned gesture.
fn clear_feedback(surface: Surface) -> Vec<Effect> {
    match surface {
        Surface::ResizeHandle => vec![
            Effect::SetResizing { active: false },
            Effect::SetCursor {
                target: CursorTarget::Body,
                cursor: None,
            },
        ],
        Surface::Toggle => vec![Effect::SetCursor {
            target: CursorTarget::Toggle,
            cursor: None,
        }],
    }
}
