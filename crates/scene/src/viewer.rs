use crate::config::ViewerConfig;
use crate::scene::Scene;
use earthview_input::{Action, InputConfig, InputError, InputEvent, InteractionState};
use std::fmt::Display;

/// The single owner of interaction and scene state.
///
/// Front ends translate host events into [`InputEvent`]s and hand them here
/// one at a time. Nothing else mutates either state.
pub struct Viewer {
    state: InteractionState,
    scene: Scene,
    input: InputConfig,
    max_scroll: f32,
}

impl Viewer {
    pub fn new(config: &ViewerConfig, width: u32, height: u32) -> Result<Self, InputError> {
        let state = InteractionState::with_viewport(width, height)?;
        let mut scene = Scene::new(config.caption.clone());
        scene.camera.aspect = state.aspect;
        Ok(Self {
            state,
            scene,
            input: config.input,
            max_scroll: config.max_scroll.max(0.0),
        })
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Dispatch one event and apply the resulting action to the scene.
    ///
    /// On error the state is left untouched.
    pub fn handle(&mut self, event: InputEvent) -> Result<Action, InputError> {
        if let InputEvent::PointerMove { position } = event {
            if !self.scene.model.is_loaded() {
                self.state = self.state.track_pointer(position);
                return Ok(Action::Noop);
            }
        }

        let transition = self.state.dispatch(&event, &self.input)?;
        self.state = transition.state;
        self.scene.apply(&transition.action);
        Ok(transition.action)
    }

    /// Scroll by a pixel delta, keeping the offset within `[0, max_scroll]`.
    pub fn scroll_by(&mut self, delta: f32) -> Result<Action, InputError> {
        let offset_y = (self.state.scroll.scroll_value + delta).clamp(0.0, self.max_scroll);
        self.handle(InputEvent::Scroll { offset_y })
    }

    pub fn attach_model(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::info!(%name, "model attached");
        self.scene.attach_model(name, self.state.orientation);
    }

    pub fn model_failed(&mut self, error: &impl Display) {
        tracing::error!("model failed to load: {error}");
        self.scene.fail_model(error.to_string());
    }
}
