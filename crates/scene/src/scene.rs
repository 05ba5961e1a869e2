use earthview_common::{Rgb, Transform};
use earthview_input::{Action, ModelOrientation};
use glam::{Mat4, Quat, Vec3};

/// Where the model lands when it finishes loading.
pub const MODEL_PLACEMENT: Transform = Transform {
    position: Vec3::new(1.0, 0.0, 0.0),
    rotation: Quat::IDENTITY,
    scale: Vec3::splat(2.0),
};

/// Perspective camera fixed in place, looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 5.0),
            fov_y: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraRig {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Parallel light shining from `from` toward the origin. `from` is unit length.
    Directional { from: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub name: &'static str,
    pub kind: LightKind,
    pub color: Rgb,
    pub intensity: f32,
}

impl Light {
    pub fn ambient(name: &'static str, color: Rgb, intensity: f32) -> Self {
        Self {
            name,
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    pub fn directional(name: &'static str, from: Vec3, color: Rgb, intensity: f32) -> Self {
        Self {
            name,
            kind: LightKind::Directional {
                from: from.normalize_or(Vec3::Y),
            },
            color,
            intensity,
        }
    }

    /// Soft ambient fill plus a top light and a front light.
    pub fn default_rig() -> Vec<Light> {
        vec![
            Light::ambient("ambient", Rgb::from_hex(0x404040), 1.0),
            Light::directional("top", Vec3::new(0.0, 2.0, 0.0), Rgb::WHITE, 4.0),
            Light::directional("front", Vec3::new(0.0, 5.0, 10.0), Rgb::WHITE, 4.0),
        ]
    }
}

/// State of the single model the scene displays.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSlot {
    /// Load not finished yet.
    Pending,
    Loaded {
        name: String,
        transform: Transform,
        /// Drag angles the rotation was built from.
        orientation: ModelOrientation,
    },
    /// Load failed; the scene renders without a model.
    Failed { reason: String },
}

impl ModelSlot {
    pub fn transform(&self) -> Option<&Transform> {
        match self {
            Self::Loaded { transform, .. } => Some(transform),
            _ => None,
        }
    }

    pub fn orientation(&self) -> Option<ModelOrientation> {
        match self {
            Self::Loaded { orientation, .. } => Some(*orientation),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPlacement {
    Hidden,
    Revealed,
}

impl CaptionPlacement {
    /// Left edge of the panel as a fraction of the viewport width.
    pub fn left_fraction(self) -> f32 {
        match self {
            Self::Hidden => -1.0,
            Self::Revealed => 0.1,
        }
    }
}

/// Text panel that slides in once the page is scrolled far enough.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionPanel {
    pub text: String,
    pub placement: CaptionPlacement,
}

impl CaptionPanel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placement: CaptionPlacement::Hidden,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.placement == CaptionPlacement::Revealed
    }
}

/// Everything the renderer and overlay draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: CameraRig,
    pub lights: Vec<Light>,
    pub model: ModelSlot,
    pub caption: CaptionPanel,
}

impl Scene {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            camera: CameraRig::default(),
            lights: Light::default_rig(),
            model: ModelSlot::Pending,
            caption: CaptionPanel::new(caption),
        }
    }

    /// Put the model in the slot at its load placement, facing `orientation`.
    pub fn attach_model(&mut self, name: impl Into<String>, orientation: ModelOrientation) {
        let transform =
            MODEL_PLACEMENT.with_euler_xyz(orientation.rotation_x, orientation.rotation_y, 0.0);
        self.model = ModelSlot::Loaded {
            name: name.into(),
            transform,
            orientation,
        };
    }

    pub fn fail_model(&mut self, reason: impl Into<String>) {
        self.model = ModelSlot::Failed {
            reason: reason.into(),
        };
    }

    /// Apply one mapped action. Model changes are dropped while no model is loaded.
    pub fn apply(&mut self, action: &Action) {
        match *action {
            Action::Orient(o) => {
                if let ModelSlot::Loaded {
                    transform,
                    orientation,
                    ..
                } = &mut self.model
                {
                    *transform = transform.with_euler_xyz(o.rotation_x, o.rotation_y, 0.0);
                    *orientation = o;
                }
            }
            Action::Shift {
                offset,
                text_visible,
            } => {
                if let ModelSlot::Loaded { transform, .. } = &mut self.model {
                    transform.position.x = offset;
                }
                self.caption.placement = if text_visible {
                    CaptionPlacement::Revealed
                } else {
                    CaptionPlacement::Hidden
                };
            }
            Action::SetAspect(aspect) => {
                self.camera.aspect = aspect;
            }
            Action::Noop => {}
        }
    }
}
