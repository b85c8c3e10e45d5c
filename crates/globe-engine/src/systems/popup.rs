use glam::{Vec2, Vec3};
use serde::Serialize;
use crate::api::types::{AttackEvent, AttackId};
use crate::core::geo::{self, GeoCoord};
use crate::core::spin::GlobeSpin;
use crate::renderer::camera::CameraState;

/// The attack detail popup and where it sits on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopupState {
    pub visible: bool,
    pub event: Option<AttackEvent>,
    /// Pixel position of the target, or `None` when it is behind the camera.
    pub screen: Option<Vec2>,
    /// Target point in the globe frame.
    #[serde(skip)]
    anchor: Vec3,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `event`, replacing whatever was displayed.
    pub fn show(&mut self, event: &AttackEvent, radius: f32) {
        self.anchor = geo::to_sphere(GeoCoord::new(event.target.latitude, event.target.longitude), radius);
        self.event = Some(event.clone());
        self.visible = true;
        self.screen = None;
    }

    pub fn current(&self) -> Option<AttackId> {
        self.event.as_ref().filter(|_| self.visible).map(|e| e.id)
    }

    /// Hide the popup only if it still shows `id`. A timer that fires after
    /// the popup switched to another attack is ignored.
    pub fn dismiss(&mut self, id: AttackId) -> bool {
        if self.current() == Some(id) {
            self.visible = false;
            self.screen = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recompute the screen position from the current camera and spin.
    pub fn project(&mut self, camera: &CameraState, spin: &GlobeSpin) {
        if !self.visible {
            return;
        }
        self.screen = camera.project_to_screen(spin.compensate(self.anchor));
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::CameraSection;
    use crate::api::types::{AttackCategory, Endpoint};

    fn event(id: u64, lat: f32, lng: f32) -> AttackEvent {
        AttackEvent::new(
            AttackId(id),
            Endpoint::new("CN", 35.86, 104.19),
            Endpoint::new("XX", lat, lng),
            AttackCategory::Malware,
            8,
            0.0,
        )
    }

    #[test]
    fn stale_dismissal_is_ignored() {
        let mut popup = PopupState::new();
        popup.show(&event(1, 0.0, 0.0), 100.0);
        popup.show(&event(2, 0.0, 0.0), 100.0);
        assert!(!popup.dismiss(AttackId(1)));
        assert!(popup.visible);
        assert!(popup.dismiss(AttackId(2)));
        assert!(!popup.visible);
    }

    #[test]
    fn facing_target_projects_near_centre() {
        // (lat 0, lng -90) lands on +Z, straight in front of the default camera.
        let mut popup = PopupState::new();
        popup.show(&event(1, 0.0, -90.0), 100.0);
        let mut cam = CameraState::new(&CameraSection::default());
        cam.resize(1000.0, 800.0);
        popup.project(&cam, &GlobeSpin::new(0.0));
        let s = popup.screen.unwrap();
        assert!((s - Vec2::new(500.0, 400.0)).length() < 1.0, "screen {:?}", s);
    }

    #[test]
    fn hidden_popup_is_not_projected() {
        let mut popup = PopupState::new();
        let cam = CameraState::new(&CameraSection::default());
        popup.project(&cam, &GlobeSpin::new(0.0));
        assert!(popup.screen.is_none());
        assert!(popup.to_json().contains("\"visible\":false"));
    }
}
