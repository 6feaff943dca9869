//=========================================================================
// Hand Controllers
//=========================================================================
//
// Two tracked hand controllers sharing one controller model. The first
// hand keeps the loaded model, the second gets its own clone so each
// trigger can move independently.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetRegistry, ModelNode, ModelScene};

//=== Constants ===========================================================

/// Node in the controller model that animates on select.
pub const TRIGGER_NODE: &str = "trigger";

/// Trigger rotation (radians about X) while select is held.
const TRIGGER_PRESSED_ANGLE: f32 = -0.3;

//=== Hand ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Primary,
    Secondary,
}

impl Hand {
    fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

//=== HandController ======================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandController {
    model: Option<ModelScene>,
    texture: Option<String>,
    trigger_angle: f32,
    selecting: bool,
}

impl HandController {
    pub fn model(&self) -> Option<&ModelScene> {
        self.model.as_ref()
    }

    /// Asset name of the controller texture.
    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    pub fn trigger_node(&self) -> Option<&ModelNode> {
        self.model.as_ref()?.object_by_name(TRIGGER_NODE)
    }

    /// Current trigger rotation about X, in radians.
    pub fn trigger_angle(&self) -> f32 {
        self.trigger_angle
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn select_start(&mut self) {
        self.selecting = true;
        self.trigger_angle = TRIGGER_PRESSED_ANGLE;
    }

    pub fn select_end(&mut self) {
        self.selecting = false;
        self.trigger_angle = 0.0;
    }
}

//=== ControllerRig =======================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerRig {
    hands: [HandController; 2],
}

impl ControllerRig {
    pub fn hand(&self, hand: Hand) -> &HandController {
        &self.hands[hand.index()]
    }

    pub fn hand_mut(&mut self, hand: Hand) -> &mut HandController {
        &mut self.hands[hand.index()]
    }

    /// Gives both hands the named controller model and texture.
    ///
    /// Returns `false` (and leaves the rig untouched) if the model is not
    /// in the registry. A missing texture only logs a warning.
    pub fn equip(&mut self, assets: &AssetRegistry, model: &str, texture: &str) -> bool {
        let Some(scene) = assets.model(model) else {
            warn!(target: "world", "Controller model `{}` is not loaded", model);
            return false;
        };

        if !assets.contains(texture) {
            warn!(target: "world", "Controller texture `{}` is not loaded", texture);
        }

        let [primary, secondary] = &mut self.hands;
        primary.model = Some(scene.clone());
        primary.texture = Some(texture.to_string());
        secondary.model = primary.model.clone();
        secondary.texture = Some(texture.to_string());

        if primary.trigger_node().is_none() {
            debug!(target: "world", "Controller model `{}` has no `{}` node", model, TRIGGER_NODE);
        }
        true
    }

    pub fn select_start(&mut self, hand: Hand) {
        self.hand_mut(hand).select_start();
    }

    pub fn select_end(&mut self, hand: Hand) {
        self.hand_mut(hand).select_end();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::LoadedAsset;

    const CONTROLLER: &str = r#"{
        "asset": { "version": "2.0" },
        "nodes": [ { "name": "body", "children": [1] }, { "name": "trigger" } ]
    }"#;

    fn registry() -> AssetRegistry {
        let mut registry = AssetRegistry::default();
        let model = ModelScene::from_gltf_json(CONTROLLER.as_bytes(), None).unwrap();
        registry.insert("controller".into(), LoadedAsset::Model(model));
        registry
    }

    #[test]
    fn trigger_rotates_on_select() {
        let mut rig = ControllerRig::default();

        rig.select_start(Hand::Secondary);
        assert_eq!(rig.hand(Hand::Secondary).trigger_angle(), -0.3);
        assert!(rig.hand(Hand::Secondary).is_selecting());
        assert_eq!(rig.hand(Hand::Primary).trigger_angle(), 0.0);

        rig.select_end(Hand::Secondary);
        assert_eq!(rig.hand(Hand::Secondary).trigger_angle(), 0.0);
    }

    #[test]
    fn equip_shares_model_across_hands() {
        let mut rig = ControllerRig::default();
        assert!(rig.equip(&registry(), "controller", "controller_tex"));

        for hand in [Hand::Primary, Hand::Secondary] {
            let controller = rig.hand(hand);
            assert!(controller.trigger_node().is_some());
            assert_eq!(controller.texture(), Some("controller_tex"));
        }
        assert_eq!(rig.hand(Hand::Primary).model(), rig.hand(Hand::Secondary).model());
    }

    #[test]
    fn equip_without_model_leaves_rig_empty() {
        let mut rig = ControllerRig::default();
        assert!(!rig.equip(&AssetRegistry::default(), "controller", "tex"));
        assert!(rig.hand(Hand::Primary).model().is_none());
    }
}
