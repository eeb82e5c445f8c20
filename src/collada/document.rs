//! Serialized source document and its replay into a [`DocumentHandler`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::*;
use crate::util::{Error, Result};

/// A complete source document, as a parser would deliver it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub asset: Option<FileInfo>,
    pub images: Vec<Image>,
    pub effects: Vec<Effect>,
    pub materials: Vec<Material>,
    pub geometries: Vec<Geometry>,
    pub cameras: Vec<Camera>,
    pub lights: Vec<Light>,
    pub skin_controller_data: Vec<SkinControllerData>,
    pub controllers: Vec<Controller>,
    pub animations: Vec<Animation>,
    pub library_nodes: Vec<LibraryNodes>,
    pub visual_scenes: Vec<VisualScene>,
    pub scene: Option<Scene>,
    pub animation_lists: Vec<AnimationList>,
    pub formulas: Option<Formulas>,
    pub kinematics_scene: Option<KinematicsScene>,
}

/// Per-object failures collected during a replay.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Number of objects delivered.
    pub delivered: usize,
    /// Object label and the error its callback returned.
    pub failures: Vec<(String, Error)>,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path.as_ref())?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Deliver every object to `handler`, dependencies first.
    ///
    /// A failing object is recorded in the report and the replay goes on.
    /// Cancellation and failures of `start`/`finish` end the replay.
    pub fn replay<H: DocumentHandler + ?Sized>(&self, handler: &mut H) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();
        handler.start()?;

        if let Some(asset) = &self.asset {
            deliver(&mut report, "asset".to_string(), handler.write_global_asset(asset))?;
        }
        for image in &self.images {
            deliver(&mut report, image.unique_id.to_string(), handler.write_image(image))?;
        }
        for effect in &self.effects {
            deliver(&mut report, effect.unique_id.to_string(), handler.write_effect(effect))?;
        }
        for material in &self.materials {
            let result = handler.write_material(material);
            deliver(&mut report, material.unique_id.to_string(), result)?;
        }
        for geometry in &self.geometries {
            let result = handler.write_geometry(geometry);
            deliver(&mut report, geometry.unique_id().to_string(), result)?;
        }
        for camera in &self.cameras {
            deliver(&mut report, camera.unique_id.to_string(), handler.write_camera(camera))?;
        }
        for light in &self.lights {
            deliver(&mut report, light.unique_id.to_string(), handler.write_light(light))?;
        }
        for data in &self.skin_controller_data {
            let result = handler.write_skin_controller_data(data);
            deliver(&mut report, data.unique_id.to_string(), result)?;
        }
        for controller in &self.controllers {
            let result = handler.write_controller(controller);
            deliver(&mut report, controller.unique_id.to_string(), result)?;
        }
        for animation in &self.animations {
            let result = handler.write_animation(animation);
            deliver(&mut report, animation.unique_id().to_string(), result)?;
        }
        for (i, library) in self.library_nodes.iter().enumerate() {
            let result = handler.write_library_nodes(library);
            deliver(&mut report, format!("library_nodes[{i}]"), result)?;
        }
        for visual_scene in &self.visual_scenes {
            let result = handler.write_visual_scene(visual_scene);
            deliver(&mut report, visual_scene.unique_id.to_string(), result)?;
        }
        if let Some(scene) = &self.scene {
            deliver(&mut report, "scene".to_string(), handler.write_scene(scene))?;
        }
        for list in &self.animation_lists {
            let result = handler.write_animation_list(list);
            deliver(&mut report, list.unique_id.to_string(), result)?;
        }
        if let Some(formulas) = &self.formulas {
            deliver(&mut report, "formulas".to_string(), handler.write_formulas(formulas))?;
        }
        if let Some(kinematics) = &self.kinematics_scene {
            let result = handler.write_kinematics_scene(kinematics);
            deliver(&mut report, "kinematics_scene".to_string(), result)?;
        }

        handler.finish()?;
        debug!(
            delivered = report.delivered,
            failed = report.failures.len(),
            "document replayed"
        );
        Ok(report)
    }
}

fn deliver(report: &mut ReplayReport, label: String, result: Result<()>) -> Result<()> {
    report.delivered += 1;
    match result {
        Ok(()) => Ok(()),
        Err(err @ Error::Cancelled(_)) => Err(err),
        Err(err) => {
            warn!("{label}: {err}");
            report.failures.push((label, err));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the order objects arrive in.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_geometry: bool,
    }

    impl DocumentHandler for Recorder {
        fn start(&mut self) -> Result<()> {
            self.calls.push("start");
            Ok(())
        }
        fn finish(&mut self) -> Result<()> {
            self.calls.push("finish");
            Ok(())
        }
        fn cancel(&mut self, _message: &str) {
            self.calls.push("cancel");
        }
        fn write_global_asset(&mut self, _: &FileInfo) -> Result<()> {
            self.calls.push("asset");
            Ok(())
        }
        fn write_scene(&mut self, _: &Scene) -> Result<()> {
            self.calls.push("scene");
            Ok(())
        }
        fn write_visual_scene(&mut self, _: &VisualScene) -> Result<()> {
            self.calls.push("visual_scene");
            Ok(())
        }
        fn write_library_nodes(&mut self, _: &LibraryNodes) -> Result<()> {
            self.calls.push("library_nodes");
            Ok(())
        }
        fn write_geometry(&mut self, _: &Geometry) -> Result<()> {
            self.calls.push("geometry");
            if self.fail_geometry {
                return Err(Error::unsupported("test geometry"));
            }
            Ok(())
        }
        fn write_material(&mut self, _: &Material) -> Result<()> {
            self.calls.push("material");
            Ok(())
        }
        fn write_effect(&mut self, _: &Effect) -> Result<()> {
            self.calls.push("effect");
            Ok(())
        }
        fn write_image(&mut self, _: &Image) -> Result<()> {
            self.calls.push("image");
            Ok(())
        }
        fn write_animation(&mut self, _: &Animation) -> Result<()> {
            self.calls.push("animation");
            Ok(())
        }
        fn write_animation_list(&mut self, _: &AnimationList) -> Result<()> {
            self.calls.push("animation_list");
            Ok(())
        }
    }

    fn sample_document() -> Document {
        let json = r#"{
            "asset": {"authoring_tool": "test"},
            "geometries": [{
                "type": "mesh",
                "unique_id": {"class": "mesh", "object_id": 1},
                "positions": {"values": {"type": "float", "values": [0, 0, 0]}}
            }],
            "animations": [{
                "type": "curve",
                "unique_id": {"class": "animation", "object_id": 2},
                "input_values": {"type": "float", "values": [0]},
                "output_values": {"type": "float", "values": [1]}
            }],
            "visual_scenes": [{"unique_id": {"class": "visual_scene", "object_id": 3}}],
            "animation_lists": [{"unique_id": {"class": "animation_list", "object_id": 4}}]
        }"#;
        Document::from_json(json).unwrap()
    }

    #[test]
    fn test_replay_order() {
        let mut recorder = Recorder::default();
        let report = sample_document().replay(&mut recorder).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.delivered, 5);
        assert_eq!(
            recorder.calls,
            [
                "start",
                "asset",
                "geometry",
                "animation",
                "visual_scene",
                "animation_list",
                "finish"
            ]
        );
    }

    #[test]
    fn test_replay_collects_failures() {
        let mut recorder = Recorder { fail_geometry: true, ..Default::default() };
        let report = sample_document().replay(&mut recorder).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].0.starts_with("mesh:"));
        // Later objects are still delivered.
        assert_eq!(recorder.calls.last(), Some(&"finish"));
    }
}
