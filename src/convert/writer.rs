//! The glTF writer: a [`DocumentHandler`] accumulating a target [`Asset`].

use tracing::{debug, trace, warn};

use crate::collada::{
    Animation, AnimationList, Camera, Controller, DocumentHandler, Effect, FileInfo, Formulas,
    Geometry, Image, KinematicsScene, LibraryNodes, Light, Material, Scene, SkinControllerData,
    VisualScene,
};
use crate::gltf::{self, Asset};
use crate::util::{Error, Result};

use super::animation::{bind_animation_list, build_sampler};
use super::context::ConversionContext;
use super::material::{build_image, build_material};
use super::mesh::build_mesh;
use super::node::build_nodes;
use super::Options;

/// Lifecycle of a conversion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WriterState {
    #[default]
    Idle,
    Running,
    Finished,
    /// Aborted with a message. Terminal.
    Cancelled(String),
}

/// Converts source objects into a glTF asset as they are delivered.
///
/// Call [`start`](DocumentHandler::start), deliver objects, then
/// [`finish`](DocumentHandler::finish) and take the result with
/// [`into_asset`](Self::into_asset).
#[derive(Debug, Default)]
pub struct GltfWriter {
    options: Options,
    state: WriterState,
    asset: Asset,
    context: ConversionContext,
}

impl GltfWriter {
    pub fn new(options: Options) -> Self {
        Self { options, ..Default::default() }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn state(&self) -> &WriterState {
        &self.state
    }

    /// The asset built so far.
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    /// Take the finished asset.
    pub fn into_asset(self) -> Result<Asset> {
        match self.state {
            WriterState::Finished => Ok(self.asset),
            WriterState::Cancelled(message) => Err(Error::Cancelled(message)),
            state => Err(Error::InvalidState(format!("conversion not finished ({state:?})"))),
        }
    }

    fn ensure_running(&self) -> Result<()> {
        match &self.state {
            WriterState::Running => Ok(()),
            WriterState::Cancelled(message) => Err(Error::Cancelled(message.clone())),
            state => Err(Error::InvalidState(format!("no conversion running ({state:?})"))),
        }
    }
}

impl DocumentHandler for GltfWriter {
    fn start(&mut self) -> Result<()> {
        match &self.state {
            WriterState::Running => {
                return Err(Error::InvalidState("conversion already running".to_string()))
            }
            WriterState::Cancelled(message) => return Err(Error::Cancelled(message.clone())),
            WriterState::Idle | WriterState::Finished => {}
        }
        self.asset = Asset::new();
        self.context = ConversionContext::new();
        self.state = WriterState::Running;
        debug!(embedded = self.options.embedded, "conversion started");
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.ensure_running()?;
        self.context.clear();
        self.state = WriterState::Finished;
        debug!(
            nodes = self.asset.nodes.len(),
            meshes = self.asset.meshes.len(),
            animations = self.asset.animations.len(),
            "conversion finished"
        );
        Ok(())
    }

    fn cancel(&mut self, message: &str) {
        warn!("conversion cancelled: {message}");
        self.asset = Asset::new();
        self.context.clear();
        self.state = WriterState::Cancelled(message.to_string());
    }

    fn write_global_asset(&mut self, asset: &FileInfo) -> Result<()> {
        self.ensure_running()?;
        let info = &mut self.asset.info;
        info.copyright = asset.copyright.clone();
        info.authoring_tool = asset.authoring_tool.clone();
        Ok(())
    }

    fn write_scene(&mut self, scene: &Scene) -> Result<()> {
        self.ensure_running()?;
        trace!(visual_scene = ?scene.instance_visual_scene, "scene accepted");
        Ok(())
    }

    fn write_visual_scene(&mut self, visual_scene: &VisualScene) -> Result<()> {
        self.ensure_running()?;
        let roots = build_nodes(&mut self.asset, &mut self.context, &visual_scene.root_nodes);
        let scene = if self.asset.default_scene.is_some() {
            let index = self.asset.add_scene(gltf::Scene::default());
            &mut self.asset.scenes[index]
        } else {
            self.asset.default_scene_mut()
        };
        scene.name = visual_scene.name.clone();
        scene.nodes.extend(roots);
        Ok(())
    }

    fn write_library_nodes(&mut self, library_nodes: &LibraryNodes) -> Result<()> {
        self.ensure_running()?;
        let roots = build_nodes(&mut self.asset, &mut self.context, &library_nodes.nodes);
        self.asset.default_scene_mut().nodes.extend(roots);
        Ok(())
    }

    fn write_geometry(&mut self, geometry: &Geometry) -> Result<()> {
        self.ensure_running()?;
        match geometry {
            Geometry::Mesh(source) => {
                let mesh = build_mesh(&mut self.asset, source);
                if mesh.primitives.is_empty() {
                    warn!(geometry = %source.unique_id, "mesh has no convertible primitives, skipped");
                    return Ok(());
                }
                let index = self.asset.add_mesh(mesh);
                self.context.meshes.insert(source.unique_id, index);
            }
            other => warn!(geometry = %other.unique_id(), "only meshes are converted, geometry skipped"),
        }
        Ok(())
    }

    fn write_material(&mut self, material: &Material) -> Result<()> {
        self.ensure_running()?;
        self.context.material_effects.insert(material.unique_id, material.instantiated_effect);
        Ok(())
    }

    fn write_effect(&mut self, effect: &Effect) -> Result<()> {
        self.ensure_running()?;
        if let Some(material) = build_material(&mut self.asset, &self.context, effect) {
            let index = self.asset.add_material(material);
            self.context.effect_materials.insert(effect.unique_id, index);
        }
        Ok(())
    }

    fn write_image(&mut self, image: &Image) -> Result<()> {
        self.ensure_running()?;
        let converted = build_image(&self.options, image)?;
        let index = self.asset.add_image(converted);
        self.context.images.insert(image.unique_id, index);
        Ok(())
    }

    fn write_animation(&mut self, animation: &Animation) -> Result<()> {
        self.ensure_running()?;
        match animation {
            Animation::Curve(curve) => match build_sampler(&mut self.asset, curve) {
                Ok(sampler) => {
                    self.context.samplers.insert(curve.unique_id, sampler);
                }
                Err(e) if e.is_skippable() => warn!(animation = %curve.unique_id, "curve skipped: {e}"),
                Err(e) => return Err(e),
            },
            Animation::Formula { unique_id, .. } => {
                warn!(animation = %unique_id, "formula animations are not converted")
            }
        }
        Ok(())
    }

    fn write_animation_list(&mut self, animation_list: &AnimationList) -> Result<()> {
        self.ensure_running()?;
        bind_animation_list(&mut self.asset, &self.context, animation_list)
    }

    fn write_camera(&mut self, camera: &Camera) -> Result<()> {
        self.ensure_running()?;
        trace!(camera = %camera.unique_id, "camera accepted");
        Ok(())
    }

    fn write_light(&mut self, light: &Light) -> Result<()> {
        self.ensure_running()?;
        trace!(light = %light.unique_id, "light accepted");
        Ok(())
    }

    fn write_skin_controller_data(&mut self, data: &SkinControllerData) -> Result<()> {
        self.ensure_running()?;
        trace!(skin = %data.unique_id, "skin controller data accepted");
        Ok(())
    }

    fn write_controller(&mut self, controller: &Controller) -> Result<()> {
        self.ensure_running()?;
        trace!(controller = %controller.unique_id, "controller accepted");
        Ok(())
    }

    fn write_formulas(&mut self, _formulas: &Formulas) -> Result<()> {
        self.ensure_running()?;
        trace!("formulas accepted");
        Ok(())
    }

    fn write_kinematics_scene(&mut self, _scene: &KinematicsScene) -> Result<()> {
        self.ensure_running()?;
        trace!("kinematics scene accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collada::{ClassId, UniqueId};

    #[test]
    fn test_calls_require_start() {
        let mut writer = GltfWriter::default();
        let err = writer.write_scene(&Scene::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(writer.finish().is_err());
    }

    #[test]
    fn test_lifecycle() {
        let mut writer = GltfWriter::new(Options::default());
        writer.start().unwrap();
        assert!(writer.start().is_err());
        writer
            .write_global_asset(&FileInfo {
                copyright: Some("(c) test".into()),
                authoring_tool: Some("modeler".into()),
                ..Default::default()
            })
            .unwrap();
        writer.finish().unwrap();
        assert!(writer.context().is_empty());
        let asset = writer.into_asset().unwrap();
        assert_eq!(asset.info.copyright.as_deref(), Some("(c) test"));
        assert_eq!(asset.info.authoring_tool.as_deref(), Some("modeler"));
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut writer = GltfWriter::default();
        writer.start().unwrap();
        writer
            .write_visual_scene(&VisualScene {
                unique_id: UniqueId::new(ClassId::VisualScene, 1),
                original_id: "scene".into(),
                name: "scene".into(),
                root_nodes: vec![crate::collada::Node::new(UniqueId::new(ClassId::Node, 2), "n")],
            })
            .unwrap();
        writer.cancel("user abort");

        assert!(writer.asset().nodes.is_empty());
        assert!(matches!(writer.write_scene(&Scene::default()), Err(Error::Cancelled(_))));
        assert!(matches!(writer.start(), Err(Error::Cancelled(_))));
        assert!(matches!(writer.into_asset(), Err(Error::Cancelled(m)) if m == "user abort"));
    }

    #[test]
    fn test_visual_scenes() {
        let mut writer = GltfWriter::default();
        writer.start().unwrap();
        for n in 0..2 {
            writer
                .write_visual_scene(&VisualScene {
                    unique_id: UniqueId::new(ClassId::VisualScene, n),
                    original_id: format!("vs{n}"),
                    name: format!("vs{n}"),
                    root_nodes: vec![crate::collada::Node::new(UniqueId::new(ClassId::Node, n), "n")],
                })
                .unwrap();
        }
        writer
            .write_library_nodes(&LibraryNodes {
                nodes: vec![crate::collada::Node::new(UniqueId::new(ClassId::Node, 9), "lib")],
            })
            .unwrap();
        writer.finish().unwrap();
        let asset = writer.into_asset().unwrap();
        assert_eq!(asset.scenes.len(), 2);
        assert_eq!(asset.default_scene, Some(0));
        assert_eq!(asset.scenes[0].name, "vs0");
        assert_eq!(asset.scenes[0].nodes.len(), 2);
        assert_eq!(asset.scenes[1].nodes.len(), 1);
    }

    #[test]
    fn test_non_mesh_geometry_skipped() {
        let mut writer = GltfWriter::default();
        writer.start().unwrap();
        writer
            .write_geometry(&Geometry::Spline { unique_id: UniqueId::new(ClassId::Mesh, 1) })
            .unwrap();
        assert!(writer.asset().meshes.is_empty());
    }

    #[test]
    fn test_mesh_without_primitives_skipped() {
        use crate::collada::{MeshPrimitive, MeshVertexData, PrimitiveType};

        let mut writer = GltfWriter::default();
        writer.start().unwrap();
        let mut mesh = crate::collada::Mesh::new(
            UniqueId::new(ClassId::Mesh, 1),
            "undrawable",
            MeshVertexData::floats(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
        );
        mesh.primitives.push(MeshPrimitive::new(PrimitiveType::Undefined, vec![0, 1, 2]));
        writer.write_geometry(&Geometry::Mesh(mesh)).unwrap();

        assert!(writer.asset().meshes.is_empty());
        assert!(writer.context().meshes.is_empty());

        let node = crate::collada::Node::new(UniqueId::new(ClassId::Node, 1), "holder")
            .with_geometry(crate::collada::InstanceGeometry::new(UniqueId::new(ClassId::Mesh, 1)));
        writer
            .write_visual_scene(&VisualScene {
                unique_id: UniqueId::new(ClassId::VisualScene, 1),
                original_id: "scene".into(),
                name: "scene".into(),
                root_nodes: vec![node],
            })
            .unwrap();
        assert!(writer.asset().nodes[0].meshes.is_empty());
    }
}
