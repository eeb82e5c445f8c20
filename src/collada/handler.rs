//! Callback interface a source document is delivered through.

use super::*;
use crate::util::Result;

/// Receiver of source objects, one call per discovered object.
///
/// Calls arrive in document order. Order is only guaranteed within one
/// category of object; implementations relying on cross-category order
/// (animation lists after their curves and nodes) must report missing
/// references as errors.
///
/// Objects the writer accepts without output have default
/// implementations that succeed.
pub trait DocumentHandler {
    /// Begin a conversion run.
    fn start(&mut self) -> Result<()>;

    /// End the conversion run.
    fn finish(&mut self) -> Result<()>;

    /// Abort the run, discarding all output.
    fn cancel(&mut self, message: &str);

    fn write_global_asset(&mut self, asset: &FileInfo) -> Result<()>;

    fn write_scene(&mut self, scene: &Scene) -> Result<()>;

    fn write_visual_scene(&mut self, visual_scene: &VisualScene) -> Result<()>;

    fn write_library_nodes(&mut self, library_nodes: &LibraryNodes) -> Result<()>;

    fn write_geometry(&mut self, geometry: &Geometry) -> Result<()>;

    fn write_material(&mut self, material: &Material) -> Result<()>;

    fn write_effect(&mut self, effect: &Effect) -> Result<()>;

    fn write_image(&mut self, image: &Image) -> Result<()>;

    fn write_animation(&mut self, animation: &Animation) -> Result<()>;

    fn write_animation_list(&mut self, animation_list: &AnimationList) -> Result<()>;

    fn write_camera(&mut self, _camera: &Camera) -> Result<()> {
        Ok(())
    }

    fn write_light(&mut self, _light: &Light) -> Result<()> {
        Ok(())
    }

    fn write_skin_controller_data(&mut self, _data: &SkinControllerData) -> Result<()> {
        Ok(())
    }

    fn write_controller(&mut self, _controller: &Controller) -> Result<()> {
        Ok(())
    }

    fn write_formulas(&mut self, _formulas: &Formulas) -> Result<()> {
        Ok(())
    }

    fn write_kinematics_scene(&mut self, _scene: &KinematicsScene) -> Result<()> {
        Ok(())
    }
}
