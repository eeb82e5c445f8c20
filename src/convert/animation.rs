//! Animation builder: curves to samplers, animation lists to channels.
//!
//! A curve does not know what it drives, so its output is kept as a
//! provisional scalar accessor. Binding an animation list reshapes that
//! output for the animated node path and packs fresh per-channel samplers.

use tracing::{debug, warn};

use crate::collada::{AnimationBinding, AnimationClass, AnimationCurve, AnimationList, InterpolationType};
use crate::gltf::{
    Accessor, Animation, Asset, Channel, Interpolation, Path, Sampler, Target, Transform,
};
use crate::util::{mat4_from_row_major, AccessorType, DVec3, Error, Quat, Result, Vec3};

use super::context::ConversionContext;

fn map_interpolation(ty: InterpolationType) -> Interpolation {
    match ty {
        InterpolationType::Step => Interpolation::Step,
        _ => Interpolation::Linear,
    }
}

/// Convert a curve into a provisional sampler.
///
/// Key times are packed into the animation view. Key values stay in an
/// owned scalar accessor until a binding gives them a shape.
pub fn build_sampler(asset: &mut Asset, curve: &AnimationCurve) -> Result<Sampler> {
    let input = curve
        .input_values
        .to_f32_vec()
        .ok_or_else(|| Error::unsupported(format!("input encoding of curve {}", curve.original_id)))?;
    let output = curve
        .output_values
        .to_f32_vec()
        .ok_or_else(|| Error::unsupported(format!("output encoding of curve {}", curve.original_id)))?;

    let input = asset.pack(asset.animations_view(), AccessorType::Scalar, &input);
    let output = asset.add_accessor(Accessor::owned(AccessorType::Scalar, &output));
    Ok(Sampler {
        id: curve.original_id.clone(),
        input,
        output,
        interpolation: map_interpolation(curve.interpolation),
    })
}

/// A channel whose output values are computed but not packed yet.
struct PendingChannel {
    path: Path,
    sampler: Sampler,
    ty: AccessorType,
    values: Vec<f32>,
}

impl PendingChannel {
    fn new(path: Path, template: &Sampler, id: String, ty: AccessorType, values: Vec<f32>) -> Self {
        Self { path, sampler: Sampler { id, ..template.clone() }, ty, values }
    }
}

/// Bind an animation list to the node recorded for it.
///
/// Converts the node transform to TRS, reshapes every bound curve for its
/// animation class and appends one animation. A missing node or sampler
/// fails the whole list without changing the asset.
pub fn bind_animation_list(
    asset: &mut Asset,
    ctx: &ConversionContext,
    list: &AnimationList,
) -> Result<()> {
    let target = ctx
        .animated_nodes
        .get(&list.unique_id)
        .copied()
        .ok_or_else(|| Error::dangling("animated node", list.unique_id))?;
    let bindings = list
        .bindings
        .iter()
        .map(|binding| {
            ctx.samplers
                .get(&binding.animation)
                .map(|sampler| (binding, sampler))
                .ok_or_else(|| Error::dangling("animation sampler", binding.animation))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut transform = asset[target.node].transform;
    transform.ensure_trs();

    let mut pending: Vec<PendingChannel> = Vec::new();
    let mut suffixes: Vec<&'static str> = Vec::new();

    for (binding, sampler) in bindings {
        let values = asset.read_accessor(sampler.output);
        let input_count = asset[sampler.input].count;
        let stride = class_stride(binding.animation_class);
        if values.len() % stride != 0 {
            return Err(Error::InvalidAnimation(format!(
                "{} values in curve {} do not split into {:?} elements",
                values.len(),
                sampler.id,
                binding.animation_class
            )));
        }

        let Some(suffix) = reshape(binding, sampler, &values, &transform, target.rotation_axis, &mut pending)
        else {
            warn!(
                class = ?binding.animation_class,
                animation = %binding.animation,
                "animation class not supported, binding skipped"
            );
            continue;
        };
        suffixes.push(suffix);

        for channel in pending.iter().filter(|c| c.sampler.input == sampler.input) {
            let output_count = channel.values.len() / channel.ty.num_components();
            if output_count != input_count {
                return Err(Error::SampleCountMismatch { input: input_count, output: output_count });
            }
        }
    }

    asset[target.node].transform = transform;
    let mut animation = Animation::default();
    for channel in pending {
        let output = asset.pack(asset.animations_view(), channel.ty, &channel.values);
        animation.channels.push(Channel {
            target: Target { node: target.node, path: channel.path },
            sampler: Sampler { output, ..channel.sampler },
        });
    }

    let node = &mut asset[target.node];
    for suffix in suffixes {
        node.append_id_suffix(suffix);
    }
    animation.name = node.id.clone();

    if animation.channels.is_empty() {
        debug!(list = %list.unique_id, "animation list produced no channels");
        return Ok(());
    }
    debug!(
        node = %animation.name,
        channels = animation.channels.len(),
        "animation bound"
    );
    asset.animations.push(animation);
    Ok(())
}

/// Output values per key for an animation class.
fn class_stride(class: AnimationClass) -> usize {
    match class {
        AnimationClass::Matrix4x4 => 16,
        AnimationClass::AxisAngle => 4,
        AnimationClass::PositionXyz => 3,
        _ => 1,
    }
}

/// Reshape one binding's output values into pending channels, returning
/// the node id suffix, or `None` for an unsupported class.
fn reshape(
    binding: &AnimationBinding,
    sampler: &Sampler,
    values: &[f32],
    transform: &Transform,
    op_axis: Option<DVec3>,
    pending: &mut Vec<PendingChannel>,
) -> Option<&'static str> {
    let id = || sampler.id.clone();
    match binding.animation_class {
        AnimationClass::Matrix4x4 => {
            let count = values.len() / 16;
            let mut translation = Vec::with_capacity(count * 3);
            let mut rotation = Vec::with_capacity(count * 4);
            let mut scale = Vec::with_capacity(count * 3);
            for chunk in values.chunks_exact(16) {
                let mut rows = [0.0f32; 16];
                rows.copy_from_slice(chunk);
                let (s, r, t) = mat4_from_row_major(&rows).to_scale_rotation_translation();
                translation.extend_from_slice(&t.to_array());
                rotation.extend_from_slice(&r.to_array());
                scale.extend_from_slice(&s.to_array());
            }
            // A full matrix replaces whatever the list animated so far.
            pending.clear();
            pending.push(PendingChannel::new(
                Path::Translation,
                sampler,
                format!("{}_translation", sampler.id),
                AccessorType::Vec3,
                translation,
            ));
            pending.push(PendingChannel::new(
                Path::Rotation,
                sampler,
                format!("{}_rotation", sampler.id),
                AccessorType::Vec4,
                rotation,
            ));
            pending.push(PendingChannel::new(
                Path::Scale,
                sampler,
                format!("{}_scale", sampler.id),
                AccessorType::Vec3,
                scale,
            ));
            Some("_transform")
        }
        AnimationClass::PositionXyz => {
            pending.push(PendingChannel::new(
                Path::Translation,
                sampler,
                id(),
                AccessorType::Vec3,
                values.to_vec(),
            ));
            Some("_translate")
        }
        AnimationClass::PositionX | AnimationClass::PositionY | AnimationClass::PositionZ => {
            let axis = match binding.animation_class {
                AnimationClass::PositionX => 0,
                AnimationClass::PositionY => 1,
                _ => 2,
            };
            let padded = values
                .iter()
                .flat_map(|&v| {
                    let mut t = [0.0f32; 3];
                    t[axis] = v;
                    t
                })
                .collect();
            pending.push(PendingChannel::new(Path::Translation, sampler, id(), AccessorType::Vec3, padded));
            Some("_translate")
        }
        AnimationClass::AxisAngle => {
            pending.push(PendingChannel::new(
                Path::Rotation,
                sampler,
                id(),
                AccessorType::Vec4,
                values.to_vec(),
            ));
            Some("_rotate")
        }
        AnimationClass::Angle => {
            let axis = angle_axis(transform, op_axis);
            let rotations = values
                .iter()
                .flat_map(|&degrees| Quat::from_axis_angle(axis, degrees.to_radians()).to_array())
                .collect();
            pending.push(PendingChannel::new(Path::Rotation, sampler, id(), AccessorType::Vec4, rotations));
            Some("_rotate")
        }
        _ => None,
    }
}

/// Rotation axis an ANGLE curve turns about: the axis of the node's
/// rotation, or the animated operation's axis when that is degenerate.
fn angle_axis(transform: &Transform, op_axis: Option<DVec3>) -> Vec3 {
    let from_node = transform.rotation().and_then(|q| {
        let (axis, angle) = q.to_axis_angle();
        (angle.abs() > f32::EPSILON && axis.is_finite()).then_some(axis)
    });
    from_node
        .or_else(|| op_axis.map(|a| a.as_vec3()))
        .unwrap_or(Vec3::X)
}
