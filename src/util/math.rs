//! Math type re-exports and matrix layout helpers.
//!
//! Source documents store matrices row-major in double precision; the
//! target model is column-major single precision. Conversion between the
//! two layouts happens only through the helpers here.

// Re-export glam types
pub use glam::{
    // Single precision
    Vec2, Vec3, Vec4, Mat4, Quat,
    // Double precision
    DVec3, DVec4, DMat4, DQuat,
};

/// Build a matrix from 16 row-major values.
#[inline]
pub fn dmat4_from_row_major(values: &[f64; 16]) -> DMat4 {
    DMat4::from_cols_array(values).transpose()
}

/// Build a single precision matrix from 16 row-major values.
#[inline]
pub fn mat4_from_row_major(values: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(values).transpose()
}

/// Exact identity test, matching how flattened chains are compared.
#[inline]
pub fn is_identity(m: &DMat4) -> bool {
    *m == DMat4::IDENTITY
}

/// Component-wise min/max over packed elements of `n` components.
pub fn component_bounds(values: &[f32], n: usize) -> Option<(Vec<f32>, Vec<f32>)> {
    if n == 0 || values.len() < n {
        return None;
    }
    let mut min = values[..n].to_vec();
    let mut max = values[..n].to_vec();
    for element in values.chunks_exact(n).skip(1) {
        for (i, &v) in element.iter().enumerate() {
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_translation() {
        let rows = [
            1.0, 0.0, 0.0, 5.0, //
            0.0, 1.0, 0.0, 6.0, //
            0.0, 0.0, 1.0, 7.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        let m = dmat4_from_row_major(&rows);
        assert_eq!(m.w_axis, DVec4::new(5.0, 6.0, 7.0, 1.0));
        assert_eq!(m.row(0), DVec4::new(1.0, 0.0, 0.0, 5.0));
    }

    #[test]
    fn test_is_identity() {
        assert!(is_identity(&DMat4::IDENTITY));
        assert!(!is_identity(&DMat4::from_translation(DVec3::X)));
    }

    #[test]
    fn test_component_bounds() {
        let values = [0.0, 5.0, -1.0, 2.0, 3.0, 4.0];
        let (min, max) = component_bounds(&values, 3).unwrap();
        assert_eq!(min, vec![0.0, 3.0, -1.0]);
        assert_eq!(max, vec![2.0, 5.0, 4.0]);
        assert!(component_bounds(&[], 3).is_none());
    }
}
