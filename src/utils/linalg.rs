// src/utils/linalg.rs

use nalgebra::Matrix3;

fn to_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

fn to_rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
  [
    [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
    [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
    [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
  ]
}

/// Multiply lattice vectors (rows, in units of the lattice constant) by the constant
pub fn scale_lattice(constant: f64, vectors: [[f64; 3]; 3]) -> [[f64; 3]; 3] {
  to_rows(&(to_matrix(vectors) * constant))
}

/// Cell volume |det(L)| in cubic length units
pub fn cell_volume(lattice: [[f64; 3]; 3]) -> f64 {
  to_matrix(lattice).determinant().abs()
}

/// Axis-aligned box around a point cloud, padded by `padding` times the spread
///
/// # Returns
/// Diagonal cell matrix, or None for an empty cloud
///
/// # Formula
/// ```text
/// L_ii = (max_i - min_i) * (1 + padding)
/// ```
pub fn padded_box<I>(points: I, padding: f64) -> Option<[[f64; 3]; 3]>
where
  I: IntoIterator<Item = [f64; 3]>,
{
  let mut lo = [f64::INFINITY; 3];
  let mut hi = [f64::NEG_INFINITY; 3];
  let mut seen = false;

  for p in points {
    seen = true;
    for k in 0..3 {
      lo[k] = lo[k].min(p[k]);
      hi[k] = hi[k].max(p[k]);
    }
  }

  if !seen {
    return None;
  }

  let mut cell = [[0.0; 3]; 3];
  for k in 0..3 {
    let spread = hi[k] - lo[k];
    cell[k][k] = spread + spread * padding;
  }
  Some(cell)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_scale_lattice() {
    let vectors = [[1.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.0, 0.0, 2.0]];
    let cell = scale_lattice(4.0, vectors);

    assert!((cell[0][0] - 4.0).abs() < 1e-12);
    assert!((cell[1][0] - 2.0).abs() < 1e-12);
    assert!((cell[1][1] - 2.0).abs() < 1e-12);
    assert!((cell[2][2] - 8.0).abs() < 1e-12);
  }

  #[test]
  fn test_cell_volume() {
    let lattice = [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]];
    assert!((cell_volume(lattice) - 60.0).abs() < 1e-10);
  }

  #[test]
  fn test_padded_box_cube() {
    let points = vec![[0.0, 0.0, 0.0], [10.0, 10.0, 10.0], [5.0, 2.0, 7.0]];
    let cell = padded_box(points, 0.1).unwrap();

    for k in 0..3 {
      assert!((cell[k][k] - 11.0).abs() < 1e-12);
    }
    assert_eq!(cell[0][1], 0.0);
  }

  #[test]
  fn test_padded_box_empty() {
    assert!(padded_box(Vec::new(), 0.1).is_none());
  }
}
