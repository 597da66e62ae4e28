use glam::DVec2;

pub type Point = DVec2;

/// A control volume: its measure and centroid.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Volume {
    pub volume: f64,
    pub centroid: Point,
}

impl Volume {
    pub fn new(volume: f64, centroid: Point) -> Self {
        Self { volume, centroid }
    }
}

/// A face of a control volume with unit `normal`. In 1D the area is 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub area: f64,
    pub centroid: Point,
    pub normal: DVec2,
}

impl Surface {
    pub fn new(area: f64, centroid: Point, normal: DVec2) -> Self {
        debug_assert!((normal.length_squared() - 1.).abs() < 1e-10);
        Self {
            area,
            centroid,
            normal,
        }
    }

    /// Unit tangent, the normal rotated counterclockwise.
    pub fn tangent(&self) -> DVec2 {
        self.normal.perp()
    }

    /// Same face seen from the other side.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }
}

/// Signed area and centroid of a simple polygon.
pub fn polygon(vertices: &[Point]) -> Volume {
    let n = vertices.len();
    let mut area = 0.;
    let mut centroid = DVec2::ZERO;
    for k in 0..n {
        let a = vertices[k];
        let b = vertices[(k + 1) % n];
        let cross = a.perp_dot(b);
        area += cross;
        centroid += cross * (a + b);
    }
    area *= 0.5;
    Volume::new(area, centroid / (6. * area))
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use glam::DVec2;

    use super::*;

    #[test]
    fn test_polygon() {
        let quad = [
            DVec2::new(0., 0.),
            DVec2::new(2., 0.),
            DVec2::new(2., 1.),
            DVec2::new(0., 1.),
        ];
        let volume = polygon(&quad);
        assert_approx_eq!(f64, volume.volume, 2.);
        assert_approx_eq!(f64, volume.centroid.x, 1.);
        assert_approx_eq!(f64, volume.centroid.y, 0.5);
    }

    #[test]
    fn test_surface() {
        let face = Surface::new(2., DVec2::ZERO, DVec2::X);
        assert_eq!(face.tangent(), DVec2::Y);
        let flipped = face.flipped();
        assert_eq!(flipped.normal, -DVec2::X);
        assert_eq!(flipped.area, face.area);
    }
}
