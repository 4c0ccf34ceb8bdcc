use super::Vec3;

/// Unit quaternion, `x*i + y*j + z*k + w`.
///
/// Conventions:
/// - Right-handed, Y-up, camera forward is local `-Z`.
/// - `from_yaw_pitch` composes yaw (about Y) then pitch (about X), i.e. the
///   YXZ euler order with zero roll.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Yaw about Y, then pitch about X (`q = q_yaw * q_pitch`).
    pub fn from_yaw_pitch(yaw_rad: f64, pitch_rad: f64) -> Self {
        let half_yaw = yaw_rad * 0.5;
        let half_pitch = pitch_rad * 0.5;

        let cy = half_yaw.cos();
        let sy = half_yaw.sin();
        let cp = half_pitch.cos();
        let sp = half_pitch.sin();

        Self::new(cy * sp, sy * cp, -sy * sp, cy * cp)
    }

    /// YXZ euler order: yaw about Y, pitch about X, roll about Z.
    pub fn from_euler_yxz(pitch_rad: f64, yaw_rad: f64, roll_rad: f64) -> Self {
        let qy = Self::new(0.0, (yaw_rad * 0.5).sin(), 0.0, (yaw_rad * 0.5).cos());
        let qx = Self::new((pitch_rad * 0.5).sin(), 0.0, 0.0, (pitch_rad * 0.5).cos());
        let qz = Self::new(0.0, 0.0, (roll_rad * 0.5).sin(), (roll_rad * 0.5).cos());
        qy.mul(qx).mul(qz)
    }

    /// Orientation whose local `-Z` points along `forward`.
    ///
    /// Falls back to identity when `forward` is degenerate or parallel to
    /// `up`.
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let Some(f) = forward.normalized() else {
            return Self::identity();
        };
        let Some(s) = f.cross(up).normalized() else {
            return Self::identity();
        };
        let u = s.cross(f);

        // Column-major local-to-world basis: X -> s, Y -> u, Z -> -f.
        Self::from_basis(s, u, f.scale(-1.0))
    }

    fn from_basis(x: Vec3, y: Vec3, z: Vec3) -> Self {
        // Shepperd's method over the rotation matrix trace.
        let (m00, m01, m02) = (x.x, y.x, z.x);
        let (m10, m11, m12) = (x.y, y.y, z.y);
        let (m20, m21, m22) = (x.z, y.z, z.z);

        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalized()
    }

    /// Hamilton product `self * other` (apply `other` first).
    pub fn mul(self, other: Self) -> Self {
        let (a, b) = (self, other);
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn normalized(self) -> Self {
        let n = self.dot(self).sqrt();
        if n > 1e-10 {
            Self::new(self.x / n, self.y / n, self.z / n, self.w / n)
        } else {
            Self::identity()
        }
    }

    /// Rotate a vector by this (unit) quaternion.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let t = qv.cross(v).scale(2.0);
        v + t.scale(self.w) + qv.cross(t)
    }

    /// Spherical linear interpolation from `self` toward `other`.
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let mut dot = self.dot(other);

        // Negate one end to take the shorter arc.
        let mut b = other;
        if dot < 0.0 {
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
            dot = -dot;
        }

        // Nearly parallel: linear blend avoids a divide by sin(0).
        if dot > 0.9995 {
            return Self::new(
                self.x + t * (b.x - self.x),
                self.y + t * (b.y - self.y),
                self.z + t * (b.z - self.z),
                self.w + t * (b.w - self.w),
            )
            .normalized();
        }

        let theta_0 = dot.clamp(-1.0, 1.0).acos();
        let theta = theta_0 * t;
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * theta.sin() / sin_theta_0;
        let s1 = theta.sin() / sin_theta_0;

        Self::new(
            s0 * self.x + s1 * b.x,
            s0 * self.y + s1 * b.y,
            s0 * self.z + s1 * b.z,
            s0 * self.w + s1 * b.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Quat;
    use crate::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-10, "{a:?} != {b:?}");
    }

    #[test]
    fn identity_rotation_is_noop() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_close(Quat::identity().rotate(v), v);
    }

    #[test]
    fn yaw_quarter_turn_moves_forward_axis() {
        let q = Quat::from_yaw_pitch(std::f64::consts::FRAC_PI_2, 0.0);
        // Rotating -Z by +90 deg about Y lands on -X.
        assert_vec_close(q.rotate(Vec3::new(0.0, 0.0, -1.0)), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn pitch_quarter_turn_moves_forward_axis() {
        let q = Quat::from_yaw_pitch(0.0, std::f64::consts::FRAC_PI_2);
        // Rotating -Z by +90 deg about X lands on +Y.
        assert_vec_close(q.rotate(Vec3::new(0.0, 0.0, -1.0)), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn look_rotation_points_forward() {
        let fwd = Vec3::new(0.6, 0.0, -0.8);
        let q = Quat::look_rotation(fwd, Vec3::new(0.0, 1.0, 0.0));
        assert_vec_close(q.rotate(Vec3::new(0.0, 0.0, -1.0)), fwd);
    }

    #[test]
    fn look_rotation_matches_yaw_pitch() {
        let yaw = 0.4;
        let pitch = -0.3;
        let q = Quat::from_yaw_pitch(yaw, pitch);
        let fwd = q.rotate(Vec3::new(0.0, 0.0, -1.0));
        let r = Quat::look_rotation(fwd, Vec3::new(0.0, 1.0, 0.0));
        assert_vec_close(r.rotate(Vec3::new(0.0, 0.0, -1.0)), fwd);
    }

    #[test]
    fn slerp_endpoints_and_midpoint() {
        let a = Quat::identity();
        let b = Quat::from_yaw_pitch(1.0, 0.0);
        assert!((a.slerp(b, 0.0).dot(a).abs() - 1.0).abs() < 1e-10);
        assert!((a.slerp(b, 1.0).dot(b).abs() - 1.0).abs() < 1e-10);

        let mid = a.slerp(b, 0.5);
        let expected = Quat::from_yaw_pitch(0.5, 0.0);
        assert!((mid.dot(expected).abs() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn euler_yxz_composes_yaw_then_pitch() {
        let q = Quat::from_euler_yxz(0.3, 0.7, 0.0);
        let r = Quat::from_yaw_pitch(0.7, 0.3);
        assert!((q.dot(r).abs() - 1.0).abs() < 1e-10);
    }
}
