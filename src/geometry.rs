/// 3点 a, b, c が頂点 b でなす角度を度数 [0, 180] で返す
///
/// b→a と b→c の2本のレイの atan2 差分から求める。
/// a == b または c == b のときは未定義（呼び出し側で可視度を確認すること）。
pub fn angle_at(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let radians = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let mut degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_collinear_is_straight() {
        // b が a と c の間にある一直線 → 180度
        let angle = angle_at((0.0, 0.0), (1.0, 0.0), (2.0, 0.0));
        assert!(approx_eq(angle, 180.0, 1e-4));

        let angle = angle_at((0.3, 0.1), (0.3, 0.5), (0.3, 0.9));
        assert!(approx_eq(angle, 180.0, 1e-4));
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at((1.0, 0.0), (0.0, 0.0), (0.0, 1.0));
        assert!(approx_eq(angle, 90.0, 1e-4));
    }

    #[test]
    fn test_mirror_symmetry() {
        // b からの垂直レイを挟んで左右対称な a, c は鏡映しても同じ角度
        let left = angle_at((-0.2, 0.5), (0.0, 0.0), (0.2, 0.5));
        let right = angle_at((0.2, 0.5), (0.0, 0.0), (-0.2, 0.5));
        assert!(approx_eq(left, right, 1e-4));
    }

    #[test]
    fn test_reflex_folded_below_180() {
        // atan2 差分の絶対値が 180 を超えるケースは 360 - x に折り返される
        // a は +170度方向、c は -170度方向 → 生の差分は 340度、実際の角度は 20度
        let a = (170.0f32.to_radians().cos(), 170.0f32.to_radians().sin());
        let c = (170.0f32.to_radians().cos(), -(170.0f32.to_radians().sin()));
        let angle = angle_at(a, (0.0, 0.0), c);
        assert!(approx_eq(angle, 20.0, 1e-3));
    }

    #[test]
    fn test_bounds() {
        let points = [
            (0.0f32, 1.0f32),
            (1.0, 0.0),
            (-1.0, -1.0),
            (0.5, -0.3),
            (-0.7, 0.2),
        ];
        for &a in &points {
            for &c in &points {
                let angle = angle_at(a, (0.1, 0.1), c);
                assert!((0.0..=180.0).contains(&angle), "angle out of range: {}", angle);
            }
        }
    }
}
