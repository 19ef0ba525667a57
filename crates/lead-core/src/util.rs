use std::time::Instant;

#[inline]
pub fn now_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

/// 数值稳定版：z 很负时不会 exp 溢出
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[inline]
pub fn clamp01(x: f64) -> f64 {
    if x < 0.0 { 0.0 } else if x > 1.0 { 1.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_symmetric_and_bounded() {
        assert_eq!(sigmoid(0.0), 0.5);
        for z in [-800.0, -30.0, -1.5, 0.25, 4.0, 800.0] {
            let p = sigmoid(z);
            assert!((0.0..=1.0).contains(&p), "z={z} p={p}");
            assert!((p + sigmoid(-z) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn clamp01_bounds() {
        assert_eq!(clamp01(-0.1), 0.0);
        assert_eq!(clamp01(1.1), 1.0);
        assert_eq!(clamp01(0.3), 0.3);
    }
}
