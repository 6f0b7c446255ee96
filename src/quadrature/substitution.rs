/// 變數變換 x = forward(u)。
///
/// ∫ f(x) dx over [a, b] = ∫ f(forward(u)) · derivative(u) du over [to_u(a), to_u(b)]
///
/// `Send + Sync` 是 supertrait，使 `Arc<dyn Substitution>` 可存在 `Configuration` 中並跨執行緒共享。
pub trait Substitution: Send + Sync {
    fn forward(&self, u: f64) -> f64;

    /// dx/du
    fn derivative(&self, u: f64) -> f64;

    /// forward 的反函數，用於轉換積分上下限。
    fn to_u(&self, x: f64) -> f64;
}

/// 將積分函數與變數變換組合成 u 空間中的積分函數。
pub fn compose<'a, F, S>(f: &'a F, substitution: &'a S) -> impl Fn(f64) -> f64 + 'a
where
    F: Fn(f64) -> f64,
    S: Substitution + ?Sized,
{
    move |u| f(substitution.forward(u)) * substitution.derivative(u)
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentitySubstitution;

impl Substitution for IdentitySubstitution {
    fn forward(&self, u: f64) -> f64 { u }
    fn derivative(&self, _u: f64) -> f64 { 1.0 }
    fn to_u(&self, x: f64) -> f64 { x }
}

// ─────────────────────────────────────────────────────────────────────────────
// Linear：x = scale·u + shift
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct LinearSubstitution {
    scale: f64,
    shift: f64,
}

impl LinearSubstitution {
    /// `scale` 為 0 或非有限值時回傳 `None`。
    pub fn new(scale: f64, shift: f64) -> Option<LinearSubstitution> {
        if scale == 0.0 || !scale.is_finite() || !shift.is_finite() {
            None
        } else {
            Some(LinearSubstitution { scale, shift })
        }
    }
}

impl Substitution for LinearSubstitution {
    fn forward(&self, u: f64) -> f64 {
        f64::mul_add(self.scale, u, self.shift)
    }

    fn derivative(&self, _u: f64) -> f64 {
        self.scale
    }

    fn to_u(&self, x: f64) -> f64 {
        (x - self.shift) / self.scale
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Log：x = e^u，適用於正區間上的冪次行為（例如 x^α 在 0 附近）
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct LogSubstitution;

impl Substitution for LogSubstitution {
    fn forward(&self, u: f64) -> f64 { u.exp() }
    fn derivative(&self, u: f64) -> f64 { u.exp() }
    fn to_u(&self, x: f64) -> f64 { x.ln() }
}

// ─────────────────────────────────────────────────────────────────────────────
// SemiInfinite：x = origin + u/(1-u)，把 [origin, ∞) 映到 [0, 1)
// ─────────────────────────────────────────────────────────────────────────────
//
// GK15 只在區間內部取點，所以 u = 1 本身不會被求值。

#[derive(Clone, Copy, Debug)]
pub struct SemiInfiniteSubstitution {
    origin: f64,
}

impl SemiInfiniteSubstitution {
    pub fn new(origin: f64) -> SemiInfiniteSubstitution {
        SemiInfiniteSubstitution { origin }
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }
}

impl Substitution for SemiInfiniteSubstitution {
    fn forward(&self, u: f64) -> f64 {
        self.origin + u / (1.0 - u)
    }

    fn derivative(&self, u: f64) -> f64 {
        let w = 1.0 - u;
        1.0 / (w * w)
    }

    /// 定義域為 x ≥ origin；範圍外（含 NaN）回傳 NaN，積分結果會標為 `NonFinite`。
    fn to_u(&self, x: f64) -> f64 {
        if x == f64::INFINITY {
            return 1.0;
        }
        let t = x - self.origin;
        if t.is_nan() || t < 0.0 {
            return f64::NAN;
        }
        t / (1.0 + t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_inverse<S: Substitution>(substitution: &S, xs: &[f64]) {
        for &x in xs {
            let u = substitution.to_u(x);
            assert_relative_eq!(substitution.forward(u), x, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_round_trip_bounds() {
        assert_inverse(&IdentitySubstitution, &[-3.0, 0.0, 2.5]);
        assert_inverse(&LinearSubstitution::new(2.0, -1.0).unwrap(), &[-3.0, 0.0, 2.5]);
        assert_inverse(&LogSubstitution, &[1e-8, 1.0, 42.0]);
        assert_inverse(&SemiInfiniteSubstitution::new(1.0), &[1.0, 2.0, 1e3]);
    }

    #[test]
    fn test_semi_infinite_maps_infinity() {
        let substitution = SemiInfiniteSubstitution::new(-2.0);
        assert_eq!(substitution.to_u(-2.0), 0.0);
        assert_eq!(substitution.to_u(f64::INFINITY), 1.0);
        assert_relative_eq!(substitution.derivative(0.5), 4.0);
    }

    #[test]
    fn test_semi_infinite_rejects_points_below_origin() {
        let substitution = SemiInfiniteSubstitution::new(2.0);
        assert!(substitution.to_u(1.0).is_nan());
        assert!(substitution.to_u(f64::NEG_INFINITY).is_nan());
        assert!(substitution.to_u(f64::NAN).is_nan());
        assert_relative_eq!(substitution.to_u(3.0), 0.5);
    }

    #[test]
    fn test_linear_rejects_zero_scale() {
        assert!(LinearSubstitution::new(0.0, 1.0).is_none());
        assert!(LinearSubstitution::new(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn test_compose() {
        let f = |x: f64| x * x;
        let linear = LinearSubstitution::new(3.0, 1.0).unwrap();
        let g = compose(&f, &linear);
        // f(3u + 1) · 3
        assert_relative_eq!(g(1.0), 48.0);
    }
}
