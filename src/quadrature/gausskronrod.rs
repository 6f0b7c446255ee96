// ─────────────────────────────────────────────────────────────────────────────
// 15 點 Gauss-Kronrod 規則（內嵌 7 點 Gauss 規則）
// ─────────────────────────────────────────────────────────────────────────────

/// Kronrod 節點（正半軸，由外而內；最後一個為中心點 0）。
/// 奇數索引 1, 3, 5 同時也是 7 點 Gauss 規則的節點。
pub const XGK15: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144838258730,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

/// Kronrod 權重，與 `XGK15` 一一對應。
pub const WGK15: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

/// Gauss 權重：前三個對應 `XGK15[1]`、`XGK15[3]`、`XGK15[5]`，最後一個是中心點。
pub const WG7: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

/// 每次套用規則的函數求值次數。
pub const GK15_EVALUATIONS: usize = 15;

/// 單一區間上的規則輸出。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRuleEstimate {
    /// Kronrod 估計值
    pub estimate: f64,
    /// 經 rescale 後的絕對誤差估計
    pub abserr: f64,
    /// ∫|f| 的估計，用於偵測相消
    pub resabs: f64,
    /// ∫|f - mean| 的估計，用於 rescale 誤差
    pub resasc: f64,
}

/// 在 `[a, b]` 上套用 15 點 Gauss-Kronrod 規則。
///
/// 中心點與 7 對對稱節點共 15 次求值；不做 NaN/Inf 攔截，
/// 積分函數的異常值會直接傳遞到結果中。
pub fn gauss_kronrod_15<F>(f: &F, a: f64, b: f64) -> FixedRuleEstimate
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let abs_half = half.abs();
    let f_center = f(center);

    let mut fv1 = [0.0_f64; 7];
    let mut fv2 = [0.0_f64; 7];

    let mut result_gauss = f_center * WG7[3];
    let mut result_kronrod = f_center * WGK15[7];
    let mut result_abs = result_kronrod.abs();

    // Gauss 節點（奇數索引）
    for j in 0..3 {
        let jtw = 2 * j + 1;
        let abscissa = half * XGK15[jtw];
        let fval1 = f(center - abscissa);
        let fval2 = f(center + abscissa);
        let fsum = fval1 + fval2;
        fv1[jtw] = fval1;
        fv2[jtw] = fval2;
        result_gauss += WG7[j] * fsum;
        result_kronrod += WGK15[jtw] * fsum;
        result_abs += WGK15[jtw] * (fval1.abs() + fval2.abs());
    }

    // 只屬於 Kronrod 的節點（偶數索引）
    for j in 0..4 {
        let jtwm1 = 2 * j;
        let abscissa = half * XGK15[jtwm1];
        let fval1 = f(center - abscissa);
        let fval2 = f(center + abscissa);
        fv1[jtwm1] = fval1;
        fv2[jtwm1] = fval2;
        result_kronrod += WGK15[jtwm1] * (fval1 + fval2);
        result_abs += WGK15[jtwm1] * (fval1.abs() + fval2.abs());
    }

    let mean = 0.5 * result_kronrod;
    let mut result_asc = WGK15[7] * (f_center - mean).abs();
    for j in 0..7 {
        result_asc += WGK15[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let raw_error = (result_kronrod - result_gauss) * half;
    let resabs = result_abs * abs_half;
    let resasc = result_asc * abs_half;

    FixedRuleEstimate {
        estimate: result_kronrod * half,
        abserr: rescale_error(raw_error, resabs, resasc),
        resabs,
        resasc,
    }
}

/// Gauss/Kronrod 差值的修正：
///   err ← resasc · min(1, (200·err/resasc)^1.5)
///   err ← max(err, 50·ε·resabs)，當 resabs > MIN_POSITIVE / (50·ε)
pub fn rescale_error(raw_error: f64, resabs: f64, resasc: f64) -> f64 {
    let mut err = raw_error.abs();

    if resasc != 0.0 && err != 0.0 {
        let scale = (200.0 * err / resasc).powf(1.5);
        err = if scale < 1.0 { resasc * scale } else { resasc };
    }

    if resabs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        let min_err = 50.0 * f64::EPSILON * resabs;
        if min_err > err {
            err = min_err;
        }
    }

    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;
    use std::f64::consts::PI;

    #[test]
    fn test_weights_sum_to_interval_length() {
        let kronrod: f64 = 2.0 * WGK15[..7].iter().sum::<f64>() + WGK15[7];
        let gauss: f64 = 2.0 * WG7[..3].iter().sum::<f64>() + WG7[3];
        assert_abs_diff_eq!(kronrod, 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(gauss, 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_fifteen_evaluations() {
        let calls = Cell::new(0usize);
        let f = |x: f64| {
            calls.set(calls.get() + 1);
            x
        };
        let _ = gauss_kronrod_15(&f, 0.0, 1.0);
        assert_eq!(calls.get(), GK15_EVALUATIONS);
    }

    #[test]
    fn test_constant_is_exact() {
        let result = gauss_kronrod_15(&|_x| 3.0, -1.0, 2.0);
        assert_abs_diff_eq!(result.estimate, 9.0, epsilon = 1e-13);
        assert_abs_diff_eq!(result.resabs, 9.0, epsilon = 1e-13);
        // 誤差只剩浮點下限
        assert!(result.abserr <= 50.0 * f64::EPSILON * result.resabs * 1.0001);
    }

    #[test]
    fn test_polynomial_and_sine() {
        let cubic = gauss_kronrod_15(&|x: f64| x * x * x, 0.0, 1.0);
        assert_abs_diff_eq!(cubic.estimate, 0.25, epsilon = 1e-15);

        let sine = gauss_kronrod_15(&|x: f64| x.sin(), 0.0, PI);
        assert_abs_diff_eq!(sine.estimate, 2.0, epsilon = 1e-14);
        assert!(sine.abserr < 1e-10);
    }

    #[test]
    fn test_resasc_measures_variation() {
        // 對 f(x) = x 在 [-1, 1]，mean = 0，resasc = resabs
        let result = gauss_kronrod_15(&|x: f64| x, -1.0, 1.0);
        assert_abs_diff_eq!(result.estimate, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(result.resasc, result.resabs, epsilon = 1e-15);
        assert!(result.resabs > 0.9 && result.resabs < 1.1);
    }

    #[test]
    fn test_rescale_error() {
        // 差值遠小於 resasc 時以 1.5 次方縮小
        let err = rescale_error(1e-6, 1.0, 1.0);
        assert_abs_diff_eq!(err, (200.0e-6_f64).powf(1.5), epsilon = 1e-18);

        // 差值過大時上限為 resasc
        assert_eq!(rescale_error(1.0, 1.0, 0.5), 0.5);

        // 浮點下限
        let floor = 50.0 * f64::EPSILON * 1e3;
        assert_eq!(rescale_error(0.0, 1e3, 0.0), floor);

        // resabs 太小時不套用下限
        assert_eq!(rescale_error(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_rough_integrand_has_larger_error() {
        let smooth = gauss_kronrod_15(&|x: f64| x.exp(), 0.0, 1.0);
        let rough = gauss_kronrod_15(&|x: f64| (x - 0.3).abs().sqrt(), 0.0, 1.0);
        assert!(rough.abserr > smooth.abserr);
    }
}
