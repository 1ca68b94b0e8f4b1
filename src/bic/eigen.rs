//! # 复矩阵本征值求解器
//!
//! 纯 Rust 实现的稠密复矩阵（一般非厄米）本征值算法，
//! 适用于本项目 N ≤ 64 的小规模哈密顿量。
//!
//! ## 算法概述
//! 1. Householder 变换约化为上 Hessenberg 形式
//! 2. 带 Wilkinson 位移的 QR 迭代
//! 3. 次对角元收敛后压缩（deflation），1×1/2×2 块直接求解
//!
//! ## 依赖关系
//! - 被 `bic/solver.rs` 与 `commands/simulate.rs` 调用
//! - 使用 `ndarray` 与 `num-complex`

use crate::error::{BicError, Result};

use ndarray::Array2;
use num_complex::Complex64;

/// 单个压缩块允许的最大 QR 迭代次数
const MAX_SWEEPS: usize = 60;

/// 计算一般复矩阵的全部本征值（不计算本征向量）
pub fn eigenvalues(a: &Array2<Complex64>) -> Result<Vec<Complex64>> {
    let (n, m) = a.dim();
    if n != m {
        return Err(BicError::EigenError(format!(
            "Matrix must be square, got {}x{}",
            n, m
        )));
    }
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![a[[0, 0]]]);
    }

    let mut h = a.clone();
    hessenberg(&mut h);
    qr_eigenvalues(h)
}

/// Householder 约化为上 Hessenberg 形式（原位）
fn hessenberg(h: &mut Array2<Complex64>) {
    let n = h.nrows();

    for k in 0..n.saturating_sub(2) {
        // 次对角以下的列向量
        let mut v: Vec<Complex64> = (k + 1..n).map(|i| h[[i, k]]).collect();
        let norm_x = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        if norm_x < f64::EPSILON {
            continue;
        }

        // 选取与 x₀ 同相位的 α 避免相消
        let alpha = if v[0].norm() > 0.0 {
            -(v[0] / v[0].norm()) * norm_x
        } else {
            Complex64::new(-norm_x, 0.0)
        };
        v[0] -= alpha;

        let v_norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        if v_norm < f64::EPSILON {
            continue;
        }
        for z in v.iter_mut() {
            *z /= v_norm;
        }

        // 左乘 P = I − 2vvᴴ，作用于 k+1.. 行
        for j in k..n {
            let s: Complex64 = v
                .iter()
                .enumerate()
                .map(|(i, vi)| vi.conj() * h[[k + 1 + i, j]])
                .sum();
            for (i, vi) in v.iter().enumerate() {
                let update = *vi * s * 2.0;
                h[[k + 1 + i, j]] -= update;
            }
        }

        // 右乘 P，作用于 k+1.. 列
        for i in 0..n {
            let s: Complex64 = v
                .iter()
                .enumerate()
                .map(|(j, vj)| h[[i, k + 1 + j]] * vj)
                .sum();
            for (j, vj) in v.iter().enumerate() {
                let update = s * vj.conj() * 2.0;
                h[[i, k + 1 + j]] -= update;
            }
        }

        // 清除数值残余
        for i in k + 2..n {
            h[[i, k]] = Complex64::new(0.0, 0.0);
        }
    }
}

/// 对上 Hessenberg 矩阵做位移 QR 迭代，返回全部本征值
fn qr_eigenvalues(mut h: Array2<Complex64>) -> Result<Vec<Complex64>> {
    let n = h.nrows();
    let zero = Complex64::new(0.0, 0.0);
    let mut evals = vec![zero; n];
    let mut hi = n - 1;
    let mut sweeps = 0usize;

    loop {
        // 次对角收敛判定
        for i in 1..=hi {
            let sub = h[[i, i - 1]].norm();
            let scale = h[[i - 1, i - 1]].norm() + h[[i, i]].norm();
            if sub <= f64::EPSILON * scale.max(f64::MIN_POSITIVE) {
                h[[i, i - 1]] = zero;
            }
        }

        // 定位活动块 [lo, hi]
        let mut lo = hi;
        while lo > 0 && h[[lo, lo - 1]] != zero {
            lo -= 1;
        }

        if lo == hi {
            // 1×1 块
            evals[hi] = h[[hi, hi]];
            if hi == 0 {
                break;
            }
            hi -= 1;
            sweeps = 0;
            continue;
        }

        if hi - lo == 1 {
            // 2×2 块闭式求解
            let (l1, l2) = eig_2x2(h[[lo, lo]], h[[lo, hi]], h[[hi, lo]], h[[hi, hi]]);
            evals[lo] = l1;
            evals[hi] = l2;
            if lo == 0 {
                break;
            }
            hi = lo - 1;
            sweeps = 0;
            continue;
        }

        sweeps += 1;
        if sweeps > MAX_SWEEPS {
            return Err(BicError::EigenError(format!(
                "QR iteration did not converge within {} sweeps (block {}..{})",
                MAX_SWEEPS, lo, hi
            )));
        }

        // Wilkinson 位移：尾部 2×2 中靠近 h[hi,hi] 的本征值
        let (m1, m2) = eig_2x2(
            h[[hi - 1, hi - 1]],
            h[[hi - 1, hi]],
            h[[hi, hi - 1]],
            h[[hi, hi]],
        );
        let mut mu = if (m1 - h[[hi, hi]]).norm() <= (m2 - h[[hi, hi]]).norm() {
            m1
        } else {
            m2
        };
        // 周期性异常位移，避免迭代停滞
        if sweeps % 12 == 0 {
            mu = h[[hi, hi]] + Complex64::new(1.5 * h[[hi, hi - 1]].norm(), 0.0);
        }

        qr_step(&mut h, lo, hi, mu);
    }

    Ok(evals)
}

/// 对活动块 [lo, hi] 做一次显式位移 QR 步：H ← RQ + μI
fn qr_step(h: &mut Array2<Complex64>, lo: usize, hi: usize, mu: Complex64) {
    let zero = Complex64::new(0.0, 0.0);

    for i in lo..=hi {
        h[[i, i]] -= mu;
    }

    // 左乘 Givens 序列约化为上三角
    let mut rotations: Vec<(f64, Complex64)> = Vec::with_capacity(hi - lo);
    for k in lo..hi {
        let (c, s) = givens(h[[k, k]], h[[k + 1, k]]);
        for j in k..=hi {
            let x = h[[k, j]];
            let y = h[[k + 1, j]];
            h[[k, j]] = c * x + s * y;
            h[[k + 1, j]] = -s.conj() * x + c * y;
        }
        h[[k + 1, k]] = zero;
        rotations.push((c, s));
    }

    // 右乘各 Gᴴ 完成相似变换
    for (idx, (c, s)) in rotations.iter().enumerate() {
        let k = lo + idx;
        for i in lo..=hi {
            let x = h[[i, k]];
            let y = h[[i, k + 1]];
            h[[i, k]] = *c * x + s.conj() * y;
            h[[i, k + 1]] = -*s * x + *c * y;
        }
    }

    for i in lo..=hi {
        h[[i, i]] += mu;
    }
}

/// 复 Givens 旋转：使 [c, s; −s̄, c]·[f; g] = [r; 0]，c 为实数
fn givens(f: Complex64, g: Complex64) -> (f64, Complex64) {
    let fn_ = f.norm();
    let gn = g.norm();
    let r = (fn_ * fn_ + gn * gn).sqrt();
    if r == 0.0 {
        return (1.0, Complex64::new(0.0, 0.0));
    }
    if fn_ == 0.0 {
        return (0.0, g.conj() / gn);
    }
    let c = fn_ / r;
    let s = (f / fn_) * g.conj() / r;
    (c, s)
}

/// 2×2 复矩阵本征值闭式解
fn eig_2x2(
    a: Complex64,
    b: Complex64,
    c: Complex64,
    d: Complex64,
) -> (Complex64, Complex64) {
    let tr = a + d;
    let det = a * d - b * c;
    let disc = (tr * tr - 4.0 * det).sqrt();
    ((tr + disc) / 2.0, (tr - disc) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// 按模与辐角排序便于多重集比较
    fn sorted(mut evals: Vec<Complex64>) -> Vec<Complex64> {
        evals.sort_by(|a, b| {
            (a.re, a.im)
                .partial_cmp(&(b.re, b.im))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        evals
    }

    fn assert_close(a: &[Complex64], b: &[Complex64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).norm() < tol, "expected {} ≈ {}", x, y);
        }
    }

    #[test]
    fn test_diagonal_matrix() {
        let a = array![
            [
                Complex64::new(1.0, 2.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0)
            ],
            [
                Complex64::new(0.0, 0.0),
                Complex64::new(-3.0, 0.5),
                Complex64::new(0.0, 0.0)
            ],
            [
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(4.0, -1.0)
            ],
        ];
        let evals = sorted(eigenvalues(&a).unwrap());
        let expected = sorted(vec![
            Complex64::new(1.0, 2.0),
            Complex64::new(-3.0, 0.5),
            Complex64::new(4.0, -1.0),
        ]);
        assert_close(&evals, &expected, 1e-10);
    }

    #[test]
    fn test_upper_triangular_matrix() {
        let a = array![
            [
                Complex64::new(2.0, 0.0),
                Complex64::new(5.0, 1.0),
                Complex64::new(-1.0, 3.0)
            ],
            [
                Complex64::new(0.0, 0.0),
                Complex64::new(0.5, -0.5),
                Complex64::new(2.0, 2.0)
            ],
            [
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(-1.5, 1.0)
            ],
        ];
        let evals = sorted(eigenvalues(&a).unwrap());
        let expected = sorted(vec![
            Complex64::new(2.0, 0.0),
            Complex64::new(0.5, -0.5),
            Complex64::new(-1.5, 1.0),
        ]);
        assert_close(&evals, &expected, 1e-8);
    }

    #[test]
    fn test_2x2_symmetric() {
        // [[0,1],[1,0]] 本征值为 ±1
        let a = array![
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        ];
        let evals = sorted(eigenvalues(&a).unwrap());
        assert_close(
            &evals,
            &[Complex64::new(-1.0, 0.0), Complex64::new(1.0, 0.0)],
            1e-12,
        );
    }

    #[test]
    fn test_hermitian_tridiagonal() {
        // [[2,1,0],[1,2,1],[0,1,2]] 本征值 2, 2±√2
        let z = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let two = Complex64::new(2.0, 0.0);
        let a = array![[two, one, z], [one, two, one], [z, one, two]];
        let evals = sorted(eigenvalues(&a).unwrap());
        let sqrt2 = 2.0_f64.sqrt();
        let expected = sorted(vec![
            Complex64::new(2.0 - sqrt2, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(2.0 + sqrt2, 0.0),
        ]);
        assert_close(&evals, &expected, 1e-8);
    }

    #[test]
    fn test_trace_preserved() {
        // 确定性伪随机 6×6 复矩阵：本征值之和应等于迹
        let n = 6;
        let mut a: Array2<Complex64> = Array2::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                let re = ((i * 7 + j * 3 + 1) % 11) as f64 - 5.0;
                let im = ((i * 5 + j * 13 + 2) % 9) as f64 - 4.0;
                a[[i, j]] = Complex64::new(re, im);
            }
        }
        let trace: Complex64 = (0..n).map(|i| a[[i, i]]).sum();
        let evals = eigenvalues(&a).unwrap();
        let sum: Complex64 = evals.iter().sum();
        assert!(
            (sum - trace).norm() / trace.norm().max(1.0) < 1e-8,
            "trace {} vs eigenvalue sum {}",
            trace,
            sum
        );
    }

    #[test]
    fn test_rejects_non_square() {
        let a: Array2<Complex64> = Array2::zeros((2, 3));
        assert!(eigenvalues(&a).is_err());
    }
}
