use crate::method::Method;

/// Compute the similarity between two vectors using the given method.
///
/// Vectors produced by the embedding layer are unit-L2-normalized, so
/// `Cosine` and `Dot` coincide for them. `Euclidean` returns a distance
/// (lower is more similar); callers that need a "higher is better"
/// ordering should use [score] instead.
///
/// Uses f64 intermediate precision. Mismatched dimensions yield the
/// worst value for the method (0.0 similarity, infinite distance).
pub fn similarity(a: &[f32], b: &[f32], method: Method) -> f32 {
    if a.len() != b.len() {
        return match method {
            Method::Euclidean => f32::INFINITY,
            Method::Cosine | Method::Dot => 0.0,
        };
    }
    match method {
        Method::Cosine | Method::Dot => dot(a, b),
        Method::Euclidean => euclidean(a, b),
    }
}

/// Like [similarity], but always ordered "higher is better": euclidean
/// distance is negated, the other methods pass through unchanged.
pub fn score(a: &[f32], b: &[f32], method: Method) -> f32 {
    match method {
        Method::Euclidean => -similarity(a, b, Method::Euclidean),
        _ => similarity(a, b, method),
    }
}

/// L2-normalize a vector in place. Zero vectors are left untouched.
pub fn normalize(v: &mut [f32]) {
    let norm: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    if norm == 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x = (*x as f64 / norm) as f32;
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    let mut sum: f64 = 0.0;
    for i in 0..a.len() {
        sum += a[i] as f64 * b[i] as f64;
    }
    sum as f32
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    let mut sum: f64 = 0.0;
    for i in 0..a.len() {
        let d = a[i] as f64 - b[i] as f64;
        sum += d * d;
    }
    sum.sqrt() as f32
}
