#![allow(dead_code)]

use matview::{Matrix, MatrixView};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Install a subscriber local to the calling test thread, honoring `RUST_LOG`.
pub fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}

/// `rows x cols` matrix holding `1, 2, 3, ...` in row-major order.
pub fn numbered(rows: usize, cols: usize) -> Matrix {
    Matrix::from_fn(rows, cols, |i, j| (i * cols + j + 1) as f64)
}

/// Brute-force sum of squares of a matrix, bypassing every cache.
pub fn brute_matrix(m: &Matrix) -> f64 {
    m.iter().map(|x| x * x).sum()
}

/// Brute-force sum of squares of a view window, read element by element.
pub fn brute_view(v: &MatrixView<'_>) -> f64 {
    let mut sum = 0.0;
    for i in 0..v.rows() {
        for j in 0..v.cols() {
            let x = v.get(i, j).unwrap();
            sum += x * x;
        }
    }
    sum
}
