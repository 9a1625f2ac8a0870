#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use bigfib_core::calculator::{Calculator, FibCalculator};
use bigfib_core::fastdoubling::FastDoubling;
use bigfib_core::fft_based::FftBased;
use bigfib_core::matrix::MatrixExponentiation;
use bigfib_core::observers::NoOpObserver;
use bigfib_core::options::Options;
use bigfib_core::progress::CancellationToken;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // Use first 4 bytes as n, capped at 10000 for speed (3 algorithms)
    let n = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as u64;
    let n = n % 10_000;

    let fast: Arc<dyn Calculator> =
        Arc::new(FibCalculator::new(Arc::new(FastDoubling::new())));
    let matrix: Arc<dyn Calculator> =
        Arc::new(FibCalculator::new(Arc::new(MatrixExponentiation::new())));
    let fft: Arc<dyn Calculator> =
        Arc::new(FibCalculator::new(Arc::new(FftBased::new())));

    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default().normalize();

    let fast_result = fast.calculate(&cancel, &observer, 0, n, &opts);
    let matrix_result = matrix.calculate(&cancel, &observer, 0, n, &opts);
    let fft_result = fft.calculate(&cancel, &observer, 0, n, &opts);

    if let (Ok(f), Ok(m), Ok(t)) = (fast_result, matrix_result, fft_result) {
        assert_eq!(f, m, "FastDoubling != Matrix at n={n}");
        assert_eq!(f, t, "FastDoubling != FFT at n={n}");
    }
});
