#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use bigfib_core::calculator::{Calculator, FibCalculator};
use bigfib_core::fft_based::FftBased;
use bigfib_core::observers::NoOpObserver;
use bigfib_core::options::Options;
use bigfib_core::progress::CancellationToken;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // Use first 4 bytes as n, capped at 20000 (FFT runs are heavier)
    let n = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as u64;
    let n = n % 20_000;

    let calc: Arc<dyn Calculator> =
        Arc::new(FibCalculator::new(Arc::new(FftBased::new())));
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default().normalize();

    // Should not panic
    let _ = calc.calculate(&cancel, &observer, 0, n, &opts);
});
