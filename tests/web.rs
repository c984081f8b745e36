// Browser-only checks, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use mentalist_scroll::{ArmCommand, Controller, FixedRowSurface, ForceConfig, sample_catalog};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn controller_runs_inside_the_browser() {
    let mut c = Controller::new(
        sample_catalog(),
        ForceConfig::default(),
        mentalist_scroll::random::entropy_seed(),
        FixedRowSurface::new(40.0, 400.0),
    );
    c.start();
    assert_eq!(c.feed().len(), 120);
    assert!(c.arm(ArmCommand::letters("lune", 1)).is_ok());
    assert_eq!(c.state().describe(), "letters 0/4 rank 1");
}
