#![no_main]

use libfuzzer_sys::fuzz_target;
use asmrefs::AssemblyView;

fuzz_target!(|data: &[u8]| {
    if let Ok(view) = AssemblyView::from_mem(data.to_vec()) {
        let _ = view.assembly_refs();
        if let Some(tables) = view.tables() {
            let _ = tables.summary();
        }
    }
});
