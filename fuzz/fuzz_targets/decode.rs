#![no_main]
use libfuzzer_sys::fuzz_target;
use wkb_codec::{Dialect, Reader, Writer};

fuzz_target!(|data: &[u8]| {
    for dialect in [Dialect::Standard, Dialect::Extended, Dialect::Iso] {
        if let Ok(geom) = Reader::new(dialect).read(data) {
            // Compare encodings rather than trees, as coordinates may be NaN
            let writer = Writer::new(dialect);
            let enc = writer.write(&geom).unwrap();
            let again = Reader::new(dialect).read(&enc).unwrap();
            assert_eq!(writer.write(&again).unwrap(), enc);
        }
    }
});
