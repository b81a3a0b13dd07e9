#![no_main]

use arxiv_watch::models::SeenSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that loads must serialize back.
    if let Ok(seen) = SeenSet::from_json(data) {
        let pretty = seen.to_json_pretty().unwrap();
        assert_eq!(SeenSet::from_json(pretty.as_bytes()).unwrap(), seen);
    }
});
