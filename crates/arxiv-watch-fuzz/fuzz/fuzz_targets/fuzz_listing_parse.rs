#![no_main]

use arxiv_watch::listing::{HtmlListingParser, ListingParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let page = String::from_utf8_lossy(data);
    for entry in HtmlListingParser::new().parse(&page) {
        let _ = entry.canonical_id();
    }
});
