#![no_main]
use acscan::{AcBuilder, BuildConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Split input into patterns and query
    if data.len() < 2 {
        return;
    }

    let split_point = (data[0] as usize).clamp(1, data.len() - 1);
    let pattern_data = &data[1..split_point];
    let query = &data[split_point..];

    // Patterns are separated by 0xff; empty ones are kept
    let patterns: Vec<&[u8]> = pattern_data.split(|&b| b == 0xff).collect();

    let config = BuildConfig::new().with_max_states(1 << 16);
    let Ok(ac) = AcBuilder::new(config).build(&patterns) else {
        return;
    };
    assert!(ac.is_total());

    if let Some(m) = ac.find(query) {
        assert_eq!(&query[m.start()..m.end()], ac.pattern(m.pattern()));
        // nothing ends earlier
        assert!(ac.find(&query[..m.end() - 1]).is_none());
    }
});
