//! Property-based tests for external test discovery
//!
//! Random directories of scripts and noise files; discovery must return exactly the scripts, keyed by stem.

use std::collections::BTreeSet;
use std::fs;

use external_tests::{DiscoveryConfig, discover_external_tests};
use proptest::prelude::*;

fn stem_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("reserved name", |s| s != "common")
}

fn noise_extension_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("py"), Just("txt"), Just("bash"), Just("sh~")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: N matching scripts and M non-matching files yield exactly N entries
    #[test]
    fn discovery_returns_only_matching_scripts(
        scripts in prop::collection::btree_set(stem_strategy(), 0..8),
        noise in prop::collection::vec((stem_strategy(), noise_extension_strategy()), 0..8),
        with_common in any::<bool>(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        for stem in &scripts {
            fs::write(dir.path().join(format!("{stem}.sh")), "#!/bin/sh\n").unwrap();
        }
        for (stem, ext) in &noise {
            fs::write(dir.path().join(format!("{stem}.{ext}")), "").unwrap();
        }
        if with_common {
            fs::write(dir.path().join("common.sh"), "").unwrap();
        }

        let registry = discover_external_tests(&DiscoveryConfig::new().with_tests_dir(dir.path()));

        let keys: BTreeSet<String> = registry.keys().cloned().collect();
        prop_assert_eq!(&keys, &scripts);
        for (name, path) in &registry {
            prop_assert_eq!(path, &dir.path().join(format!("{name}.sh")));
        }
    }
}
