pub mod config;
pub mod errors;
pub mod pmc;
pub mod runner;
pub mod suites;

#[cfg(test)]
mod suite_table_consistency_tests {
    // Every name in the static test lists must resolve through
    // `files_for_test` to a non-empty file list whose entries sit under the
    // suite's own data subdirectory (aside from octane's `-e` kick-off).

    use std::path::Path;

    use crate::suites::Suite;

    #[test]
    fn every_test_name_resolves_to_files_under_its_suite() {
        let root = Path::new("/data");
        for suite in [Suite::Octane, Suite::Sunspider, Suite::Kraken] {
            let prefix = format!("/data/{}/", suite.dir_name());
            for test in suite.test_names() {
                let files = suite.files_for_test(root, test);
                assert!(!files.is_empty(), "{test} resolved to nothing");
                for file in &files {
                    let text = file.to_string_lossy();
                    if text.ends_with(".js") {
                        assert!(
                            text.starts_with(&prefix),
                            "{test}: {text} not under {prefix}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_names_are_unique_within_each_suite() {
        for suite in [Suite::Octane, Suite::Sunspider, Suite::Kraken] {
            let names = suite.test_names();
            let mut sorted: Vec<_> = names.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), names.len());
        }
    }
}
