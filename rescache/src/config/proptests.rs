//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, OutputFormat};
use proptest::prelude::*;
use std::path::PathBuf;

fn format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Json),
        Just(OutputFormat::Csv),
        Just(OutputFormat::Tsv),
        Just(OutputFormat::Table),
    ]
}

fn sources_strategy() -> impl Strategy<Value = Vec<PathBuf>> {
    prop::collection::btree_set("[a-z]{1,8}(\\.tar)?", 0..5)
        .prop_map(|names| names.into_iter().map(PathBuf::from).collect())
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of("/[a-z]{1,10}"),
        prop::option::of(sources_strategy()),
        prop::option::of(format_strategy()),
    )
        .prop_map(|(caching, cp, dir, sources, format)| Config {
            file_caching_enabled: caching,
            class_path_resolving_enabled: cp,
            file_cache_dir: dir.map(PathBuf::from),
            sources,
            output_format: format,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Set scalar fields from the higher layer always win
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(
            result.file_caching_enabled,
            high.file_caching_enabled.or(low.file_caching_enabled)
        );
        prop_assert_eq!(
            result.class_path_resolving_enabled,
            high.class_path_resolving_enabled.or(low.class_path_resolving_enabled)
        );
        prop_assert_eq!(
            result.file_cache_dir.clone(),
            high.file_cache_dir.clone().or(low.file_cache_dir.clone())
        );
        prop_assert_eq!(result.output_format, high.output_format.or(low.output_format));
    }

    // Merging an empty config changes nothing
    #[test]
    fn config_merge_identity(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &Config::default());
        prop_assert_eq!(result, config);
    }

    // Merged sources keep every source from both layers, higher layer first
    #[test]
    fn config_merge_sources_union(low in sources_strategy(), high in sources_strategy()) {
        let mut result = Config { sources: Some(low.clone()), ..Default::default() };
        ConfigMerger::merge_into(&mut result, &Config { sources: Some(high.clone()), ..Default::default() });
        let merged = result.sources.unwrap_or_default();

        for path in low.iter().chain(high.iter()) {
            prop_assert!(merged.contains(path));
        }
        prop_assert_eq!(&merged[..high.len()], &high[..]);
    }

    // Option conversion falls back to defaults only for unset fields
    #[test]
    fn config_options_respect_set_flags(config in config_strategy()) {
        let options = config.file_system_options();
        if let Some(caching) = config.file_caching_enabled {
            prop_assert_eq!(options.file_caching_enabled, caching);
        } else {
            prop_assert!(options.file_caching_enabled);
        }
        if let Some(cp) = config.class_path_resolving_enabled {
            prop_assert_eq!(options.class_path_resolving_enabled, cp);
        }
    }
}
