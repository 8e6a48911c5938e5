//! Unit tests for run mode resolution and path normalisation

use crate::config::*;
use crate::error::HarnessError;
use std::path::PathBuf;

#[cfg(test)]
mod tests {
    use super::*;

    fn usage_message(result: crate::error::Result<RunConfig>) -> String {
        match result {
            Err(HarnessError::Usage(message)) => message,
            other => panic!("expected a usage error, got {:?}", other),
        }
    }

    #[test]
    fn test_three_arguments_select_reference_mode() {
        let config = RunConfig::resolve(false, false, &["opts", "song.wav", "lame"]).unwrap();
        assert_eq!(config.mode, RunMode::Reference, "three arguments without -m compare against references");
        assert_eq!(config.options_file, PathBuf::from("opts"));
        assert_eq!(config.input_file, PathBuf::from("song.wav"));
        assert_eq!(config.lame1, PathBuf::from("lame"));
        assert_eq!(config.lame2, None);
        assert!(!config.decode);
    }

    #[test]
    fn test_make_reference_flag_with_three_arguments() {
        let config = RunConfig::resolve(false, true, &["opts", "song.wav", "lame"]).unwrap();
        assert_eq!(config.mode, RunMode::MakeReference, "-m with three arguments generates references");
        assert!(!config.mode.reports_summary(), "reference generation never prints a summary");
    }

    #[test]
    fn test_four_arguments_select_compare_mode() {
        let config =
            RunConfig::resolve(true, false, &["opts", "song.wav", "lame", "./lame-new"]).unwrap();
        assert_eq!(config.mode, RunMode::Compare, "four arguments compare two encoders");
        assert_eq!(config.lame2, Some(PathBuf::from("lame-new")), "second encoder path should be normalized");
        assert!(config.decode, "-w should carry through");
    }

    #[test]
    fn test_argument_count_errors() {
        assert_eq!(
            usage_message(RunConfig::resolve::<&str>(false, false, &[])),
            "Not enough arguments."
        );
        assert_eq!(
            usage_message(RunConfig::resolve(false, false, &["a", "b"])),
            "Not enough arguments."
        );
        assert_eq!(
            usage_message(RunConfig::resolve(false, false, &["a", "b", "c", "d", "e"])),
            "Too many arguments."
        );
    }

    #[test]
    fn test_make_reference_with_four_arguments_is_usage_error() {
        let message = usage_message(RunConfig::resolve(false, true, &["a", "b", "c", "d"]));
        assert_eq!(message, "Too many arguments for -m mode.");
    }

    #[test]
    fn test_too_many_arguments_wins_over_make_reference() {
        let message = usage_message(RunConfig::resolve(false, true, &["a", "b", "c", "d", "e"]));
        assert_eq!(message, "Too many arguments.");
    }

    #[test]
    fn test_mode_display_names() {
        assert_eq!(RunMode::Reference.to_string(), "ref");
        assert_eq!(RunMode::MakeReference.to_string(), "makeref");
        assert_eq!(RunMode::Compare.to_string(), "compare");
    }

    #[test]
    fn test_normalize_path_lexical_rules() {
        assert_eq!(normalize_path("a/./b"), PathBuf::from("a/b"));
        assert_eq!(normalize_path("a//b/"), PathBuf::from("a/b"));
        assert_eq!(normalize_path("a/b/../c"), PathBuf::from("a/c"));
        assert_eq!(normalize_path("./lame"), PathBuf::from("lame"));
        assert_eq!(normalize_path("../x/../y"), PathBuf::from("../y"));
        assert_eq!(normalize_path("../../x"), PathBuf::from("../../x"));
        assert_eq!(normalize_path("a/.."), PathBuf::from("."));
        assert_eq!(normalize_path("."), PathBuf::from("."));
        assert_eq!(normalize_path(""), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_path_absolute() {
        assert_eq!(normalize_path("/usr/./bin/../lib"), PathBuf::from("/usr/lib"));
        assert_eq!(normalize_path("/../etc"), PathBuf::from("/etc"));
        assert_eq!(normalize_path("/"), PathBuf::from("/"));
    }

    #[test]
    fn test_normalize_path_expands_home() {
        let expanded = normalize_path("~/options");
        assert!(
            !expanded.starts_with("~") || std::env::var_os("HOME").is_none(),
            "tilde should expand when HOME is set: {}",
            expanded.display()
        );
        assert!(expanded.ends_with("options"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::Component;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 200,
            failure_persistence: None,
            ..ProptestConfig::default()
        })]

        #[test]
        fn test_normalized_relative_paths_have_no_dot_components(
            parts in prop::collection::vec(prop_oneof![
                Just(".".to_string()),
                Just("..".to_string()),
                "[a-z]{1,6}",
            ], 0..8)
        ) {
            let raw = parts.join("/");
            let normalized = normalize_path(&raw);

            let mut seen_normal = false;
            for component in normalized.components() {
                match component {
                    Component::CurDir => prop_assert!(
                        normalized == PathBuf::from("."),
                        "stray '.' in {:?}", normalized
                    ),
                    Component::ParentDir => prop_assert!(
                        !seen_normal,
                        "'..' after a name in {:?}", normalized
                    ),
                    Component::Normal(_) => seen_normal = true,
                    _ => {}
                }
            }

            // Normalising twice changes nothing
            let again = normalize_path(&normalized.to_string_lossy());
            prop_assert_eq!(again, normalized);
        }

        #[test]
        fn test_positional_count_decides_mode(count in 0usize..7, make_reference: bool) {
            let args: Vec<String> = (0..count).map(|i| format!("arg{}", i)).collect();
            let result = RunConfig::resolve(false, make_reference, &args);

            match (count, make_reference) {
                (3, true) => prop_assert_eq!(result.unwrap().mode, RunMode::MakeReference),
                (3, false) => prop_assert_eq!(result.unwrap().mode, RunMode::Reference),
                (4, false) => prop_assert_eq!(result.unwrap().mode, RunMode::Compare),
                _ => prop_assert!(matches!(result, Err(HarnessError::Usage(_)))),
            }
        }
    }
}
