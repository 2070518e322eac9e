//! The table of recognized processor options.

use super::ProcessorOptions;
use crate::errors::OptionsError;
use std::path::PathBuf;

/// Namespace shared by every option this processor owns.
pub const OPTION_PREFIX: &str = "persist.";

/// Parser applying one raw value onto the typed options.
pub type OptionParser = fn(&mut ProcessorOptions, &str, &str) -> Result<(), OptionsError>;

/// A recognized option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// Full option key, including the namespace.
    pub name: &'static str,
    /// Raw default value, if the option has one.
    pub default: Option<&'static str>,
    /// Applies a raw value.
    pub parse: OptionParser,
}

impl OptionSpec {
    /// Finds the table entry for a key.
    #[must_use]
    pub fn lookup(name: &str) -> Option<&'static OptionSpec> {
        OPTIONS.iter().find(|spec| spec.name == name)
    }
}

/// Every option the processor understands.
pub static OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "persist.incremental",
        default: Some("true"),
        parse: |options, name, value| {
            options.incremental = parse_bool(name, value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "persist.expandProjection",
        default: Some("false"),
        parse: |options, name, value| {
            options.expand_projection = parse_bool(name, value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "persist.dropUnusedColumns",
        default: Some("false"),
        parse: |options, name, value| {
            options.drop_unused_columns = parse_bool(name, value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "persist.schemaLocation",
        default: None,
        parse: |options, _name, value| {
            options.schema_location = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
            Ok(())
        },
    },
];

fn parse_bool(name: &str, value: &str) -> Result<bool, OptionsError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(OptionsError::invalid(name, value, "true or false"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_option_is_namespaced() {
        for spec in OPTIONS {
            assert!(spec.name.starts_with(OPTION_PREFIX), "{}", spec.name);
        }
    }

    #[test]
    fn test_defaults_parse() {
        let mut options = ProcessorOptions::default();
        for spec in OPTIONS {
            if let Some(default) = spec.default {
                assert!((spec.parse)(&mut options, spec.name, default).is_ok());
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert!(OptionSpec::lookup("persist.schemaLocation").is_some());
        assert!(OptionSpec::lookup("schemaLocation").is_none());
    }

    #[test]
    fn test_empty_schema_location_clears() {
        let mut options = ProcessorOptions::new().with_schema_location("out");
        let spec = OptionSpec::lookup("persist.schemaLocation").unwrap();
        (spec.parse)(&mut options, spec.name, "").unwrap();
        assert!(options.schema_location.is_none());
    }
}
