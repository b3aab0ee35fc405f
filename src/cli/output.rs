//! Output formatting utilities

use crate::infrastructure::Config;

/// Point at the offending character of a failed abbreviation
pub fn format_error_context(abbreviation: &str, position: usize) -> String {
    format!("{}\n{}^\n", abbreviation, " ".repeat(position))
}

/// Format the configuration for display, one key per line
pub fn format_config(config: &Config) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "stacked_multiplication = {}\n",
        config.stacked_multiplication
    ));
    output.push_str(&format!("jump_start = {}\n", config.jump_start));
    for (family, tags) in &config.defaults {
        for (tag, attributes) in tags {
            for (attribute, value) in attributes {
                output.push_str(&format!(
                    "defaults.{}.{}.{} = \"{}\"\n",
                    family, tag, attribute, value
                ));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_points_at_position() {
        let context = format_error_context("li*x", 2);
        assert_eq!(context, "li*x\n  ^\n");
    }

    #[test]
    fn test_error_context_at_start() {
        let context = format_error_context("#id", 0);
        assert_eq!(context, "#id\n^\n");
    }

    #[test]
    fn test_format_default_config() {
        let output = format_config(&Config::default());
        assert!(output.contains("stacked_multiplication = false"));
        assert!(output.contains("jump_start = 2"));
    }

    #[test]
    fn test_format_config_lists_default_attributes() {
        let mut config = Config::default();
        config
            .defaults
            .entry("html".to_string())
            .or_default()
            .entry("a".to_string())
            .or_default()
            .insert("href".to_string(), "#".to_string());

        let output = format_config(&config);
        assert!(output.contains("defaults.html.a.href = \"#\""));
    }
}
