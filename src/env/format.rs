/// How each resolved variable is rendered as an output line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineFormat {
    pub prefix: String,
    pub suffix: String,
    pub separator: String,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            separator: "=".to_owned(),
        }
    }
}

impl LineFormat {
    pub fn format(&self, key: &str, value: &str) -> String {
        format!(
            "{prefix}{key}{separator}{value}{suffix}",
            prefix = self.prefix,
            separator = self.separator,
            suffix = self.suffix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_format(prefix: &str, suffix: &str, separator: &str) -> LineFormat {
        LineFormat {
            prefix: prefix.into(),
            suffix: suffix.into(),
            separator: separator.into(),
        }
    }

    #[test]
    fn plain_key_value() {
        assert_eq!(line_format("", "", "=").format("FOO", "bar"), "FOO=bar");
    }

    #[test]
    fn export_prefix() {
        assert_eq!(line_format("export ", "", "=").format("FOO", "bar"), "export FOO=bar");
    }

    #[test]
    fn custom_separator_and_suffix() {
        assert_eq!(line_format("", ";", ": ").format("FOO", "bar"), "FOO: bar;");
    }

    #[test]
    fn default_uses_equals() {
        assert_eq!(LineFormat::default().format("A", ""), "A=");
    }
}
