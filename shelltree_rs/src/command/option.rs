//! Boolean flag declarations.

/// A flag a command accepts, asserted on the line as sigil + label
/// (`@force`). A bare string converts into an undescribed option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    pub label: String,
    pub description: Option<String>,
}

impl CommandOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&str> for CommandOption {
    fn from(label: &str) -> Self {
        CommandOption::new(label)
    }
}

impl From<String> for CommandOption {
    fn from(label: String) -> Self {
        CommandOption::new(label)
    }
}
