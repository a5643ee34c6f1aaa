/// Function categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Aggregate,
    List,
}

impl Category {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::List => "list",
        }
    }
}

/// Documentation for a function set.
#[derive(Debug, Clone, Copy)]
pub struct Documentation {
    /// Category this function belongs in.
    pub category: Category,
    /// Description of the function.
    ///
    /// Whitespace will be trimmed when rendered.
    pub description: &'static str,
    /// Argument names.
    ///
    /// For functions with multiple signatures, this lists the names for the
    /// longest one.
    pub arguments: &'static [&'static str],
    /// An optional example for the function.
    pub example: Option<Example>,
}

/// A simple example.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    /// Example usage of the function.
    ///
    /// This should just be the function call itself and not an entire query.
    pub example: &'static str,
    /// The output for the above example.
    pub output: &'static str,
}
