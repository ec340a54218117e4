use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Syntax error at {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Parser gave up at {offset}")]
    Panicked { offset: usize },
}

impl ParseError {
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub fn panicked(offset: usize) -> Self {
        Self::Panicked { offset }
    }

    /// Byte offset into the source where the failure was reported
    pub fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } | Self::Panicked { offset } => *offset,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Syntax { message, .. } => message.clone(),
            Self::Panicked { .. } => "source could not be parsed".to_string(),
        }
    }

    /// Render a human readable report pointing at the failing location.
    ///
    /// Used by hosts to show parse failures next to the source pane.
    #[cfg(feature = "pretty-errors")]
    pub fn render_report(&self, source: &str) -> String {
        use ariadne::{Config, Label, Report, ReportKind, Source};

        // ariadne counts in chars, oxc reports bytes
        let byte_offset = self.offset().min(source.len());
        let start = source
            .get(..byte_offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        let end = (start + 1).min(source.chars().count()).max(start);

        let mut out = Vec::new();
        let written = Report::<std::ops::Range<usize>>::build(ReportKind::Error, (), start)
            .with_config(Config::default().with_color(false))
            .with_message(self.message())
            .with_label(Label::new(start..end).with_message("here"))
            .finish()
            .write(Source::from(source), &mut out);

        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
