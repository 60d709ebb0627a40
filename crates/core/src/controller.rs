//! State machine behind one editing session.
//!
//! The controller owns what the user sees (source, selections, output) and
//! decides what happens on each interaction. It performs no I/O: callers send
//! the request it hands out and feed the response back in.

use crate::samples::ExampleLibrary;
use crate::types::{GenerationStyle, ProgrammingLanguage, TransformRequest};

/// A short user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptySource,
    Transformed,
    TransformFailed,
    Copied,
    ClipboardFailed,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Self::EmptySource | Self::ClipboardFailed => "Error",
            Self::Transformed => "Yasss Queen! 💅",
            Self::TransformFailed => "Big Yikes!",
            Self::Copied => "Copied!",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::EmptySource => "Please enter some code to transform",
            Self::Transformed => "Code is now bussin' fr fr!",
            Self::TransformFailed => "That transformation was not it, chief",
            Self::Copied => "Code copied to clipboard",
            Self::ClipboardFailed => "Failed to copy code",
        }
    }

    /// Whether the notice reports a failure.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::EmptySource | Self::TransformFailed | Self::ClipboardFailed
        )
    }
}

/// Outcome of asking the controller to start a transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Send this request to the transform endpoint.
    Send(TransformRequest),
    /// Nothing to send; show the notice.
    Rejected(Notice),
    /// A transformation is already running.
    Suppressed,
}

#[derive(Debug, Clone)]
pub struct Controller {
    library: ExampleLibrary,
    source: String,
    language: ProgrammingLanguage,
    style: GenerationStyle,
    output: String,
    in_flight: bool,
    // Output shown before the running attempt, restored if it fails.
    previous_output: Option<String>,
    received_output: bool,
}

impl Controller {
    /// Start a session with the sample for `language` in the editor.
    pub fn new(
        library: ExampleLibrary,
        language: ProgrammingLanguage,
        style: GenerationStyle,
    ) -> Self {
        let source = library.get(language).to_string();

        Self {
            library,
            source,
            language,
            style,
            output: String::new(),
            in_flight: false,
            previous_output: None,
            received_output: false,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> ProgrammingLanguage {
        self.language
    }

    pub fn style(&self) -> GenerationStyle {
        self.style
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Switch language and reset the editor to that language's sample.
    ///
    /// Unsaved edits are discarded.
    pub fn select_language(&mut self, language: ProgrammingLanguage) {
        self.language = language;
        self.source = self.library.get(language).to_string();
    }

    pub fn select_style(&mut self, style: GenerationStyle) {
        self.style = style;
    }

    pub fn edit_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn submit(&mut self) -> Submission {
        if self.in_flight {
            return Submission::Suppressed;
        }

        if self.source.trim().is_empty() {
            return Submission::Rejected(Notice::EmptySource);
        }

        self.in_flight = true;
        self.received_output = false;
        self.previous_output = Some(self.output.clone());

        Submission::Send(TransformRequest::new(
            self.source.clone(),
            self.style.as_str(),
            self.language.as_str(),
        ))
    }

    /// Append one streamed chunk.
    ///
    /// The first chunk of an attempt replaces the previous output. Chunks
    /// arriving while nothing is in flight are ignored.
    pub fn apply_chunk(&mut self, chunk: &str) {
        if !self.in_flight {
            return;
        }

        if !self.received_output {
            self.output.clear();
            self.received_output = true;
        }

        self.output.push_str(chunk);
    }

    /// Replace the output with a complete (batch) response.
    pub fn set_output(&mut self, text: impl Into<String>) {
        if !self.in_flight {
            return;
        }

        self.output = text.into();
        self.received_output = true;
    }

    /// Finish the running attempt successfully.
    pub fn complete(&mut self) -> Notice {
        self.in_flight = false;
        self.previous_output = None;
        Notice::Transformed
    }

    /// Finish the running attempt with a failure, restoring the previous
    /// output.
    pub fn fail(&mut self) -> Notice {
        self.in_flight = false;
        if let Some(previous) = self.previous_output.take() {
            self.output = previous;
        }
        Notice::TransformFailed
    }

    /// Map a clipboard write outcome to a notice. State is untouched.
    pub fn copy_notice<E>(result: &Result<(), E>) -> Notice {
        match result {
            Ok(()) => Notice::Copied,
            Err(_) => Notice::ClipboardFailed,
        }
    }
}
