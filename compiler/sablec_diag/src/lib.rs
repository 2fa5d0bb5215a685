//! Diagnostic reporting system for the Sable compiler.

use codespan_reporting::{
    files::{self, Files, SimpleFile},
    term::{
        self, Config,
        termcolor::{ColorChoice, StandardStream},
    },
};

use std::{
    fmt::Display,
    sync::{Arc, RwLock},
};

use sablec_utils::pluralize;

pub type Diagnostic = codespan_reporting::diagnostic::Diagnostic<FileId>;
pub use codespan_reporting::diagnostic::Label;
pub use codespan_reporting::diagnostic::Severity;
pub use codespan_reporting::term::termcolor;
pub use sablec_utils::FileId;

type SimpFile = SimpleFile<String, String>;

#[derive(Debug, Clone)]
struct MultiFile {
    files: Vec<SimpFile>,
}

impl MultiFile {
    pub fn new() -> MultiFile {
        MultiFile { files: Vec::new() }
    }

    pub fn get(&self, id: FileId) -> &SimpFile {
        self.files.get(id.as_usize()).expect("unknown file id.")
    }
}

impl<'a> Files<'a> for MultiFile {
    type FileId = FileId;
    type Name = String;
    type Source = &'a str;

    fn name(&'a self, id: Self::FileId) -> Result<Self::Name, files::Error> {
        Ok(self.get(id).name().clone())
    }

    fn source(&'a self, id: Self::FileId) -> Result<Self::Source, files::Error> {
        Ok(self.get(id).source().as_str())
    }

    fn line_index(&'a self, id: Self::FileId, byte_index: usize) -> Result<usize, files::Error> {
        self.get(id).line_index((), byte_index)
    }

    fn line_range(
        &'a self,
        id: Self::FileId,
        line_index: usize,
    ) -> Result<std::ops::Range<usize>, files::Error> {
        self.get(id).line_range((), line_index)
    }
}

/// A collector of Diagnostics.
#[derive(Debug, Clone)]
pub struct DiagnosticSink(Arc<RwLock<SinkInner>>);

impl DiagnosticSink {
    /// Create a new diagnostic sink.
    pub fn new() -> DiagnosticSink {
        DiagnosticSink(Arc::new(RwLock::new(SinkInner::new())))
    }

    /// Registers a new file into the diagnostic sink and returns the
    /// corresponding file id.
    pub fn register_file(&self, name: String, source: String) -> FileId {
        let mut inner = self.0.write().unwrap();
        inner.register_file(name, source)
    }

    /// Returns true if there is at least one error in the sink.
    pub fn failed(&self) -> bool {
        let inner = self.0.read().unwrap();
        inner.failed()
    }

    /// The count of error diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        let inner = self.0.read().unwrap();
        inner.errors
    }

    /// Returns true if there is no diag, false instead.
    pub fn is_empty(&self) -> bool {
        let inner = self.0.read().unwrap();
        inner.is_empty()
    }

    /// Print all diagnostics to the given writer, with default config.
    pub fn dump_with(&self, writer: &mut StandardStream) -> Result<(), files::Error> {
        let inner = self.0.read().unwrap();
        inner.dump_with(writer)
    }

    /// Emit all the diagnostics to stderr.
    pub fn dump(&self, color: ColorChoice) {
        let inner = self.0.read().unwrap();
        inner.dump_to_stderr(color);
    }

    /// Returns a summary if there were errors or warnings, nothing if there is
    /// neither.
    pub fn summary(&self, name: &str) -> Option<String> {
        let inner = self.0.read().unwrap();
        inner.summary(name)
    }

    /// Emit a diagnostic.
    pub fn emit(&mut self, diag: impl ToDiagnostic) {
        let mut inner = self.0.write().unwrap();
        inner.emit(diag);
    }

    /// The codes of every diagnostic emitted so far, in emission order.
    pub fn codes(&self) -> Vec<String> {
        let inner = self.0.read().unwrap();
        inner.diags.iter().filter_map(|d| d.code.clone()).collect()
    }

}

impl Default for DiagnosticSink {
    fn default() -> Self {
        DiagnosticSink::new()
    }
}

/// The guts of [`DiagnosticSink`].
#[derive(Debug, Clone)]
struct SinkInner {
    diags: Vec<Diagnostic>,
    /// a count of all the error diagnostics
    errors: usize,
    /// a count of all the warning diagnostics
    warnings: usize,
    /// the files where diagnostics are located.
    files: MultiFile,
    /// last file id given
    last_fid: u32,
}

impl SinkInner {
    pub fn new() -> SinkInner {
        SinkInner {
            diags: Vec::new(),
            errors: 0,
            warnings: 0,
            files: MultiFile::new(),
            last_fid: 0,
        }
    }

    pub fn register_file(&mut self, name: String, source: String) -> FileId {
        let fid = FileId::new(self.last_fid);
        self.last_fid += 1;

        self.files.files.push(SimpleFile::new(name, source));
        fid
    }

    pub fn failed(&self) -> bool {
        self.errors != 0
    }

    pub fn is_empty(&self) -> bool {
        self.diags.is_empty()
    }

    pub fn dump_with(&self, writer: &mut StandardStream) -> Result<(), files::Error> {
        let config = Config::default();

        for diag in &self.diags {
            term::emit(writer, &config, &self.files, diag)?;
        }

        Ok(())
    }

    pub fn dump_to_stderr(&self, color: ColorChoice) {
        let mut stderr = StandardStream::stderr(color);

        self.dump_with(&mut stderr)
            .expect("failed to emit the diagnostics");
    }

    pub fn summary(&self, name: &str) -> Option<String> {
        if self.errors > 0 {
            Some(format!(
                "compilation of `{}` failed due to {} error{} and {} warning{}",
                name,
                self.errors,
                pluralize(self.errors),
                self.warnings,
                pluralize(self.warnings)
            ))
        } else if self.warnings > 0 {
            Some(format!(
                "compilation of `{}` succeeded but {} warning{} emitted.",
                name,
                self.warnings,
                pluralize(self.warnings)
            ))
        } else {
            None
        }
    }

    pub fn emit(&mut self, diag: impl ToDiagnostic) {
        let diag = diag.into_diag();

        if diag.severity == Severity::Warning {
            self.warnings += 1;
        } else if diag.severity == Severity::Error {
            self.errors += 1;
        } else {
            panic!("severity '{:?}' is not supported", diag.severity);
        }

        self.diags.push(diag);
    }
}

/// A type that can be converted to a Diagnostic.
pub trait ToDiagnostic {
    fn into_diag(self) -> Diagnostic;
}

impl ToDiagnostic for Diagnostic {
    #[inline(always)]
    fn into_diag(self) -> Diagnostic {
        self
    }
}

/// List of all the error codes the compiling stages can emit.
///
/// The set is closed: every diagnostic a stage emits carries exactly one of
/// these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unknown start of token.
    UnknownCharacter = 1,
    /// A string literal was never closed before the end of the file.
    UnterminatedString = 2,
    /// A string literal ran over the end of its line.
    MultilineString = 3,
    /// A hex literal is wider than 64 bits (more than 16 digits).
    TooWideHexLiteral = 4,
    /// A binary literal is wider than 64 bits (more than 64 digits).
    TooWideBinaryLiteral = 5,
    /// A `b'…'` literal missing its closing quote.
    UnterminatedBinaryLiteral = 6,
    /// A `'…'` literal missing its closing quote.
    UnterminatedCharLiteral = 7,
    /// A single `:`, which is not a token (the separator is `::`).
    StrayColon = 8,
    /// Expected some token, found something else.
    ExpectedToken = 9,
    /// No expression can start with the current token.
    NoParseRule = 10,
    /// Use of an identifier that was never declared.
    UndeclaredIdentifier = 11,
    /// Call of a function that was never declared.
    UndeclaredFunction = 12,
    /// Call of a function that is declared but has no body yet.
    CallOfUndefined = 13,
    /// A name is declared twice in the same scope.
    Redeclaration = 14,
    /// A function is forward-declared twice.
    DoubleDeclaration = 15,
    /// Two parameters of one function share a name.
    DuplicateParameter = 16,
    /// Two members of one enum share a name.
    DuplicateEnumMember = 17,
    /// A struct with no fields.
    EmptyStructBody = 18,
    /// Assignment in a position where assignment is not allowed.
    CannotAssign = 19,
    /// Increment, decrement or compound assignment of an undefined name.
    MutationOfUndefined = 20,
    /// Array subscript through an undeclared or undefined name.
    BadSubscript = 21,
    /// A value of one kind initialising a declaration of another kind.
    TypeDisagreement = 22,
    /// An integer literal out of range for its type.
    IntLiteralOverflow = 23,
    /// A float literal out of range for its type.
    FloatLiteralOverflow = 24,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{:03}", *self as usize)
    }
}

/// Internal result, used by functions that output something that can produce a
/// diagnostic and cannot recover from it.
pub type IResult<T> = core::result::Result<T, Diagnostic>;
